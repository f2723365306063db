use calamine::{open_workbook_auto, Data, Reader};
use rust_xlsxwriter::Workbook;
use std::path::Path;
use tempfile::TempDir;
use wo_timesheet::adapters::xlsx_reader::XlsxReferenceReader;
use wo_timesheet::domain::model::{EntryRow, WorkOrderBlock};
use wo_timesheet::{
    DeliveryOutcome, ExportService, ExportSettings, LocalStorage, OutputMode, Submission,
    TimesheetError,
};

/// Writes a master workbook shaped like the production one.
fn write_master_workbook(path: &Path) {
    let mut workbook = Workbook::new();

    let names = workbook.add_worksheet();
    names.set_name("Names").unwrap();
    let header = [
        "Company", "Name", "SAP ID", "Role", "", "", "Role", "Service Master", "", "Company",
        "Purchase order", "Item number",
    ];
    for (col, text) in header.iter().enumerate() {
        if !text.is_empty() {
            names.write_string(0, col as u16, *text).unwrap();
        }
    }
    // Person table A-D
    names.write_string(1, 0, "Acme").unwrap();
    names.write_string(1, 1, "Bob Smith").unwrap();
    names.write_number(1, 2, 100234.0).unwrap();
    names.write_string(1, 3, "Mechanical Fitter").unwrap();
    names.write_string(2, 0, "Acme").unwrap();
    names.write_string(2, 1, "Ann Lee").unwrap();
    names.write_string(2, 2, "0100235").unwrap();
    names.write_string(2, 3, "Supervisor").unwrap();
    names.write_string(3, 0, "Borealis").unwrap();
    names.write_string(3, 1, "Cy Park").unwrap();
    names.write_string(3, 3, "Mechanical Fitter").unwrap();
    // Role table G-H
    names.write_string(1, 6, "mechanical fitter").unwrap();
    names.write_number(1, 7, 3000123.0).unwrap();
    names.write_string(2, 6, "Supervisor").unwrap();
    names.write_string(2, 7, "3000456").unwrap();
    // Company / PO table J-L
    names.write_string(1, 9, "Acme").unwrap();
    names.write_string(1, 10, "4500001111").unwrap();
    names.write_string(1, 11, "10").unwrap();
    names.write_string(2, 9, "Borealis").unwrap();

    let work_orders = workbook.add_worksheet();
    work_orders.set_name("Work Orders").unwrap();
    for (col, text) in ["WO", "OP", "Header", "Op Short Text", "Work Center", "Company"]
        .iter()
        .enumerate()
    {
        work_orders.write_string(0, col as u16, *text).unwrap();
    }
    let rows = [
        ["40001234", "0010", "Crusher reline", "Remove liners", "MECH", "Acme"],
        ["40001234", "0020", "Crusher reline", "Fit liners", "MECH", "Acme"],
        ["40005678", "0010", "Conveyor belt", "Splice", "BELT", "Borealis"],
    ];
    for (r, row) in rows.iter().enumerate() {
        for (col, text) in row.iter().enumerate() {
            work_orders
                .write_string(r as u32 + 1, col as u16, *text)
                .unwrap();
        }
    }

    workbook.save(path).unwrap();
}

fn entry(name: &str, hours: &str) -> EntryRow {
    EntryRow {
        employee_name: name.to_string(),
        hours: hours.to_string(),
    }
}

fn service(dir: &TempDir) -> ExportService<LocalStorage> {
    let master = dir.path().join("Master App Timesheet.xlsx");
    write_master_workbook(&master);
    let output = dir.path().join("output");

    ExportService::new(
        Box::new(XlsxReferenceReader::new(master)),
        LocalStorage::new(output.to_str().unwrap().to_string()),
        ExportSettings::default(),
    )
}

#[test]
fn test_options_from_workbook() {
    let dir = TempDir::new().unwrap();
    let service = service(&dir);

    let snapshot = service.options().unwrap();
    let index = &snapshot.index;

    assert_eq!(snapshot.source, "excel");
    assert_eq!(index.companies, vec!["Acme", "Borealis"]);
    assert_eq!(index.people_for("Acme").len(), 2);
    assert_eq!(index.people_for("Acme")[0].sap_id, "100234");
    assert_eq!(index.people_for("Acme")[1].sap_id, "0100235");
    assert_eq!(index.service_master_for("Mechanical Fitter"), Some("3000123"));
    assert_eq!(
        index.purchase_order_for("Acme").unwrap().po_number,
        "4500001111"
    );
    assert!(index.purchase_order_for("Borealis").is_none());
    assert_eq!(index.work_orders_for("Acme").len(), 2);
    assert_eq!(index.work_orders_for("Acme")[1].op_short_text, "Fit liners");
}

#[tokio::test]
async fn test_download_export_end_to_end() {
    let dir = TempDir::new().unwrap();
    let service = service(&dir);
    let index = service.index().unwrap();

    let mut first = WorkOrderBlock::for_work_order(
        index.find_work_order("Acme", "40001234|0010|MECH").unwrap(),
    );
    first.rows = vec![entry("Bob Smith", "8"), entry("Ann Lee", "2.5"), entry("", "")];
    let mut second = WorkOrderBlock::for_work_order(
        index.find_work_order("Acme", "40001234|0020|MECH").unwrap(),
    );
    second.rows = vec![entry("Bob Smith", "1")];

    let submission = Submission {
        date_iso: "2024-01-05".to_string(),
        company: "Acme".to_string(),
        blocks: vec![first, second],
    };

    let outcome = service
        .export(&submission, &OutputMode::Download)
        .await
        .unwrap();

    let expected_path = dir
        .path()
        .join("output")
        .join("VendorEntry_Acme_2024-01-05.xlsx");
    assert_eq!(
        outcome,
        DeliveryOutcome::Saved {
            path: expected_path.display().to_string()
        }
    );
    assert!(expected_path.exists());

    let mut workbook = open_workbook_auto(&expected_path).unwrap();
    let range = workbook.worksheet_range("Vendor Entry Sheet").unwrap();
    let text = |row: u32, col: u32| match range.get_value((row, col)) {
        Some(Data::String(s)) => s.clone(),
        other => panic!("expected text at ({row}, {col}), got {other:?}"),
    };

    // Headings on row 3, lines from row 4 (zero-based 2 and 3).
    assert_eq!(text(2, 0), "Date");
    assert_eq!(text(3, 0), "05.01.2024");
    assert_eq!(text(3, 1), "Bob Smith");
    assert_eq!(text(3, 2), "100234");
    assert_eq!(text(3, 3), "3000123");
    assert_eq!(text(3, 4), "40001234");
    assert_eq!(text(3, 5), "0010");
    assert_eq!(text(3, 6), "MECH");
    assert_eq!(range.get_value((3, 7)), Some(&Data::Float(8.0)));
    assert_eq!(text(3, 8), "4500001111");
    assert_eq!(text(3, 9), "10");
    assert_eq!(text(3, 10), "Mechanical Fitter");

    assert_eq!(text(4, 1), "Ann Lee");
    assert_eq!(text(4, 3), "3000456");
    assert_eq!(range.get_value((4, 7)), Some(&Data::Float(2.5)));

    assert_eq!(text(5, 5), "0020");
    assert_eq!(range.get_value((5, 7)), Some(&Data::Float(1.0)));
    assert!(matches!(
        range.get_value((6, 0)),
        None | Some(Data::Empty)
    ));
}

#[tokio::test]
async fn test_person_from_other_company_is_rejected() {
    let dir = TempDir::new().unwrap();
    let service = service(&dir);

    let submission = Submission {
        date_iso: "2024-01-05".to_string(),
        company: "Acme".to_string(),
        blocks: vec![WorkOrderBlock {
            wo_number: "40001234".to_string(),
            op_number: "0010".to_string(),
            work_center: "MECH".to_string(),
            rows: vec![entry("Bob Smith", "8"), entry("Cy Park", "4")],
            ..Default::default()
        }],
    };

    let err = service
        .export(&submission, &OutputMode::Download)
        .await
        .unwrap_err();

    assert!(matches!(err, TimesheetError::PersonNotFound { block: 0, row: 1 }));
    assert_eq!(
        err.user_friendly_message(),
        "Block #1, row #2: Person not found."
    );
    assert!(!dir.path().join("output").exists());
}

#[test]
fn test_missing_sheet_reports_missing_table() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("partial.xlsx");
    let mut workbook = Workbook::new();
    workbook.add_worksheet().set_name("Names").unwrap();
    workbook.save(&path).unwrap();

    let service = ExportService::new(
        Box::new(XlsxReferenceReader::new(&path)),
        LocalStorage::new(dir.path().to_str().unwrap().to_string()),
        ExportSettings::default(),
    );

    let err = service.options().unwrap_err();

    assert!(matches!(err, TimesheetError::MissingTable { name } if name == "Work Orders"));
}

#[tokio::test]
async fn test_download_fills_configured_template() {
    let dir = TempDir::new().unwrap();
    let master = dir.path().join("Master App Timesheet.xlsx");
    write_master_workbook(&master);

    let template = dir.path().join("template.xlsx");
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Vendor Entry Sheet").unwrap();
    sheet.write_string(0, 0, "Vendor: Acme").unwrap();
    sheet.write_string(2, 0, "Datum").unwrap();
    workbook.save(&template).unwrap();

    let settings = ExportSettings {
        template_path: Some(template.clone()),
        ..ExportSettings::default()
    };
    let service = ExportService::new(
        Box::new(XlsxReferenceReader::new(&master)),
        LocalStorage::new(dir.path().join("output").to_str().unwrap().to_string()),
        settings,
    );

    let submission = Submission {
        date_iso: "2024-01-05".to_string(),
        company: "Acme".to_string(),
        blocks: vec![WorkOrderBlock {
            wo_number: "40001234".to_string(),
            op_number: "0010".to_string(),
            work_center: "MECH".to_string(),
            rows: vec![entry("Ann Lee", "3")],
            ..Default::default()
        }],
    };

    let outcome = service
        .export(&submission, &OutputMode::Download)
        .await
        .unwrap();
    let DeliveryOutcome::Saved { path } = outcome else {
        panic!("expected a saved file, got {outcome:?}");
    };

    let mut output = open_workbook_auto(&path).unwrap();
    let range = output.worksheet_range("Vendor Entry Sheet").unwrap();
    assert_eq!(
        range.get_value((0, 0)),
        Some(&Data::String("Vendor: Acme".to_string()))
    );
    assert_eq!(range.get_value((2, 0)), Some(&Data::String("Datum".to_string())));
    assert_eq!(
        range.get_value((3, 1)),
        Some(&Data::String("Ann Lee".to_string()))
    );
    assert_eq!(range.get_value((3, 7)), Some(&Data::Float(3.0)));
}
