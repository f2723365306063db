use crate::domain::model::{Artifact, ArtifactValue, ExportLine};
use crate::domain::ports::ArtifactWriter;
use crate::utils::error::{Result, TimesheetError};
use crate::utils::format::{format_display_date, safe_filename};

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

pub const HEADING_ROW: u32 = 3;
pub const FIRST_LINE_ROW: u32 = 4;

pub const HEADINGS: [&str; 11] = [
    "Date",
    "Name",
    "SAP ID",
    "Service Master",
    "WO",
    "OP",
    "Work Center",
    "Hours",
    "PO",
    "PO Item",
    "Role",
];

/// Lays the lines out on the vendor-entry sheet and serializes it.
/// Used by both download and email delivery. Headings are only written when
/// the writer has none of its own.
pub fn build_vendor_entry<W: ArtifactWriter>(
    lines: &[ExportLine],
    writer: &mut W,
) -> Result<Artifact> {
    let first = lines.first().ok_or(TimesheetError::NoLines)?;

    if !writer.has_headings() {
        for (i, heading) in HEADINGS.iter().enumerate() {
            writer.write_cell(HEADING_ROW, i as u16 + 1, ArtifactValue::Text(heading.to_string()))?;
        }
    }

    for (offset, line) in lines.iter().enumerate() {
        let row = FIRST_LINE_ROW + offset as u32;
        for (i, value) in line_cells(line).into_iter().enumerate() {
            writer.write_cell(row, i as u16 + 1, value)?;
        }
    }

    let bytes = writer.serialize()?;
    let filename = artifact_filename(first);
    tracing::debug!("Built {} ({} lines, {} bytes)", filename, lines.len(), bytes.len());

    Ok(Artifact {
        filename,
        content_type: XLSX_CONTENT_TYPE.to_string(),
        bytes,
    })
}

fn line_cells(line: &ExportLine) -> [ArtifactValue; 11] {
    let text = |s: &str| ArtifactValue::Text(s.to_string());
    [
        ArtifactValue::Text(format_display_date(&line.date_iso)),
        text(&line.employee_name),
        text(&line.sap_id),
        text(&line.service_master_number),
        text(&line.wo_number),
        text(&line.op_number),
        text(&line.work_center),
        ArtifactValue::Number(line.hours),
        text(&line.po_number),
        text(&line.po_item),
        text(&line.role),
    ]
}

/// `VendorEntry_<company>_<date>.xlsx`, sanitized for filesystems and headers.
pub fn artifact_filename(line: &ExportLine) -> String {
    let company = if line.company.is_empty() {
        "Company"
    } else {
        &line.company
    };
    let date = if line.date_iso.is_empty() {
        "date"
    } else {
        &line.date_iso
    };
    format!(
        "VendorEntry_{}_{}.xlsx",
        safe_filename(company),
        safe_filename(date)
    )
}
