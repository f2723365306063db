use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single cell of the reference dataset.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Empty,
    Bool(bool),
    Number(f64),
    Text(String),
    RichText {
        text: String,
    },
    /// A formula cell as exported with its cached value.
    Formula {
        result: Box<CellValue>,
    },
}

impl CellValue {
    /// Plain, trimmed text of the cell. Whole numbers render without a fraction.
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Text(s) => s.trim().to_string(),
            CellValue::RichText { text } => text.trim().to_string(),
            CellValue::Formula { result } => result.as_text(),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

static EMPTY_CELL: CellValue = CellValue::Empty;

/// One row of a table, addressed by zero-based column index.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(pub Vec<CellValue>);

impl Row {
    pub fn new(cells: Vec<CellValue>) -> Self {
        Self(cells)
    }

    pub fn cell(&self, col: usize) -> &CellValue {
        self.0.get(col).unwrap_or(&EMPTY_CELL)
    }

    pub fn text(&self, col: usize) -> String {
        self.cell(col).as_text()
    }
}

/// Ordered rows of one sheet. The first row is the header.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Table {
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Rows after the header.
    pub fn data_rows(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter().skip(1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonRecord {
    pub name: String,
    pub sap_id: String,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseOrderEntry {
    pub po_number: String,
    pub po_item: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrderEntry {
    pub wo_number: String,
    pub op_number: String,
    pub op_short_text: String,
    pub wo_header: String,
    pub work_center: String,
}

impl WorkOrderEntry {
    /// Identifies one operation of a work order in a picker: `wo|op|work center`.
    pub fn selection_key(&self) -> String {
        format!("{}|{}|{}", self.wo_number, self.op_number, self.work_center)
    }
}

/// Lookups derived from the reference dataset.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceIndex {
    pub companies: Vec<String>,
    pub people_by_company: BTreeMap<String, Vec<PersonRecord>>,
    pub service_master_by_role: BTreeMap<String, String>,
    pub po_by_company: BTreeMap<String, PurchaseOrderEntry>,
    pub work_orders_by_company: BTreeMap<String, Vec<WorkOrderEntry>>,
}

/// The options payload handed to a form: the index plus where it came from.
#[derive(Debug, Clone, Serialize)]
pub struct OptionsSnapshot {
    pub ok: bool,
    pub source: String,
    #[serde(flatten)]
    pub index: ReferenceIndex,
}

/// A person/hours pair as typed into the form.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EntryRow {
    pub employee_name: String,
    pub hours: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkOrderBlock {
    pub wo_number: String,
    pub op_number: String,
    pub op_short_text: String,
    pub wo_header: String,
    pub work_center: String,
    pub rows: Vec<EntryRow>,
}

impl WorkOrderBlock {
    pub fn for_work_order(work_order: &WorkOrderEntry) -> Self {
        Self {
            wo_number: work_order.wo_number.clone(),
            op_number: work_order.op_number.clone(),
            op_short_text: work_order.op_short_text.clone(),
            wo_header: work_order.wo_header.clone(),
            work_center: work_order.work_center.clone(),
            rows: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Submission {
    #[serde(rename = "dateISO")]
    pub date_iso: String,
    pub company: String,
    pub blocks: Vec<WorkOrderBlock>,
}

/// One person's hours on one work order, ready for output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportLine {
    #[serde(rename = "dateISO")]
    pub date_iso: String,
    pub company: String,
    pub employee_name: String,
    pub sap_id: String,
    pub role: String,
    pub service_master_number: String,
    pub hours: f64,
    pub wo_number: String,
    pub op_number: String,
    pub work_center: String,
    pub po_number: String,
    pub po_item: String,
}

/// Value written into an artifact cell.
#[derive(Debug, Clone, PartialEq)]
pub enum ArtifactValue {
    Text(String),
    Number(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct OutgoingMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub attachment: Artifact,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputMode {
    Download,
    Email { to: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum DeliveryOutcome {
    Saved { path: String },
    Emailed { to: String, id: Option<String> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_text_coercion() {
        assert_eq!(CellValue::Empty.as_text(), "");
        assert_eq!(CellValue::from("  Bob  ").as_text(), "Bob");
        assert_eq!(
            CellValue::RichText {
                text: " Acme ".to_string()
            }
            .as_text(),
            "Acme"
        );
        assert_eq!(CellValue::Number(100234.0).as_text(), "100234");
        assert_eq!(CellValue::Number(7.5).as_text(), "7.5");
        assert_eq!(CellValue::Bool(true).as_text(), "true");
    }

    #[test]
    fn test_row_out_of_range_is_empty() {
        let row = Row::new(vec!["a".into()]);
        assert_eq!(row.text(0), "a");
        assert_eq!(row.text(11), "");
    }

    #[test]
    fn test_cells_deserialize_from_json() {
        let row: Row =
            serde_json::from_str(r#"["Acme", null, 42, true, {"text": "Rich"}]"#).unwrap();
        assert_eq!(row.text(0), "Acme");
        assert_eq!(row.cell(1), &CellValue::Empty);
        assert_eq!(row.text(2), "42");
        assert_eq!(row.text(3), "true");
        assert_eq!(row.text(4), "Rich");
    }

    #[test]
    fn test_formula_cells_use_their_result() {
        let row: Row =
            serde_json::from_str(r#"[{"formula": "A1", "result": 5}, {"formula": "B1", "result": " Bob "}]"#)
                .unwrap();
        assert_eq!(row.text(0), "5");
        assert_eq!(row.text(1), "Bob");
    }

    #[test]
    fn test_unknown_objects_are_rejected() {
        assert!(serde_json::from_str::<Row>(r#"[{"formula": "A1"}]"#).is_err());
        assert!(serde_json::from_str::<Row>(r#"[{}]"#).is_err());
    }

    #[test]
    fn test_submission_uses_form_field_names() {
        let submission: Submission = serde_json::from_str(
            r#"{
                "dateISO": "2024-01-05",
                "company": "A",
                "blocks": [{
                    "woNumber": "4001",
                    "opNumber": "0010",
                    "workCenter": "MECH",
                    "rows": [{"employeeName": "Bob", "hours": "8"}]
                }]
            }"#,
        )
        .unwrap();
        assert_eq!(submission.date_iso, "2024-01-05");
        assert_eq!(submission.blocks[0].wo_number, "4001");
        assert_eq!(submission.blocks[0].op_short_text, "");
        assert_eq!(submission.blocks[0].rows[0].hours, "8");
    }

    #[test]
    fn test_selection_key() {
        let wo = WorkOrderEntry {
            wo_number: "4001".to_string(),
            op_number: "0010".to_string(),
            op_short_text: "Inspect".to_string(),
            wo_header: "Pump".to_string(),
            work_center: "MECH".to_string(),
        };
        assert_eq!(wo.selection_key(), "4001|0010|MECH");
    }
}
