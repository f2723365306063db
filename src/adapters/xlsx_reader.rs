use crate::domain::model::{CellValue, Row, Table};
use crate::domain::ports::ReferenceReader;
use crate::utils::error::{Result, TimesheetError};
use calamine::{open_workbook_auto, Data, Reader, Sheets};
use chrono::Timelike;
use std::path::PathBuf;

/// Reference workbook on disk (xlsx, xlsm, xls, ods).
///
/// The file is reopened on every read so edits to the master sheet show up
/// on the next request.
#[derive(Debug, Clone)]
pub struct XlsxReferenceReader {
    path: PathBuf,
}

impl XlsxReferenceReader {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

impl ReferenceReader for XlsxReferenceReader {
    fn read_table(&self, name: &str) -> Result<Table> {
        let mut workbook: Sheets<_> = open_workbook_auto(&self.path)?;

        if !workbook.sheet_names().iter().any(|sheet| sheet == name) {
            return Err(TimesheetError::TableNotFound {
                name: name.to_string(),
            });
        }

        let range = workbook.worksheet_range(name)?;

        // Ranges start at the first used cell; pad so indices stay absolute.
        let (start_row, start_col) = range.start().unwrap_or((0, 0));
        let mut rows = vec![Row::default(); start_row as usize];
        for cells in range.rows() {
            let mut row = vec![CellValue::Empty; start_col as usize];
            row.extend(cells.iter().map(cell_value));
            rows.push(Row::new(row));
        }

        tracing::debug!(
            "Read {} rows from sheet '{}' in {}",
            rows.len(),
            name,
            self.path.display()
        );
        Ok(Table::new(rows))
    }

    fn describe(&self) -> String {
        "excel".to_string()
    }
}

fn cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(value) if value.time().num_seconds_from_midnight() == 0 => {
                CellValue::Text(value.format("%Y-%m-%d").to_string())
            }
            Some(value) => CellValue::Text(value.format("%Y-%m-%d %H:%M:%S").to_string()),
            None => CellValue::Text(data.to_string()),
        },
        other => CellValue::Text(other.to_string()),
    }
}
