use crate::domain::model::{CellValue, Row, Table};
use crate::domain::ports::ReferenceReader;
use crate::utils::error::{Result, TimesheetError};
use std::path::PathBuf;

/// A directory holding one `<table name>.csv` per table, header row included.
#[derive(Debug, Clone)]
pub struct CsvReferenceReader {
    dir: PathBuf,
}

impl CsvReferenceReader {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }
}

impl ReferenceReader for CsvReferenceReader {
    fn read_table(&self, name: &str) -> Result<Table> {
        let path = self.dir.join(format!("{}.csv", name));
        if !path.is_file() {
            return Err(TimesheetError::TableNotFound {
                name: name.to_string(),
            });
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(&path)?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(Row::new(
                record
                    .iter()
                    .map(|field| {
                        if field.is_empty() {
                            CellValue::Empty
                        } else {
                            CellValue::Text(field.to_string())
                        }
                    })
                    .collect(),
            ));
        }

        tracing::debug!("Read {} rows from {}", rows.len(), path.display());
        Ok(Table::new(rows))
    }

    fn describe(&self) -> String {
        "csv".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_reads_ragged_rows() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("Work Orders.csv"),
            "WO,OP,Header,Short,WC,Company\n4001,0010,Pump,\"Inspect, clean\",MECH,Acme\n4002\n",
        )
        .unwrap();

        let table = CsvReferenceReader::new(dir.path())
            .read_table("Work Orders")
            .unwrap();

        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[1].text(3), "Inspect, clean");
        assert_eq!(table.rows[1].text(5), "Acme");
        assert_eq!(table.rows[2].text(0), "4002");
        assert_eq!(table.rows[2].text(5), "");
    }

    #[test]
    fn test_missing_file_is_table_not_found() {
        let dir = TempDir::new().unwrap();

        let err = CsvReferenceReader::new(dir.path())
            .read_table("Names")
            .unwrap_err();

        assert!(matches!(err, TimesheetError::TableNotFound { .. }));
    }
}
