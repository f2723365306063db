use crate::domain::model::Table;
use crate::domain::ports::ReferenceReader;
use crate::utils::error::{Result, TimesheetError};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Tables held in memory, keyed by sheet name.
///
/// Also backs JSON reference files of the form
/// `{ "Names": [[cell, ...], ...], "Work Orders": [...] }`, where a cell is a
/// string, number, boolean, `null`, a `{ "text": "..." }` rich-text object, or a
/// `{ "formula": "...", "result": ... }` formula with its cached value.
#[derive(Debug, Clone)]
pub struct MemoryWorkbook {
    tables: HashMap<String, Table>,
    source: String,
}

impl MemoryWorkbook {
    pub fn new() -> Self {
        Self {
            tables: HashMap::new(),
            source: "memory".to_string(),
        }
    }

    pub fn with_table(mut self, name: &str, table: Table) -> Self {
        self.tables.insert(name.to_string(), table);
        self
    }

    pub fn from_json_slice(data: &[u8]) -> Result<Self> {
        let tables: HashMap<String, Table> = serde_json::from_slice(data)?;
        Ok(Self {
            tables,
            source: "json".to_string(),
        })
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_json_slice(&data)
    }
}

impl Default for MemoryWorkbook {
    fn default() -> Self {
        Self::new()
    }
}

impl ReferenceReader for MemoryWorkbook {
    fn read_table(&self, name: &str) -> Result<Table> {
        self.tables
            .get(name)
            .cloned()
            .ok_or_else(|| TimesheetError::TableNotFound {
                name: name.to_string(),
            })
    }

    fn describe(&self) -> String {
        self.source.clone()
    }
}

/// JSON reference file, re-read on every table request.
#[derive(Debug, Clone)]
pub struct JsonReferenceReader {
    path: PathBuf,
}

impl JsonReferenceReader {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

impl ReferenceReader for JsonReferenceReader {
    fn read_table(&self, name: &str) -> Result<Table> {
        MemoryWorkbook::from_json_file(&self.path)?.read_table(name)
    }

    fn describe(&self) -> String {
        "json".to_string()
    }
}
