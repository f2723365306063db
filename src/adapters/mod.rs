// Adapters layer: concrete implementations of the domain ports.

pub mod csv_reader;
pub mod mailer;
pub mod memory;
pub mod storage;
pub mod xlsx_reader;
pub mod xlsx_template;
pub mod xlsx_writer;

use crate::domain::ports::ReferenceReader;
use std::path::Path;

/// Picks a reader by path: a directory of CSV files, a `.json` file, or a spreadsheet.
pub fn reader_for_path(path: &str) -> Box<dyn ReferenceReader> {
    if Path::new(path).is_dir() {
        return Box::new(csv_reader::CsvReferenceReader::new(path));
    }

    let extension = Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("json") => Box::new(memory::JsonReferenceReader::new(path)),
        Some(_) => Box::new(xlsx_reader::XlsxReferenceReader::new(path)),
        None => Box::new(csv_reader::CsvReferenceReader::new(path)),
    }
}
