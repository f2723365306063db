use crate::domain::model::ArtifactValue;
use crate::domain::ports::ArtifactWriter;
use crate::utils::error::Result;
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use std::collections::BTreeMap;

/// Collects cells and renders them into a single-sheet xlsx on `serialize`.
/// Text cells are written with the `@` (text) number format.
#[derive(Debug, Clone)]
pub struct XlsxArtifactWriter {
    sheet_name: String,
    cells: BTreeMap<(u32, u16), ArtifactValue>,
}

impl XlsxArtifactWriter {
    pub fn new(sheet_name: &str) -> Self {
        Self {
            sheet_name: sheet_name.to_string(),
            cells: BTreeMap::new(),
        }
    }
}

impl ArtifactWriter for XlsxArtifactWriter {
    fn write_cell(&mut self, row: u32, col: u16, value: ArtifactValue) -> Result<()> {
        if row == 0 || col == 0 {
            return Err(XlsxError::RowColumnLimitError.into());
        }
        self.cells.insert((row, col), value);
        Ok(())
    }

    fn serialize(&mut self) -> Result<Vec<u8>> {
        let mut workbook = Workbook::new();
        let text_format = Format::new().set_num_format("@");

        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&self.sheet_name)?;

        for (&(row, col), value) in &self.cells {
            match value {
                ArtifactValue::Text(text) => {
                    worksheet.write_string_with_format(row - 1, col - 1, text, &text_format)?;
                }
                ArtifactValue::Number(number) => {
                    worksheet.write_number(row - 1, col - 1, *number)?;
                }
            }
        }

        Ok(workbook.save_to_buffer()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{Data, Reader, Xlsx};
    use std::io::Cursor;

    #[test]
    fn test_serialized_workbook_reads_back() {
        let mut writer = XlsxArtifactWriter::new("Vendor Entry Sheet");
        writer
            .write_cell(4, 1, ArtifactValue::Text("05.01.2024".to_string()))
            .unwrap();
        writer
            .write_cell(4, 3, ArtifactValue::Text("007".to_string()))
            .unwrap();
        writer.write_cell(4, 8, ArtifactValue::Number(7.5)).unwrap();

        let bytes = writer.serialize().unwrap();

        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes)).unwrap();
        let range = workbook.worksheet_range("Vendor Entry Sheet").unwrap();
        assert_eq!(
            range.get_value((3, 0)),
            Some(&Data::String("05.01.2024".to_string()))
        );
        assert_eq!(range.get_value((3, 2)), Some(&Data::String("007".to_string())));
        assert_eq!(range.get_value((3, 7)), Some(&Data::Float(7.5)));
    }

    #[test]
    fn test_zero_based_positions_rejected() {
        let mut writer = XlsxArtifactWriter::new("Vendor Entry Sheet");
        assert!(writer
            .write_cell(0, 1, ArtifactValue::Number(1.0))
            .is_err());
        assert!(writer
            .write_cell(1, 0, ArtifactValue::Number(1.0))
            .is_err());
    }
}
