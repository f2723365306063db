use crate::domain::model::ArtifactValue;
use crate::domain::ports::ArtifactWriter;
use crate::utils::error::{Result, TimesheetError};
use std::collections::BTreeMap;
use std::io::Cursor;
use std::path::PathBuf;

/// Fills an existing workbook. Everything not written to (headings, logos,
/// other sheets) is kept as the template has it.
///
/// The template is reopened on every `serialize`, so edits to the file are
/// picked up without a restart.
#[derive(Debug, Clone)]
pub struct TemplateArtifactWriter {
    template_path: PathBuf,
    sheet_name: String,
    cells: BTreeMap<(u32, u16), ArtifactValue>,
}

impl TemplateArtifactWriter {
    pub fn new<P: Into<PathBuf>>(template_path: P, sheet_name: &str) -> Self {
        Self {
            template_path: template_path.into(),
            sheet_name: sheet_name.to_string(),
            cells: BTreeMap::new(),
        }
    }
}

impl ArtifactWriter for TemplateArtifactWriter {
    fn has_headings(&self) -> bool {
        true
    }

    fn write_cell(&mut self, row: u32, col: u16, value: ArtifactValue) -> Result<()> {
        if row == 0 || col == 0 {
            return Err(TimesheetError::TemplateError {
                message: format!("cell positions are 1-based, got row {} col {}", row, col),
            });
        }
        self.cells.insert((row, col), value);
        Ok(())
    }

    fn serialize(&mut self) -> Result<Vec<u8>> {
        if !self.template_path.is_file() {
            return Err(TimesheetError::ConfigError {
                message: format!("Template not found: {}", self.template_path.display()),
            });
        }

        let mut book = umya_spreadsheet::reader::xlsx::read(&self.template_path).map_err(|e| {
            TimesheetError::TemplateError {
                message: format!("cannot open {}: {}", self.template_path.display(), e),
            }
        })?;

        let sheet = book
            .get_sheet_by_name_mut(&self.sheet_name)
            .ok_or_else(|| TimesheetError::ConfigError {
                message: format!("Missing sheet \"{}\" in template", self.sheet_name),
            })?;

        for (&(row, col), value) in &self.cells {
            let cell = sheet.get_cell_mut((u32::from(col), row));
            match value {
                ArtifactValue::Text(text) => {
                    cell.set_value_string(text.as_str());
                    cell.get_style_mut()
                        .get_number_format_mut()
                        .set_format_code("@");
                }
                ArtifactValue::Number(number) => {
                    cell.set_value_number(*number);
                }
            }
        }

        tracing::debug!(
            "Filled {} cells of '{}' from template {}",
            self.cells.len(),
            self.sheet_name,
            self.template_path.display()
        );

        let mut buffer = Cursor::new(Vec::new());
        umya_spreadsheet::writer::xlsx::write_writer(&book, &mut buffer).map_err(|e| {
            TimesheetError::TemplateError {
                message: format!("cannot write workbook: {}", e),
            }
        })?;
        Ok(buffer.into_inner())
    }
}
