use crate::adapters::xlsx_template::TemplateArtifactWriter;
use crate::adapters::xlsx_writer::XlsxArtifactWriter;
use crate::core::artifact::build_vendor_entry;
use crate::core::assembler::assemble_lines;
use crate::core::index::{load_index, TableNames};
use crate::domain::model::{
    Artifact, DeliveryOutcome, ExportLine, OptionsSnapshot, OutgoingMessage, OutputMode,
    ReferenceIndex, Submission,
};
use crate::domain::ports::{MessageSender, ReferenceReader, Storage};
use crate::utils::error::{Result, TimesheetError};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct ExportSettings {
    pub tables: TableNames,
    pub sheet_name: String,
    /// Workbook to fill in. Without one a fresh sheet with its own headings is generated.
    pub template_path: Option<PathBuf>,
    pub email_subject: String,
    pub email_html: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            tables: TableNames::default(),
            sheet_name: "Vendor Entry Sheet".to_string(),
            template_path: None,
            email_subject: "Vendor Entry Sheet".to_string(),
            email_html: "<p>Attached is your export.</p>".to_string(),
        }
    }
}

/// Reference data in, vendor-entry spreadsheet out.
///
/// Collaborators are injected once at start-up; every call re-reads the
/// reference tables and keeps no state between calls.
pub struct ExportService<S: Storage> {
    reader: Box<dyn ReferenceReader>,
    storage: S,
    mailer: Option<Arc<dyn MessageSender>>,
    settings: ExportSettings,
}

impl<S: Storage> ExportService<S> {
    pub fn new(reader: Box<dyn ReferenceReader>, storage: S, settings: ExportSettings) -> Self {
        Self {
            reader,
            storage,
            mailer: None,
            settings,
        }
    }

    pub fn with_mailer(mut self, mailer: Arc<dyn MessageSender>) -> Self {
        self.mailer = Some(mailer);
        self
    }

    pub fn index(&self) -> Result<ReferenceIndex> {
        load_index(self.reader.as_ref(), &self.settings.tables)
    }

    pub fn options(&self) -> Result<OptionsSnapshot> {
        let index = self.index()?;
        tracing::info!(
            "Loaded options for {} companies from {}",
            index.companies.len(),
            self.reader.describe()
        );
        Ok(OptionsSnapshot {
            ok: true,
            source: self.reader.describe(),
            index,
        })
    }

    pub fn assemble(&self, submission: &Submission) -> Result<Vec<ExportLine>> {
        let index = self.index()?;
        assemble_lines(submission, &index)
    }

    pub fn build_artifact(&self, lines: &[ExportLine]) -> Result<Artifact> {
        match &self.settings.template_path {
            Some(template) => {
                let mut writer = TemplateArtifactWriter::new(template, &self.settings.sheet_name);
                build_vendor_entry(lines, &mut writer)
            }
            None => {
                let mut writer = XlsxArtifactWriter::new(&self.settings.sheet_name);
                build_vendor_entry(lines, &mut writer)
            }
        }
    }

    pub async fn deliver(&self, artifact: Artifact, mode: &OutputMode) -> Result<DeliveryOutcome> {
        match mode {
            OutputMode::Download => {
                let path = self
                    .storage
                    .write_file(&artifact.filename, &artifact.bytes)
                    .await?;
                tracing::info!("Saved {} ({} bytes)", path, artifact.bytes.len());
                Ok(DeliveryOutcome::Saved { path })
            }
            OutputMode::Email { to } => {
                let to = require_recipient(to)?;
                let mailer = self.mailer.as_ref().ok_or_else(|| TimesheetError::ConfigError {
                    message: "Email delivery is not configured (missing API key)".to_string(),
                })?;

                let message = OutgoingMessage {
                    to: to.to_string(),
                    subject: self.settings.email_subject.clone(),
                    html: self.settings.email_html.clone(),
                    attachment: artifact,
                };
                tracing::info!(
                    "Emailing {} to {}",
                    message.attachment.filename,
                    message.to
                );
                let id = mailer.send(&message).await?;
                Ok(DeliveryOutcome::Emailed {
                    to: message.to,
                    id,
                })
            }
        }
    }

    pub async fn export(&self, submission: &Submission, mode: &OutputMode) -> Result<DeliveryOutcome> {
        if let OutputMode::Email { to } = mode {
            require_recipient(to)?;
        }

        let lines = self.assemble(submission)?;
        let artifact = self.build_artifact(&lines)?;
        self.deliver(artifact, mode).await
    }
}

fn require_recipient(to: &str) -> Result<&str> {
    let to = to.trim();
    if to.is_empty() {
        Err(TimesheetError::MissingRecipient)
    } else {
        Ok(to)
    }
}
