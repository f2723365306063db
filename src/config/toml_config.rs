use crate::adapters::mailer::DEFAULT_RESEND_ENDPOINT;
use crate::core::index::TableNames;
use crate::core::service::ExportSettings;
use crate::utils::error::{Result, TimesheetError};
use crate::utils::validation::{
    validate_email_address, validate_file_extension, validate_non_empty_string, validate_path,
    validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env pattern"));

const TEMPLATE_EXTENSIONS: [&str; 2] = ["xlsx", "xlsm"];
const REFERENCE_EXTENSIONS: [&str; 6] = ["xlsx", "xlsm", "xlsb", "xls", "ods", "json"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub reference: ReferenceConfig,
    pub export: ExportConfig,
    pub email: EmailConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceConfig {
    /// Workbook, `.json` file, or directory of `<table>.csv` files.
    pub path: String,
    pub names_table: String,
    pub work_orders_table: String,
}

impl Default for ReferenceConfig {
    fn default() -> Self {
        let tables = TableNames::default();
        Self {
            path: "data/Master App Timesheet.xlsx".to_string(),
            names_table: tables.names,
            work_orders_table: tables.work_orders,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub sheet_name: String,
    pub output_path: String,
    /// Workbook whose `sheet_name` sheet is filled from row 4.
    pub template_path: Option<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            sheet_name: ExportSettings::default().sheet_name,
            output_path: "./output".to_string(),
            template_path: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    pub api_endpoint: String,
    pub api_key: Option<String>,
    pub from: String,
    pub subject: String,
    pub html: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        let settings = ExportSettings::default();
        Self {
            api_endpoint: DEFAULT_RESEND_ENDPOINT.to_string(),
            api_key: None,
            from: "onboarding@resend.dev".to_string(),
            subject: settings.email_subject,
            html: settings.email_html,
        }
    }
}

impl AppConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// Parses TOML after substituting `${VAR}` references from the environment.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| TimesheetError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Unset variables are left as written.
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    /// Fills email settings left unset in the file from `RESEND_API_KEY` / `EMAIL_FROM`.
    pub fn with_env_fallbacks(self) -> Self {
        self.with_fallbacks_from(|name| std::env::var(name).ok())
    }

    fn with_fallbacks_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let key_unset = self
            .email
            .api_key
            .as_deref()
            .map_or(true, |key| key.trim().is_empty() || key.starts_with("${"));
        if key_unset {
            self.email.api_key = lookup("RESEND_API_KEY").filter(|key| !key.trim().is_empty());
        }

        if let Some(from) = lookup("EMAIL_FROM") {
            if !from.trim().is_empty() && self.email.from == EmailConfig::default().from {
                self.email.from = from;
            }
        }

        self
    }

    pub fn table_names(&self) -> TableNames {
        TableNames {
            names: self.reference.names_table.clone(),
            work_orders: self.reference.work_orders_table.clone(),
        }
    }

    pub fn export_settings(&self) -> ExportSettings {
        ExportSettings {
            tables: self.table_names(),
            sheet_name: self.export.sheet_name.clone(),
            template_path: self.export.template_path.as_ref().map(PathBuf::from),
            email_subject: self.email.subject.clone(),
            email_html: self.email.html.clone(),
        }
    }

    /// The configured API key, if email delivery is possible.
    pub fn email_api_key(&self) -> Option<&str> {
        self.email
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty() && !key.starts_with("${"))
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_path("reference.path", &self.reference.path)?;
        if !Path::new(&self.reference.path).is_dir() {
            validate_file_extension("reference.path", &self.reference.path, &REFERENCE_EXTENSIONS)?;
        }
        validate_non_empty_string("reference.names_table", &self.reference.names_table)?;
        validate_non_empty_string(
            "reference.work_orders_table",
            &self.reference.work_orders_table,
        )?;

        validate_non_empty_string("export.sheet_name", &self.export.sheet_name)?;
        validate_path("export.output_path", &self.export.output_path)?;
        if let Some(template) = &self.export.template_path {
            validate_path("export.template_path", template)?;
            validate_file_extension("export.template_path", template, &TEMPLATE_EXTENSIONS)?;
        }

        validate_url("email.api_endpoint", &self.email.api_endpoint)?;
        validate_email_address("email.from", &self.email.from)?;
        validate_non_empty_string("email.subject", &self.email.subject)?;

        tracing::debug!("Configuration validation passed");
        Ok(())
    }
}
