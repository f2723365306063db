use thiserror::Error;

#[derive(Error, Debug)]
pub enum TimesheetError {
    // Reference dataset
    #[error("Missing required table: {name}")]
    MissingTable { name: String },

    #[error("Table not found: {name}")]
    TableNotFound { name: String },

    // Submission validation
    #[error("Missing date")]
    MissingDate,

    #[error("Missing company")]
    MissingCompany,

    #[error("No work orders supplied")]
    NoWorkOrders,

    #[error("Work order block #{}: work order is incomplete", .block + 1)]
    IncompleteWorkOrder { block: usize },

    #[error("Block #{}, row #{}: missing person", .block + 1, .row + 1)]
    MissingPerson { block: usize, row: usize },

    #[error("Block #{}, row #{}: person not found", .block + 1, .row + 1)]
    PersonNotFound { block: usize, row: usize },

    #[error("Block #{}, row #{}: invalid hours", .block + 1, .row + 1)]
    InvalidHours { block: usize, row: usize },

    #[error("No valid lines")]
    NoValidLines,

    // Export delivery
    #[error("No lines provided")]
    NoLines,

    #[error("Missing email recipient")]
    MissingRecipient,

    #[error("Delivery failed: {message}")]
    DeliveryError { message: String },

    // Infrastructure
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Spreadsheet read error: {0}")]
    SpreadsheetReadError(#[from] calamine::Error),

    #[error("Spreadsheet write error: {0}")]
    SpreadsheetWriteError(#[from] rust_xlsxwriter::XlsxError),

    #[error("Template error: {message}")]
    TemplateError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl TimesheetError {
    /// True for failures caused by the submitted data rather than the environment.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            TimesheetError::MissingDate
                | TimesheetError::MissingCompany
                | TimesheetError::NoWorkOrders
                | TimesheetError::IncompleteWorkOrder { .. }
                | TimesheetError::MissingPerson { .. }
                | TimesheetError::PersonNotFound { .. }
                | TimesheetError::InvalidHours { .. }
                | TimesheetError::NoValidLines
                | TimesheetError::NoLines
                | TimesheetError::MissingRecipient
        )
    }

    /// Message shown to the person filling in the form.
    pub fn user_friendly_message(&self) -> String {
        match self {
            TimesheetError::MissingTable { .. } => {
                "Missing required sheets. Expected: Names and Work Orders.".to_string()
            }
            TimesheetError::MissingDate => "Please select a date.".to_string(),
            TimesheetError::MissingCompany => "Please select a company.".to_string(),
            TimesheetError::NoWorkOrders => "Add at least one work order.".to_string(),
            TimesheetError::IncompleteWorkOrder { block } => {
                format!("Work order block #{}: Please select a work order.", block + 1)
            }
            TimesheetError::MissingPerson { block, row } => {
                format!("Block #{}, row #{}: Select a person.", block + 1, row + 1)
            }
            TimesheetError::PersonNotFound { block, row } => {
                format!("Block #{}, row #{}: Person not found.", block + 1, row + 1)
            }
            TimesheetError::InvalidHours { block, row } => format!(
                "Block #{}, row #{}: Enter valid hours (> 0).",
                block + 1,
                row + 1
            ),
            TimesheetError::NoValidLines => "No valid people/hours entered yet.".to_string(),
            TimesheetError::MissingRecipient => "Missing email".to_string(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TimesheetError>;
