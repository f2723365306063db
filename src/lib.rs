pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::storage::LocalStorage;
pub use crate::config::toml_config::AppConfig;
pub use crate::core::service::{ExportService, ExportSettings};
pub use crate::domain::model::{DeliveryOutcome, ExportLine, OutputMode, ReferenceIndex, Submission};
pub use crate::utils::error::{Result, TimesheetError};
