pub mod toml_config;

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "wo-timesheet")]
#[command(about = "Work-order timesheet options and vendor-entry export")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Reference workbook, JSON file or CSV directory (overrides the config file)
    #[arg(long, global = true)]
    pub reference: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print the options derived from the reference dataset as JSON
    Options {
        #[arg(long)]
        pretty: bool,
    },
    /// Validate a submission and download or email the vendor-entry sheet
    Export {
        /// Submission JSON (dateISO, company, blocks)
        #[arg(short, long)]
        submission: String,

        /// Override the submission date (YYYY-MM-DD); defaults to today when the submission has none
        #[arg(long)]
        date: Option<String>,

        /// Override the submission company
        #[arg(long)]
        company: Option<String>,

        /// Email the sheet to this address instead of saving it
        #[arg(long)]
        email: Option<String>,

        /// Directory for downloaded sheets (overrides the config file)
        #[arg(short, long)]
        output: Option<String>,

        /// Validate and print the export lines without writing anything
        #[arg(long)]
        dry_run: bool,
    },
}
