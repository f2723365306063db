use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use wo_timesheet::adapters::mailer::ResendMailer;
use wo_timesheet::adapters::reader_for_path;
use wo_timesheet::config::Command;
use wo_timesheet::core::assembler::{block_total, grand_total};
use wo_timesheet::utils::{logger, validation::Validate};
use wo_timesheet::{
    AppConfig, CliConfig, DeliveryOutcome, ExportService, LocalStorage, OutputMode, Submission,
    TimesheetError,
};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    if let Err(e) = run(cli).await {
        let exit_code = match e.downcast_ref::<TimesheetError>() {
            Some(err) if err.is_validation() => {
                tracing::warn!("Submission rejected: {}", err);
                eprintln!("❌ Fix needed: {}", err.user_friendly_message());
                2
            }
            Some(err) => {
                tracing::error!("❌ {}", err);
                eprintln!("❌ {}", err.user_friendly_message());
                1
            }
            None => {
                tracing::error!("❌ {:#}", e);
                eprintln!("❌ {:#}", e);
                1
            }
        };
        std::process::exit(exit_code);
    }
}

async fn run(cli: CliConfig) -> anyhow::Result<()> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("Failed to load config file '{}'", path))?,
        None => AppConfig::default(),
    }
    .with_env_fallbacks();

    if let Some(reference) = &cli.reference {
        config.reference.path = reference.clone();
    }
    if let Command::Export {
        output: Some(output),
        ..
    } = &cli.command
    {
        config.export.output_path = output.clone();
    }

    config.validate()?;
    tracing::debug!("Using reference dataset at {}", config.reference.path);

    let reader = reader_for_path(&config.reference.path);
    let storage = LocalStorage::new(config.export.output_path.clone());
    let mut service = ExportService::new(reader, storage, config.export_settings());
    if let Some(api_key) = config.email_api_key() {
        let mailer = ResendMailer::new(
            config.email.api_endpoint.clone(),
            api_key.to_string(),
            config.email.from.clone(),
        );
        service = service.with_mailer(Arc::new(mailer));
    }

    match cli.command {
        Command::Options { pretty } => {
            let snapshot = service.options()?;
            let json = if pretty {
                serde_json::to_string_pretty(&snapshot)?
            } else {
                serde_json::to_string(&snapshot)?
            };
            println!("{}", json);
        }
        Command::Export {
            submission,
            date,
            company,
            email,
            dry_run,
            ..
        } => {
            let content = std::fs::read_to_string(&submission)
                .with_context(|| format!("Failed to read submission '{}'", submission))?;
            let mut input: Submission = serde_json::from_str(&content)
                .with_context(|| format!("Submission '{}' is not valid JSON", submission))?;

            if let Some(date) = date {
                input.date_iso = date;
            } else if input.date_iso.trim().is_empty() {
                input.date_iso = chrono::Utc::now().format("%Y-%m-%d").to_string();
                tracing::info!("No date in submission, using {}", input.date_iso);
            }
            if let Some(company) = company {
                input.company = company;
            }

            for (i, block) in input.blocks.iter().enumerate() {
                tracing::info!(
                    "Block #{} {} / {}: {:.2} h",
                    i + 1,
                    block.wo_number,
                    block.op_number,
                    block_total(block)
                );
            }
            println!("Total hours: {:.2}", grand_total(&input.blocks));

            if dry_run {
                tracing::info!("🔍 DRY RUN MODE - nothing will be written or sent");
                let lines = service.assemble(&input)?;
                println!("{}", serde_json::to_string_pretty(&lines)?);
                return Ok(());
            }

            let mode = match email {
                Some(to) => OutputMode::Email { to },
                None => OutputMode::Download,
            };

            match service.export(&input, &mode).await? {
                DeliveryOutcome::Saved { path } => {
                    tracing::info!("✅ Vendor entry sheet saved");
                    println!("📁 Saved to: {}", path);
                }
                DeliveryOutcome::Emailed { to, id } => {
                    tracing::info!("✅ Vendor entry sheet emailed (id {:?})", id);
                    println!("📧 Email sent to {}", to);
                }
            }
        }
    }

    Ok(())
}
