use crate::infra::{export_coordinator, ScoreInputArgs};
use chrono::Local;
use clap::{Args, Subcommand};
use impact_analyst::config::AppConfig;
use impact_analyst::error::AppError;
use impact_analyst::telemetry;
use std::path::PathBuf;
use tracing::info;

#[derive(Subcommand, Debug)]
pub(crate) enum ExportCommand {
    /// Render the fully expanded report to a dated PDF file
    Pdf(ExportArgs),
    /// Send the fully expanded report to the print spooler
    Print(PrintArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct PrintArgs {
    #[command(flatten)]
    pub(crate) input: ScoreInputArgs,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ExportArgs {
    #[command(flatten)]
    pub(crate) input: ScoreInputArgs,
    /// Directory for the PDF (defaults to APP_EXPORT_OUTPUT_DIR)
    #[arg(long)]
    pub(crate) output_dir: Option<PathBuf>,
}

pub(crate) async fn run_export(command: ExportCommand) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    let exports = export_coordinator(&config.export);

    match command {
        ExportCommand::Pdf(args) => {
            let session = args.input.build_session()?.into_shared();
            let report = exports
                .export_pdf(&session, Local::now().date_naive())
                .await?;
            let dir = args.output_dir.unwrap_or(config.export.output_dir);
            let path = report.write_to(&dir)?;
            info!(path = %path.display(), "pdf written");
            println!("{}", path.display());
        }
        ExportCommand::Print(args) => {
            let session = args.input.build_session()?.into_shared();
            exports.export_print(&session).await?;
            println!("Druckauftrag übermittelt.");
        }
    }

    Ok(())
}

