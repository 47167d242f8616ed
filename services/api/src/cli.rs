use crate::export::{run_export, ExportCommand};
use crate::report::{run_report, ReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use impact_analyst::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "AI & Data Impact Analyst",
    about = "Score AI and data projects against weighted KPIs and export the report",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print the weighted assessment for a set of scores
    Report(ReportArgs),
    /// Export the full report as PDF or send it to the printer
    Export {
        #[command(subcommand)]
        command: ExportCommand,
    },
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Report(args) => run_report(args),
        Command::Export { command } => run_export(command).await,
    }
}
