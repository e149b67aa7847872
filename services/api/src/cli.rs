use crate::demo::{run_demo, run_fleet_report, DemoArgs, FleetReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use solar_ops::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Solar Ops",
    about = "Track solar installations and run their recurring maintenance schedule",
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
    /// Work with a whole fleet export offline
    Fleet {
        #[command(subcommand)]
        command: FleetCommand,
    },
    /// Run an end-to-end CLI demo covering intake, scheduling, and stats
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum FleetCommand {
    /// Generate a maintenance report for a fleet CSV export
    Report(FleetReportArgs),
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
        Command::Fleet {
            command: FleetCommand::Report(args),
        } => run_fleet_report(args),
        Command::Demo(args) => run_demo(args),
    }
}
