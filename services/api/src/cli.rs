use crate::demo::{run_demo, run_grid_report, DemoArgs, GridReportArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use geogrid::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Geo-Grid Analytics",
    about = "Simulated local-search geo-grid analytics: sample grids, rank metrics, and white-label reports",
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
    /// Work with sampled geo grids from the command line
    Grid {
        #[command(subcommand)]
        command: GridCommand,
    },
    /// Run an end-to-end CLI demo covering grids, metrics, history, and sharing
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum GridCommand {
    /// Sample a grid and print its report and recommendations
    Report(GridReportArgs),
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
        Command::Grid {
            command: GridCommand::Report(args),
        } => run_grid_report(args),
        Command::Demo(args) => run_demo(args),
    }
}
