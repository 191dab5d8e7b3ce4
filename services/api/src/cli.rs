use clap::{Args, Parser, Subcommand, ValueEnum};

use campus_placement::error::AppError;
use campus_placement::placements::reports::{CompanySortKey, SortDirection};

use crate::demo::{run_demo, run_season_report, DemoArgs, SeasonReportArgs};
use crate::server;

#[derive(Parser, Debug)]
#[command(
    name = "Campus Placement Engine",
    about = "Run the placement portal's eligibility, lifecycle, and reporting engine from the command line",
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
    /// Print placement reports for a demo season
    Report(SeasonReportArgs),
    /// Run an end-to-end CLI demo covering eligibility, apply, and review
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Populate the in-memory store with a sample recruiting season
    #[arg(long)]
    pub(crate) seed_demo: bool,
}

/// Company table column, as accepted on the command line.
#[derive(ValueEnum, Clone, Copy, Debug)]
pub(crate) enum SortColumn {
    Name,
    Visits,
    Applications,
    Placements,
}

impl SortColumn {
    pub(crate) fn into_key(self) -> CompanySortKey {
        match self {
            SortColumn::Name => CompanySortKey::Name,
            SortColumn::Visits => CompanySortKey::Visits,
            SortColumn::Applications => CompanySortKey::Applications,
            SortColumn::Placements => CompanySortKey::Placements,
        }
    }
}

pub(crate) fn direction(descending: bool) -> SortDirection {
    if descending {
        SortDirection::Descending
    } else {
        SortDirection::Ascending
    }
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Report(args) => run_season_report(args),
        Command::Demo(args) => run_demo(args),
    }
}
