use crate::commands::{
    self, CategoriesArgs, ClientsArgs, DemoArgs, SearchArgs, SimilarArgs, SummaryArgs,
};
use acs_reference::config::AppConfig;
use acs_reference::error::AppError;
use acs_reference::telemetry;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "ACS Client Reference Finder",
    about = "Query the client reference matching engine from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Find reference clients matching a target score and job category
    Similar(SimilarArgs),
    /// Show the aggregate posting summary for one client
    Summary(SummaryArgs),
    /// Search scored clients by name fragment
    Search(SearchArgs),
    /// List every job category present in the posting export
    Categories(CategoriesArgs),
    /// List all scored clients with their complexity level
    Clients(ClientsArgs),
    /// Walk through the query surface end to end (default command)
    Demo(DemoArgs),
}

pub(crate) fn run() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Demo(DemoArgs::default()));

    match command {
        Command::Similar(args) => commands::run_similar(&config, args),
        Command::Summary(args) => commands::run_summary(&config, args),
        Command::Search(args) => commands::run_search(&config, args),
        Command::Categories(args) => commands::run_categories(&config, args),
        Command::Clients(args) => commands::run_clients(&config, args),
        Command::Demo(args) => commands::run_demo(&config, args),
    }
}
