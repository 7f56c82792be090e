use crate::report::{run_score_report, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use idea_scorer::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Idea Scorer",
    about = "Normalize business idea exports and rank them with weighted multi-criteria scores",
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
    /// Score a CSV export and print a ranked report
    Score(ScoreArgs),
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
        Command::Score(args) => run_score_report(args),
    }
}
