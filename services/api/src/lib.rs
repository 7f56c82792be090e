mod cli;
mod infra;
mod report;
mod routes;
mod server;

use idea_scorer::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
