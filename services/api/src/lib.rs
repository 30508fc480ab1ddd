mod cli;
mod infra;
mod routes;
mod server;
mod validate;

use autoquote::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
