//! CLI command implementations.

pub mod consolidate;
pub mod copy;
pub mod migrate;
pub mod rekey;
pub mod seed;

use secrecy::SecretString;
use thiserror::Error;

use loanmitra_access::{PgDocumentStore, StoreError};

/// Errors shared by the CLI commands.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("missing environment variable: {0}")]
    MissingEnvVar(&'static str),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Connect to the store named by `DATABASE_URL`.
pub(crate) async fn connect_default() -> Result<PgDocumentStore, CommandError> {
    dotenvy::dotenv().ok();
    let url = std::env::var("DATABASE_URL")
        .map_err(|_| CommandError::MissingEnvVar("DATABASE_URL"))?;
    Ok(PgDocumentStore::connect(&SecretString::from(url)).await?)
}
