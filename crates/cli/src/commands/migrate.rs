//! Document-store schema migrations.
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` - `PostgreSQL` connection string

use super::{CommandError, connect_default};

/// Run the embedded migrations against `DATABASE_URL`.
pub async fn run() -> Result<(), CommandError> {
    let store = connect_default().await?;
    tracing::info!("Running document-store migrations...");
    store.migrate().await?;
    tracing::info!("Migrations complete");
    Ok(())
}
