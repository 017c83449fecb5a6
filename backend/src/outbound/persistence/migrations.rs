//! Embedded schema migrations applied at startup.
//!
//! Diesel migrations run on a synchronous connection, so the runner pushes
//! the work onto the blocking thread pool and adapts the async connection
//! type through [`AsyncConnectionWrapper`].

use diesel::Connection;
use diesel_async::AsyncPgConnection;
use diesel_async::async_connection_wrapper::AsyncConnectionWrapper;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use thiserror::Error;
use tracing::info;

/// Embedded migrations from the backend/migrations directory.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Errors raised while applying embedded migrations.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// Connecting to the database for the migration run failed.
    #[error("failed to connect for migrations: {0}")]
    Connection(String),
    /// One of the pending migrations failed to apply.
    #[error("failed to apply migrations: {0}")]
    Apply(String),
    /// The blocking migration task was cancelled or panicked.
    #[error("migration task failed: {0}")]
    Task(String),
}

/// Applies all pending embedded migrations against `database_url`.
///
/// # Errors
/// Returns [`MigrationError`] when connecting fails, a migration fails to
/// apply, or the blocking task does not complete.
pub async fn run_startup_migrations(database_url: &str) -> Result<(), MigrationError> {
    let database_url = database_url.to_owned();
    let applied = tokio::task::spawn_blocking(move || {
        let mut connection = AsyncConnectionWrapper::<AsyncPgConnection>::establish(&database_url)
            .map_err(|err| MigrationError::Connection(format!("{err:?}")))?;
        connection
            .run_pending_migrations(MIGRATIONS)
            .map(|versions| versions.len())
            .map_err(|err| MigrationError::Apply(format!("{err:?}")))
    })
    .await
    .map_err(|err| MigrationError::Task(err.to_string()))??;
    if applied > 0 {
        info!(applied, "database migrations applied");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::MigrationError;

    #[rstest]
    #[case(
        MigrationError::Connection("refused".into()),
        "failed to connect for migrations: refused"
    )]
    #[case(
        MigrationError::Apply("duplicate table".into()),
        "failed to apply migrations: duplicate table"
    )]
    #[case(MigrationError::Task("cancelled".into()), "migration task failed: cancelled")]
    fn errors_preserve_diagnostics(#[case] error: MigrationError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }
}
