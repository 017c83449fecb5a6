//! Startup seeding orchestration.

use thiserror::Error;
use tracing::info;

use crate::demo::data::{DemoDataError, demo_dataset};
use crate::outbound::persistence::{DbPool, DemoSeedError, DieselDemoSeedRepository, SeedOutcome};

/// Errors returned while executing startup seeding.
#[derive(Debug, Error)]
pub enum StartupSeedingError {
    /// The demo dataset could not be assembled.
    #[error("demo dataset error: {0}")]
    Dataset(#[from] DemoDataError),
    /// Writing the demo data failed.
    #[error("demo seeding error: {0}")]
    Seeding(#[from] DemoSeedError),
}

/// Apply the demo dataset on startup when enabled and a database is
/// configured.
///
/// Fixture mode serves the demo data directly, so a missing pool skips
/// seeding rather than failing.
///
/// # Errors
/// Returns [`StartupSeedingError`] when dataset assembly or the seeding
/// run fails.
pub async fn seed_demo_data_on_startup(
    seed_demo_data: bool,
    db_pool: Option<&DbPool>,
) -> Result<Option<SeedOutcome>, StartupSeedingError> {
    if !seed_demo_data {
        info!(reason = "disabled", "demo data seeding skipped");
        return Ok(None);
    }

    let Some(db_pool) = db_pool else {
        info!(reason = "no database", "demo data seeding skipped");
        return Ok(None);
    };

    let dataset = demo_dataset()?;
    let repository = DieselDemoSeedRepository::new(db_pool.clone());
    let outcome = repository.seed(&dataset).await?;

    match outcome {
        SeedOutcome::Applied => {
            info!(
                categories = dataset.categories.len(),
                products = dataset.products.len(),
                accounts = dataset.accounts.len(),
                orders = dataset.orders.len(),
                "demo data seeding applied"
            );
        }
        SeedOutcome::AlreadySeeded => {
            info!("demo data already seeded; skipping");
        }
    }

    Ok(Some(outcome))
}
