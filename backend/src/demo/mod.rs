//! Demo dataset and startup seeding wiring.

mod data;
mod startup;

pub use data::{DEMO_ADMIN_PASSWORD, DEMO_USER_PASSWORD, DemoDataError, DemoDataset, demo_dataset};
pub use startup::{StartupSeedingError, seed_demo_data_on_startup};
