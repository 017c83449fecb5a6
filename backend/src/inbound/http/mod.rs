//! HTTP inbound adapter exposing REST endpoints.

pub mod cache_control;
pub mod cart;
pub mod error;
pub mod health;
pub mod landing;
pub mod orders;
pub mod products;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;
