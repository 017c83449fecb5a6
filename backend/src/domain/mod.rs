//! Domain primitives, aggregates, and use-case services.
//!
//! Purpose: Define strongly typed domain entities and the services that
//! orchestrate them, independent of any transport or store. Keep types
//! immutable where practical and document invariants and serialisation
//! contracts (serde) in each type's Rustdoc. Ports under [`ports`] mark the
//! hexagonal boundary; adapters live in the inbound and outbound layers.

pub mod auth;
pub mod cart;
pub mod catalogue;
pub mod discounts;
pub mod error;
pub mod order;
pub mod order_service;
pub mod password_login;
pub mod ports;
pub mod trace_id;
pub mod user;

pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::cart::{Cart, CartValidationError};
pub use self::catalogue::{CategoryId, Product, ProductCategory, ProductId};
pub use self::discounts::StandardDiscountPolicy;
pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::order::{
    Order, OrderId, OrderLine, OrderStatus, OrderValidationError, Receipt, ReceiptLine,
};
pub use self::order_service::OrderProcessingService;
pub use self::password_login::{PasswordLoginService, hash_password};
pub use self::trace_id::TraceId;
pub use self::user::{AccountId, Role, UserAccount, UserId, UserValidationError, Username};
