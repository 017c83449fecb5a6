//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod discount_policy;
mod inventory_repository;
mod login_service;
mod order_repository;
mod order_service;
mod product_repository;
mod user_repository;

#[cfg(test)]
pub use discount_policy::MockDiscountPolicy;
pub use discount_policy::DiscountPolicy;
#[cfg(test)]
pub use inventory_repository::MockInventoryRepository;
pub use inventory_repository::{
    FixtureInventoryRepository, InventoryRepository, InventoryRepositoryError,
};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{AuthenticatedUser, FixtureLoginService, LoginService};
#[cfg(test)]
pub use order_repository::MockOrderRepository;
pub use order_repository::{
    FixtureOrderRepository, NewOrder, OrderPersistenceError, OrderRepository,
};
#[cfg(test)]
pub use order_service::MockOrderService;
pub use order_service::OrderService;
#[cfg(test)]
pub use product_repository::MockProductRepository;
pub use product_repository::{FixtureProductRepository, ProductRepository, ProductRepositoryError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{FixtureUserRepository, UserPersistenceError, UserRepository};
