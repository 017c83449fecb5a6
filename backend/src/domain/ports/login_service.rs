//! Driving port for login/authentication use-cases.
//!
//! In hexagonal terms this is a *driving* port: inbound adapters call it to
//! authenticate credentials without knowing (or importing) the backing
//! infrastructure. This makes HTTP handler tests deterministic because they
//! can substitute a test double instead of wiring persistence.

use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::domain::auth::LoginCredentials;
use crate::domain::error::Error;
use crate::domain::user::{AccountId, Role, UserId};

/// Identity established by a successful login.
///
/// Carries everything the session needs to persist: the user record id, the
/// commerce account that owns orders, and the granted roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Stable user identifier.
    pub user_id: UserId,
    /// Commerce identity owning the user's orders.
    pub account_id: AccountId,
    /// Roles granted to the user.
    pub roles: BTreeSet<Role>,
}

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated identity.
    ///
    /// Fails with `Unauthorized` and the message `invalid credentials` for
    /// both unknown usernames and wrong passwords, so responses do not leak
    /// which usernames exist.
    async fn authenticate(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<AuthenticatedUser, Error>;
}

/// In-memory authenticator recognising the demo shop accounts.
///
/// `user1` / `pass123` authenticates as a shopper and `admin` / `admin123`
/// as a store administrator. Handler tests use this double to avoid paying
/// the Argon2 verification cost on every request.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoginService;

#[async_trait]
impl LoginService for FixtureLoginService {
    async fn authenticate(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<AuthenticatedUser, Error> {
        match (credentials.username(), credentials.password()) {
            ("user1", "pass123") => Ok(AuthenticatedUser {
                user_id: UserId::new(1),
                account_id: AccountId::new(1),
                roles: BTreeSet::from([Role::User]),
            }),
            ("admin", "admin123") => Ok(AuthenticatedUser {
                user_id: UserId::new(2),
                account_id: AccountId::new(2),
                roles: BTreeSet::from([Role::User, Role::Admin]),
            }),
            _ => Err(Error::unauthorized("invalid credentials")),
        }
    }
}
