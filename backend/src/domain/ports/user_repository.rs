//! Port abstraction for user account persistence adapters and their errors.
use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::domain::error::Error;
use crate::domain::user::{UserAccount, Username};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
    }
}

impl From<UserPersistenceError> for Error {
    fn from(err: UserPersistenceError) -> Self {
        match err {
            UserPersistenceError::Connection { message } => Error::service_unavailable(message),
            UserPersistenceError::Query { message } => Error::internal(message),
        }
    }
}

/// Port for reading stored user accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch an account by its login name.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<UserAccount>, UserPersistenceError>;
}

/// In-memory implementation backed by preloaded accounts.
#[derive(Debug, Default, Clone)]
pub struct FixtureUserRepository {
    accounts: BTreeMap<Username, UserAccount>,
}

impl FixtureUserRepository {
    /// Build a repository serving the given accounts.
    #[must_use]
    pub fn with_accounts(accounts: impl IntoIterator<Item = UserAccount>) -> Self {
        Self {
            accounts: accounts
                .into_iter()
                .map(|account| (account.username().clone(), account))
                .collect(),
        }
    }
}

#[async_trait]
impl UserRepository for FixtureUserRepository {
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        Ok(self.accounts.get(username).cloned())
    }
}
