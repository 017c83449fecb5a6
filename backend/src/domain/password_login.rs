//! Credential verification against stored user accounts.
//!
//! Implements the [`LoginService`] port over any [`UserRepository`].
//! Password hashes are PHC-format Argon2 strings; verification happens
//! in-process and lookup failures collapse into a single `invalid
//! credentials` response so callers cannot probe for usernames.

use std::sync::Arc;

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use async_trait::async_trait;
use tracing::{debug, error};

use crate::domain::auth::LoginCredentials;
use crate::domain::error::{Error, ErrorCode};
use crate::domain::ports::{AuthenticatedUser, LoginService, UserRepository};
use crate::domain::user::{UserAccount, Username};

/// Hash a password into a PHC-format Argon2 string.
///
/// Used when provisioning accounts (for example the demo data seeder);
/// request handling only ever verifies.
pub fn hash_password(password: &str) -> Result<String, Error> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| Error::internal(format!("password hashing failed: {err}")))
}

/// [`LoginService`] implementation verifying Argon2 password hashes.
#[derive(Clone)]
pub struct PasswordLoginService {
    users: Arc<dyn UserRepository>,
}

impl PasswordLoginService {
    /// Build the service over a user repository.
    #[must_use]
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Load the account registered under the given username.
    ///
    /// # Errors
    ///
    /// Returns [`Error`] for:
    /// - `NotFound`: no account holds the username; the message names it as
    ///   `User with username: {username} not found`.
    /// - `ServiceUnavailable` / `Internal`: repository failure.
    pub async fn load_user(&self, username: &Username) -> Result<UserAccount, Error> {
        let account = self.users.find_by_username(username).await?;
        account.ok_or_else(|| Error::not_found(format!("User with username: {username} not found")))
    }
}

#[async_trait]
impl LoginService for PasswordLoginService {
    async fn authenticate(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<AuthenticatedUser, Error> {
        let Ok(username) = Username::new(credentials.username()) else {
            // No account can hold a name that fails validation.
            debug!("login rejected: username failed validation");
            return Err(Error::unauthorized("invalid credentials"));
        };

        let account = match self.load_user(&username).await {
            Ok(account) => account,
            Err(err) if err.code() == ErrorCode::NotFound => {
                debug!(username = %username, "login rejected: unknown username");
                return Err(Error::unauthorized("invalid credentials"));
            }
            Err(err) => return Err(err),
        };

        let parsed_hash = PasswordHash::new(account.password_hash()).map_err(|err| {
            error!(username = %username, %err, "stored password hash is not valid PHC");
            Error::internal("stored credentials are invalid")
        })?;

        if Argon2::default()
            .verify_password(credentials.password().as_bytes(), &parsed_hash)
            .is_err()
        {
            debug!(username = %username, "login rejected: password mismatch");
            return Err(Error::unauthorized("invalid credentials"));
        }

        Ok(AuthenticatedUser {
            user_id: account.id(),
            account_id: account.account_id(),
            roles: account.roles().clone(),
        })
    }
}
