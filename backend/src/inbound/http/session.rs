//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Provides a thin wrapper around Actix sessions so handlers only deal with
//! domain-friendly operations: persisting a login, enforcing role checks,
//! and carrying the visitor's cart. Everything lives in the session cookie;
//! tampered values are logged and treated as absent rather than failing the
//! request outright.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use serde::de::DeserializeOwned;

use crate::domain::ports::AuthenticatedUser;
use crate::domain::{AccountId, Cart, Error, Role, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const ACCOUNT_ID_KEY: &str = "account_id";
pub(crate) const ROLES_KEY: &str = "roles";
pub(crate) const CART_KEY: &str = "cart";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated identity in the session cookie.
    pub fn persist_login(&self, user: &AuthenticatedUser) -> Result<(), Error> {
        self.insert(USER_ID_KEY, &user.user_id)?;
        self.insert(ACCOUNT_ID_KEY, &user.account_id)?;
        self.insert(ROLES_KEY, &user.roles)
    }

    /// Drop the whole session, ending the login and discarding the cart.
    pub fn clear(&self) {
        self.0.purge();
    }

    /// Fetch the current user id from the session, if present.
    pub fn user_id(&self) -> Option<UserId> {
        self.get_or_warn(USER_ID_KEY)
    }

    /// Roles stored for the current login; empty when not logged in.
    pub fn roles(&self) -> std::collections::BTreeSet<Role> {
        self.get_or_warn(ROLES_KEY).unwrap_or_default()
    }

    /// Require an authenticated identity or return `401 Unauthorized`.
    pub fn require_login(&self) -> Result<AuthenticatedUser, Error> {
        let Some(user_id) = self.user_id() else {
            return Err(Error::unauthorized("login required"));
        };
        let Some(account_id) = self.get_or_warn::<AccountId>(ACCOUNT_ID_KEY) else {
            // A user id without an account id means a stale or tampered
            // cookie; treat it as logged out.
            tracing::warn!(user_id = %user_id, "session missing account id");
            return Err(Error::unauthorized("login required"));
        };
        Ok(AuthenticatedUser {
            user_id,
            account_id,
            roles: self.roles(),
        })
    }

    /// Require a login holding the given role.
    ///
    /// Missing login maps to `401 Unauthorized`; a login without the role
    /// maps to `403 Forbidden`.
    pub fn require_role(&self, role: Role) -> Result<AuthenticatedUser, Error> {
        let user = self.require_login()?;
        if !user.roles.contains(&role) {
            return Err(Error::forbidden(format!("{role} role required")));
        }
        Ok(user)
    }

    /// The visitor's cart; empty when none has been stored yet.
    pub fn cart(&self) -> Cart {
        self.get_or_warn(CART_KEY).unwrap_or_default()
    }

    /// Persist the visitor's cart in the session cookie.
    pub fn store_cart(&self, cart: &Cart) -> Result<(), Error> {
        self.insert(CART_KEY, cart)
    }

    /// Discard the stored cart, keeping the rest of the session.
    pub fn clear_cart(&self) {
        self.0.remove(CART_KEY);
    }

    fn insert(&self, key: &str, value: &impl serde::Serialize) -> Result<(), Error> {
        self.0
            .insert(key, value)
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    fn get_or_warn<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.0.get::<T>(key) {
            Ok(value) => value,
            Err(error) => {
                tracing::warn!("invalid {key} value in session cookie: {error}");
                None
            }
        }
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
