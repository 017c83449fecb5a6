//! PostgreSQL-backed user account lookup adapter.

use std::collections::BTreeSet;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{AccountId, Role, UserAccount, UserId, Username};

use super::diesel_helpers;
use super::models::UserRow;
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the user lookup port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    diesel_helpers::map_pool_error(error, UserPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    diesel_helpers::map_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

/// Parse the comma-joined roles column into the domain's role set.
fn parse_roles(stored: &str) -> Result<BTreeSet<Role>, UserPersistenceError> {
    stored
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| {
            Role::parse(name).map_err(|error| UserPersistenceError::query(error.to_string()))
        })
        .collect()
}

fn row_to_account(row: UserRow) -> Result<UserAccount, UserPersistenceError> {
    let username = Username::new(row.username)
        .map_err(|error| UserPersistenceError::query(error.to_string()))?;
    let roles = parse_roles(&row.roles)?;
    Ok(UserAccount::new(
        UserId::new(row.id),
        AccountId::new(row.account_id),
        username,
        row.password_hash,
        roles,
    ))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::username.eq(username.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_account).transpose()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;

    fn sample_row(roles: &str) -> UserRow {
        UserRow {
            id: 2,
            account_id: 2,
            username: "admin".into(),
            password_hash: "$argon2id$stub".into(),
            roles: roles.into(),
        }
    }

    #[rstest]
    #[case("user", &[Role::User])]
    #[case("user,admin", &[Role::User, Role::Admin])]
    #[case(" user , admin ", &[Role::User, Role::Admin])]
    fn stored_roles_parse_into_role_sets(#[case] stored: &str, #[case] expected: &[Role]) {
        let roles = parse_roles(stored).expect("roles should parse");
        assert_eq!(roles, expected.iter().copied().collect());
    }

    #[test]
    fn unknown_role_names_are_query_errors() {
        let error = parse_roles("user,superuser").expect_err("unknown role should fail");
        assert!(matches!(error, UserPersistenceError::Query { .. }));
    }

    #[test]
    fn rows_convert_to_accounts() {
        let account = row_to_account(sample_row("user,admin")).expect("row should convert");
        assert_eq!(account.id(), UserId::new(2));
        assert_eq!(account.account_id(), AccountId::new(2));
        assert_eq!(account.username().as_ref(), "admin");
        assert!(account.has_role(Role::Admin));
    }

    #[test]
    fn invalid_stored_usernames_are_query_errors() {
        let mut row = sample_row("user");
        row.username = "a!".into();
        let error = row_to_account(row).expect_err("invalid username should fail");
        assert!(matches!(error, UserPersistenceError::Query { .. }));
    }
}
