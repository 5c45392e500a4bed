use async_trait::async_trait;
use auth::Role;
use sqlx::FromRow;
use sqlx::PgPool;

use crate::domain::identity::models::Identity;
use crate::domain::identity::models::IdentityId;
use crate::domain::identity::models::Username;
use crate::domain::identity::ports::CredentialStore;
use crate::identity::errors::AuthError;

/// Credential store over the shared `users` table.
///
/// Only reads; the user service owns the table.
pub struct PostgresCredentialStore {
    pool: PgPool,
}

impl PostgresCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct IdentityRow {
    id: i64,
    username: String,
    password: String,
    role: String,
}

impl TryFrom<IdentityRow> for Identity {
    type Error = AuthError;

    fn try_from(row: IdentityRow) -> Result<Self, Self::Error> {
        let username = Username::new(row.username).map_err(|e| {
            AuthError::CredentialStore(format!("Invalid username for user {}: {}", row.id, e))
        })?;
        let role = row.role.parse::<Role>().map_err(|e| {
            AuthError::CredentialStore(format!("Invalid role for user {}: {}", row.id, e))
        })?;

        Ok(Identity {
            id: IdentityId(row.id),
            username,
            role,
            password_hash: row.password,
        })
    }
}

#[async_trait]
impl CredentialStore for PostgresCredentialStore {
    async fn find_identity_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Identity>, AuthError> {
        let row = sqlx::query_as::<_, IdentityRow>(
            r#"
            SELECT id, username, password, role::text AS role
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::CredentialStore(e.to_string()))?;

        row.map(Identity::try_from).transpose()
    }
}
