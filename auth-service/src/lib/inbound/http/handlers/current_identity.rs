use auth::Role;
use axum::Extension;
use axum::Json;
use serde::Serialize;

use crate::inbound::http::middleware::AuthenticatedIdentity;

pub async fn current_identity(
    Extension(identity): Extension<AuthenticatedIdentity>,
) -> Json<CurrentIdentityData> {
    Json((&identity).into())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentIdentityData {
    pub user_id: i64,
    pub username: String,
    pub role: Role,
    /// Unix seconds
    pub issued_at: i64,
    /// Unix seconds
    pub expires_at: i64,
}

impl From<&AuthenticatedIdentity> for CurrentIdentityData {
    fn from(identity: &AuthenticatedIdentity) -> Self {
        Self {
            user_id: identity.user_id,
            username: identity.username.clone(),
            role: identity.role,
            issued_at: identity.issued_at,
            expires_at: identity.expires_at,
        }
    }
}
