use auth::Role;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use crate::domain::identity::models::Credentials;
use crate::domain::identity::models::LoginOutcome;
use crate::domain::identity::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

pub async fn login<S: AuthServicePort>(
    State(state): State<AppState<S>>,
    Json(body): Json<LoginRequestBody>,
) -> Result<Json<LoginResponseData>, ApiError> {
    let credentials = Credentials::new(body.username, body.password);

    state
        .auth_service
        .login(credentials)
        .await
        .map_err(ApiError::from)
        .map(|ref outcome| Json(outcome.into()))
}

#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    username: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponseData {
    pub token: String,
    #[serde(rename = "type")]
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
    pub user_id: i64,
    pub username: String,
    pub role: Role,
}

impl From<&LoginOutcome> for LoginResponseData {
    fn from(outcome: &LoginOutcome) -> Self {
        Self {
            token: outcome.token.clone(),
            token_type: "Bearer".to_string(),
            expires_in: outcome.expires_in.num_seconds(),
            user_id: outcome.user_id.0,
            username: outcome.username.as_str().to_string(),
            role: outcome.role,
        }
    }
}
