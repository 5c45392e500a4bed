use axum::extract::Query;
use axum::extract::State;
use axum::Json;

use super::ApiError;
use super::TokenQuery;
use crate::domain::identity::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

pub async fn token_user<S: AuthServicePort>(
    State(state): State<AppState<S>>,
    Query(query): Query<TokenQuery>,
) -> Result<Json<String>, ApiError> {
    let claims = state
        .auth_service
        .extract_claims(&query.token)
        .map_err(|e| {
            tracing::debug!(error = %e, "Username lookup with invalid token");
            ApiError::from(e)
        })?;

    Ok(Json(claims.username))
}
