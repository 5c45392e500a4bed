use axum::extract::Query;
use axum::extract::State;
use axum::Json;

use super::TokenQuery;
use crate::domain::identity::ports::AuthServicePort;
use crate::inbound::http::router::AppState;

/// Always answers 200; the body is the verdict.
pub async fn validate_token<S: AuthServicePort>(
    State(state): State<AppState<S>>,
    Query(query): Query<TokenQuery>,
) -> Json<bool> {
    Json(state.auth_service.validate_token(&query.token))
}
