use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use super::token_response;
use super::ApiError;
use super::ApiSuccess;
use super::TokenResponseData;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> Result<(CookieJar, ApiSuccess<TokenResponseData>), ApiError> {
    let user = state
        .user_service
        .login(&body.email, &body.password)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "Login rejected");
            ApiError::from(e)
        })?;

    token_response(&state.authenticator, jar, StatusCode::OK, &user)
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}
