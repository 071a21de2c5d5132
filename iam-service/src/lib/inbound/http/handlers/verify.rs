use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::user::models::VerifyUserCommand;
use crate::inbound::http::router::AppState;

/// Target of the link sent in verification emails.
pub async fn verify(
    State(state): State<AppState>,
    Query(params): Query<VerifyParams>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    state
        .user_command_service
        .verify(VerifyUserCommand {
            token: params.token,
        })
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}

#[derive(Debug, Deserialize)]
pub struct VerifyParams {
    token: String,
}
