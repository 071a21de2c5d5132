use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::user::models::UpdatePasswordCommand;
use crate::domain::user::models::UserId;
use crate::inbound::http::context::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn update_user_password(
    State(state): State<AppState>,
    principal: AuthenticatedUser,
    Path(user_id): Path<String>,
    Json(body): Json<UpdatePasswordRequest>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    let user_id = UserId::from_string(&user_id).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    principal.require_admin_or_self(&user_id)?;

    state
        .user_command_service
        .update_password(UpdatePasswordCommand {
            user_id,
            current_password: body.current_password,
            new_password: body.new_password,
        })
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}

/// HTTP request body for changing a password (raw JSON)
#[derive(Debug, Deserialize)]
pub struct UpdatePasswordRequest {
    current_password: String,
    new_password: String,
}
