use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::user::models::UpdateUserStatusCommand;
use crate::domain::user::models::UserId;
use crate::inbound::http::context::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn update_user_status(
    State(state): State<AppState>,
    principal: AuthenticatedUser,
    Path(user_id): Path<String>,
    Json(body): Json<UpdateUserStatusRequest>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    let user_id = UserId::from_string(&user_id).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    principal.require_admin_or_self(&user_id)?;

    state
        .user_command_service
        .update_status(UpdateUserStatusCommand {
            user_id,
            is_active: body.is_active,
        })
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}

/// HTTP request body for activating or deactivating a user (raw JSON)
#[derive(Debug, Deserialize)]
pub struct UpdateUserStatusRequest {
    is_active: bool,
}
