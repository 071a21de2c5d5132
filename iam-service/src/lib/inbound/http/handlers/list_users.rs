use axum::extract::State;
use axum::http::StatusCode;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::role::models::RoleName;
use crate::inbound::http::context::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn list_users(
    State(state): State<AppState>,
    principal: AuthenticatedUser,
) -> Result<ApiSuccess<Vec<UserData>>, ApiError> {
    principal.require_any(&[RoleName::Admin])?;

    state
        .user_query_service
        .get_all_users()
        .await
        .map_err(ApiError::from)
        .map(|users| ApiSuccess::new(StatusCode::OK, users.iter().map(UserData::from).collect()))
}
