use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::RoleData;
use crate::domain::role::models::RoleName;
use crate::inbound::http::context::AuthenticatedUser;
use crate::inbound::http::router::AppState;

/// List roles, or look one up with `?name=`.
pub async fn get_roles(
    State(state): State<AppState>,
    principal: AuthenticatedUser,
    Query(params): Query<GetRolesParams>,
) -> Result<ApiSuccess<Vec<RoleData>>, ApiError> {
    principal.require_any(&[RoleName::Admin])?;

    let roles = match params.name {
        Some(name) => vec![state.role_query_service.get_role_by_name(&name).await?],
        None => state.role_query_service.get_all_roles().await?,
    };

    Ok(ApiSuccess::new(
        StatusCode::OK,
        roles.iter().map(RoleData::from).collect(),
    ))
}

#[derive(Debug, Deserialize)]
pub struct GetRolesParams {
    name: Option<String>,
}
