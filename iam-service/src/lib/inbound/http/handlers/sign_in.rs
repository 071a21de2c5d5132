use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::SignInCommand;
use crate::domain::user::models::SignInResult;
use crate::domain::user::models::Username;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

pub async fn sign_in(
    State(state): State<AppState>,
    Json(body): Json<SignInRequest>,
) -> Result<ApiSuccess<SignInResponseData>, ApiError> {
    state
        .user_command_service
        .sign_in(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref result| ApiSuccess::new(StatusCode::OK, result.into()))
}

/// HTTP request body for signing in (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SignInRequest {
    username: String,
    password: String,
}

impl SignInRequest {
    /// A name that cannot be a username cannot belong to a user.
    fn try_into_command(self) -> Result<SignInCommand, UserError> {
        let username = Username::new(self.username.clone())
            .map_err(|_| UserError::NotFoundByUsername(self.username))?;

        Ok(SignInCommand {
            username,
            password: self.password,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignInResponseData {
    pub id: String,
    pub username: String,
    pub token: String,
}

impl From<&SignInResult> for SignInResponseData {
    fn from(result: &SignInResult) -> Self {
        Self {
            id: result.user.id().to_string(),
            username: result.user.username.as_str().to_string(),
            token: result.token.clone(),
        }
    }
}
