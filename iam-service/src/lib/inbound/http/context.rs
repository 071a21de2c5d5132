//! Request-scoped identity.
//!
//! The authentication filter inserts an [`AuthenticatedUser`] into the
//! request extensions when, and only when, the bearer token validates and
//! resolves to an active user. Handlers take it as an extractor; its
//! absence rejects with 401, failed role or ownership checks with 403.

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use super::handlers::ApiError;
use crate::domain::role::models::RoleName;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;

/// Identity established for the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub username: String,
    pub roles: Vec<RoleName>,
}

impl AuthenticatedUser {
    pub fn has_role(&self, role: RoleName) -> bool {
        self.roles.contains(&role)
    }

    /// # Errors
    /// * `Forbidden` - None of `roles` is granted
    pub fn require_any(&self, roles: &[RoleName]) -> Result<(), ApiError> {
        if roles.iter().any(|role| self.has_role(*role)) {
            Ok(())
        } else {
            Err(forbidden())
        }
    }

    /// Admins act on any user; plain users only on themselves.
    ///
    /// # Errors
    /// * `Forbidden` - Caller is neither admin nor the target user
    pub fn require_admin_or_self(&self, user_id: &UserId) -> Result<(), ApiError> {
        if self.has_role(RoleName::Admin)
            || (self.has_role(RoleName::User) && self.user_id == *user_id)
        {
            Ok(())
        } else {
            Err(forbidden())
        }
    }
}

fn forbidden() -> ApiError {
    ApiError::Forbidden("Access denied".to_string())
}

impl From<&User> for AuthenticatedUser {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id(),
            username: user.username.as_str().to_string(),
            roles: user.role_names(),
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))
    }
}
