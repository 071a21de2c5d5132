use axum::extract::Request;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use super::context::AuthenticatedUser;
use crate::domain::user::models::Username;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

const BEARER_PREFIX: &str = "Bearer ";

/// Middleware that establishes request identity from a bearer token.
///
/// Never rejects: requests without a usable token, with an invalid token, or
/// whose subject is unknown or inactive proceed without an
/// [`AuthenticatedUser`] and are left to the handler's authorization.
pub async fn authenticate(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    // Identity is only ever set here
    req.extensions_mut().remove::<AuthenticatedUser>();

    let token = bearer_token(req.headers()).map(str::to_owned);
    if let Some(token) = token {
        if let Some(user) = resolve_identity(&state, &token).await {
            tracing::debug!(username = %user.username, "Request authenticated");
            req.extensions_mut().insert(user);
        }
    }

    next.run(req).await
}

/// Resolve a bearer token to an active user.
///
/// # Returns
/// The identity to attach, or `None` when the request stays unauthenticated
pub async fn resolve_identity(state: &AppState, token: &str) -> Option<AuthenticatedUser> {
    if !state.token_service.validate_token(token) {
        return None;
    }

    let subject = match state.token_service.username_from_token(token) {
        Ok(subject) => subject,
        Err(e) => {
            tracing::error!(error = %e, "Failed to set user authentication");
            return None;
        }
    };

    let username = match Username::new(subject) {
        Ok(username) => username,
        Err(e) => {
            tracing::error!(error = %e, "Failed to set user authentication");
            return None;
        }
    };

    match state.user_query_service.get_user_by_username(&username).await {
        Ok(user) if user.active => Some(AuthenticatedUser::from(&user)),
        Ok(user) => {
            tracing::warn!(username = %user.username, "User is not active");
            None
        }
        Err(UserError::NotFoundByUsername(name)) => {
            tracing::warn!(username = %name, "Token subject has no user");
            None
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to set user authentication");
            None
        }
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header.
///
/// The scheme is matched case-sensitively; an empty token counts as absent.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_extracted() {
        let headers = headers("Bearer abc.def.ghi");
        assert_eq!(bearer_token(&headers), Some("abc.def.ghi"));
    }

    #[test]
    fn test_bearer_scheme_is_case_sensitive() {
        assert_eq!(bearer_token(&headers("bearer abc.def.ghi")), None);
        assert_eq!(bearer_token(&headers("BEARER abc.def.ghi")), None);
    }

    #[test]
    fn test_bearer_token_missing_or_empty() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);
        assert_eq!(bearer_token(&headers("Bearer ")), None);
        assert_eq!(bearer_token(&headers("Basic dXNlcjpwYXNz")), None);
        assert_eq!(bearer_token(&headers("Bearerabc")), None);
    }
}
