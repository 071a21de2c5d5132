use std::sync::Arc;
use std::time::Duration;

use auth::TokenService;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::patch;
use axum::routing::post;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::get_roles::get_roles;
use super::handlers::get_user::get_user;
use super::handlers::list_users::list_users;
use super::handlers::sign_in::sign_in;
use super::handlers::sign_up::sign_up;
use super::handlers::update_user_password::update_user_password;
use super::handlers::update_user_status::update_user_status;
use super::handlers::verify::verify;
use super::middleware::authenticate;
use crate::domain::role::ports::RoleQueryServicePort;
use crate::domain::user::ports::UserCommandServicePort;
use crate::domain::user::ports::UserQueryServicePort;

#[derive(Clone)]
pub struct AppState {
    pub user_command_service: Arc<dyn UserCommandServicePort>,
    pub user_query_service: Arc<dyn UserQueryServicePort>,
    pub role_query_service: Arc<dyn RoleQueryServicePort>,
    pub token_service: Arc<TokenService>,
    /// Base of the verification links sent on sign-up
    pub public_base_url: String,
}

pub fn create_router(state: AppState) -> Router {
    let authentication_routes = Router::new()
        .route("/api/v1/authentication/sign-in", post(sign_in))
        .route("/api/v1/authentication/sign-up", post(sign_up))
        .route("/api/v1/authentication/verify", get(verify));

    let user_routes = Router::new()
        .route("/api/v1/users", get(list_users))
        .route("/api/v1/users/:user_id", get(get_user))
        .route("/api/v1/users/:user_id/status", patch(update_user_status))
        .route(
            "/api/v1/users/:user_id/password",
            patch(update_user_password),
        );

    let role_routes = Router::new().route("/api/v1/roles", get(get_roles));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            // Path only: the verification link carries a token in its query
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                path = %request.uri().path(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                path = %request.uri().path(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(authentication_routes)
        .merge(user_routes)
        .merge(role_routes)
        .layer(middleware::from_fn_with_state(state.clone(), authenticate))
        .layer(
            ServiceBuilder::new()
                .layer(trace_layer)
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
