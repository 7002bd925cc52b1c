use std::sync::Arc;
use std::time::Duration;

use auth::AuthorizationGate;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::create_account::create_account;
use super::handlers::delete_account::delete_account;
use super::handlers::get_account::get_account;
use super::handlers::get_profile::get_profile;
use super::handlers::list_accounts::list_accounts;
use super::handlers::login::login;
use super::handlers::paginate_accounts::paginate_accounts;
use super::handlers::register::register;
use super::handlers::update_account::update_account;
use super::middleware::authenticate as auth_middleware;
use crate::domain::account::ports::AccountServicePort;

pub struct AppState<S: AccountServicePort> {
    pub account_service: Arc<S>,
}

impl<S: AccountServicePort> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            account_service: Arc::clone(&self.account_service),
        }
    }
}

pub fn create_router<S: AccountServicePort>(
    account_service: Arc<S>,
    gate: Arc<AuthorizationGate>,
    cors: CorsLayer,
) -> Router {
    let state = AppState { account_service };

    let public_routes = Router::new()
        .route("/api/auth/register", post(register::<S>))
        .route("/api/auth/login", post(login::<S>))
        .route("/api/users", post(create_account::<S>));

    let protected_routes = Router::new()
        .route("/api/auth/profile", get(get_profile::<S>))
        .route("/api/users", get(list_accounts::<S>))
        .route("/api/users/paginate", get(paginate_accounts::<S>))
        .route(
            "/api/users/:id",
            get(get_account::<S>)
                .put(update_account::<S>)
                .patch(update_account::<S>)
                .delete(delete_account::<S>),
        )
        .route_layer(middleware::from_fn_with_state(gate, auth_middleware));

    // Headers are left out of the span: they carry bearer tokens.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
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
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
