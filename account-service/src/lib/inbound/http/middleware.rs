use std::sync::Arc;

use auth::AuthenticatedContext;
use auth::AuthorizationGate;
use axum::extract::Request;
use axum::extract::State;
use axum::http;
use axum::middleware::Next;
use axum::response::Response;

use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::UNAUTHORIZED_MESSAGE;

/// Extension type holding the caller identity established by the gate.
#[derive(Debug, Clone)]
pub struct AuthenticatedAccount {
    pub context: AuthenticatedContext,
}

/// Middleware that runs the authorization gate and adds the caller to request extensions.
///
/// Rejections are answered with a bare 401; the reason is logged only.
pub async fn authenticate(
    State(gate): State<Arc<AuthorizationGate>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = match req.headers().get(http::header::AUTHORIZATION) {
        Some(value) => Some(value.to_str().map_err(|_| {
            tracing::warn!(reason = "non_ascii_header", "Request rejected by gate");
            unauthorized()
        })?),
        None => None,
    };

    let context = gate.authorize(header).map_err(|e| {
        tracing::warn!(
            method = %req.method(),
            uri = %req.uri(),
            reason = %e,
            "Request rejected by gate"
        );
        unauthorized()
    })?;

    req.extensions_mut().insert(AuthenticatedAccount { context });

    Ok(next.run(req).await)
}

fn unauthorized() -> ApiError {
    ApiError::Unauthorized(UNAUTHORIZED_MESSAGE.to_string())
}
