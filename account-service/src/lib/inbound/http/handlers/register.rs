use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use super::create_account::CreateAccountRequest;
use super::ApiError;
use super::ApiSuccess;
use super::SessionData;
use crate::domain::account::ports::AccountServicePort;
use crate::inbound::http::router::AppState;

pub async fn register<S: AccountServicePort>(
    State(state): State<AppState<S>>,
    Json(body): Json<CreateAccountRequest>,
) -> Result<ApiSuccess<SessionData>, ApiError> {
    state
        .account_service
        .register(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|session| ApiSuccess::new(StatusCode::CREATED, session.into()))
}
