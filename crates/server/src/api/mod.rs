use std::sync::Arc;

use chrono::{DateTime, Utc};
use shared::{
    error::{ApiError, ErrorCode},
    protocol::{AuthorizeRequest, AuthorizeResponse, GuestResponse},
};
use tracing::info;

use crate::guard::{GuardError, GuardService};

#[derive(Clone)]
pub struct ApiContext {
    pub guard: Arc<GuardService>,
}

pub fn next_guest_route() -> &'static str {
    "/api/next-guest"
}

pub fn authorize_route() -> &'static str {
    "/api/authorize"
}

pub async fn next_guest(ctx: &ApiContext) -> Result<GuestResponse, ApiError> {
    let guest = ctx
        .guard
        .next_guest()
        .await
        .ok_or_else(|| ApiError::new(ErrorCode::NotFound, "no guests available"))?;
    info!(guest_id = %guest.id, "guest sent to the door");
    Ok(guest.into())
}

pub async fn authorize(
    ctx: &ApiContext,
    request: AuthorizeRequest,
    at: DateTime<Utc>,
) -> Result<AuthorizeResponse, ApiError> {
    let judgement = ctx
        .guard
        .judge(&request.guest_id, request.action, at)
        .await
        .map_err(guard_error)?;
    info!(
        guest_id = %request.guest_id,
        action = %request.action,
        allowed = judgement.allowed,
        correct = judgement.correct,
        "decision judged"
    );
    Ok(AuthorizeResponse {
        correct: judgement.correct,
        message: judgement.message,
        allowed: Some(judgement.allowed),
    })
}

fn guard_error(error: GuardError) -> ApiError {
    match error {
        GuardError::UnknownGuest(_) => ApiError::new(ErrorCode::NotFound, error.to_string()),
        GuardError::NotAllowed { .. } => ApiError::new(ErrorCode::Internal, error.to_string()),
    }
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
