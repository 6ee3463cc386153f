use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use shared::{
    error::{ApiError, ErrorCode},
    protocol::{AuthorizeRequest, AuthorizeResponse, GuestResponse},
};
use tower_http::limit::RequestBodyLimitLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod api;
mod app_state;
mod config;
mod guard;
mod roster;

use api::{authorize_route, next_guest_route, ApiContext};
use app_state::AppState;
use config::load_settings;
use guard::{GuardService, InMemoryGuestRepository};
use roster::{default_roster, load_roster};

const MAX_REQUEST_BYTES: usize = 16 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = load_settings()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(
            settings.log_directives(std::env::var("RUST_LOG").ok()),
        ))
        .init();

    let profiles = match &settings.roster_path {
        Some(path) => load_roster(path)?,
        None => default_roster(),
    };
    let repository = Arc::new(InMemoryGuestRepository::new(profiles));
    info!(
        environment = %settings.environment,
        guests = repository.len().await,
        "roster loaded"
    );

    let api = ApiContext {
        guard: Arc::new(GuardService::new(repository)),
    };
    let app = build_router(Arc::new(AppState { api }));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route(next_guest_route(), get(http_next_guest))
        .route(authorize_route(), post(http_authorize))
        .layer(RequestBodyLimitLayer::new(MAX_REQUEST_BYTES))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn http_next_guest(
    State(state): State<Arc<AppState>>,
) -> Result<Json<GuestResponse>, (StatusCode, Json<ApiError>)> {
    api::next_guest(&state.api)
        .await
        .map(Json)
        .map_err(error_response)
}

async fn http_authorize(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AuthorizeRequest>,
) -> Result<Json<AuthorizeResponse>, (StatusCode, Json<ApiError>)> {
    api::authorize(&state.api, req, Utc::now())
        .await
        .map(Json)
        .map_err(error_response)
}

fn error_response(error: ApiError) -> (StatusCode, Json<ApiError>) {
    let status = match error.code {
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(error))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
