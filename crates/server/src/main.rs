use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use server_api::{
    add_guestbook_entry, list_guestbook, list_rsvps, rsvp_summary, submit_rsvp, ApiContext,
};
use shared::{
    error::{ApiError, ErrorCode},
    protocol::{
        GuestbookEntry, GuestbookQuery, GuestbookWriteRequest, RsvpAccepted, RsvpRecord,
        RsvpRequest, RsvpSummary,
    },
};
use storage::Storage;
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod app_state;
mod config;

use app_state::AppState;
use config::{load_settings, prepare_database_url};

type ApiResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = load_settings();
    let database_url = prepare_database_url(&settings.database_url)?;
    let storage = Storage::new(&database_url).await.map_err(|error| {
        error!(
            %database_url,
            %error,
            "failed to open SQLite database; verify parent directory exists and permissions are correct"
        );
        error
    })?;

    let state = AppState {
        api: ApiContext { storage },
    };
    let app = build_router(Arc::new(state), settings.max_body_bytes);

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "invitation server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/guestbook", get(http_list_guestbook).post(http_add_guestbook_entry))
        .route("/api/rsvp", get(http_list_rsvps).post(http_submit_rsvp))
        .route("/api/rsvp/summary", get(http_rsvp_summary))
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .with_state(state)
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn reject(err: ApiError) -> (StatusCode, Json<ApiError>) {
    let status = status_for(err.code);
    if status.is_server_error() {
        error!(message = %err.message, "request failed");
    } else {
        warn!(code = ?err.code, message = %err.message, "request rejected");
    }
    (status, Json(err))
}

async fn healthz(State(state): State<Arc<AppState>>) -> ApiResult<&'static str> {
    state
        .api
        .storage
        .health_check()
        .await
        .map_err(|e| reject(ApiError::internal(e)))?;
    Ok("ok")
}

async fn http_list_guestbook(
    State(state): State<Arc<AppState>>,
    Query(q): Query<GuestbookQuery>,
) -> ApiResult<Json<Vec<GuestbookEntry>>> {
    list_guestbook(&state.api, &q.user_id)
        .await
        .map(Json)
        .map_err(reject)
}

async fn http_add_guestbook_entry(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GuestbookWriteRequest>,
) -> ApiResult<(StatusCode, Json<GuestbookEntry>)> {
    let entry = add_guestbook_entry(&state.api, req).await.map_err(reject)?;
    Ok((StatusCode::CREATED, Json(entry)))
}

async fn http_submit_rsvp(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RsvpRequest>,
) -> ApiResult<(StatusCode, Json<RsvpAccepted>)> {
    let accepted = submit_rsvp(&state.api, req).await.map_err(reject)?;
    Ok((StatusCode::CREATED, Json(accepted)))
}

async fn http_list_rsvps(
    State(state): State<Arc<AppState>>,
    Query(q): Query<GuestbookQuery>,
) -> ApiResult<Json<Vec<RsvpRecord>>> {
    list_rsvps(&state.api, &q.user_id)
        .await
        .map(Json)
        .map_err(reject)
}

async fn http_rsvp_summary(
    State(state): State<Arc<AppState>>,
    Query(q): Query<GuestbookQuery>,
) -> ApiResult<Json<RsvpSummary>> {
    rsvp_summary(&state.api, &q.user_id)
        .await
        .map(Json)
        .map_err(reject)
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
