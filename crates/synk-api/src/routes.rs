use std::sync::Arc;
use std::time::Duration;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, Request, State};
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::record::{RecordStore, StoredRecord};

/// Header naming the room a request addresses
pub const ROOM_HEADER: &str = "x-synk-room";
/// The only room this host serves
pub const ROOM_ID: &str = "arvid-ida";

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    records: RecordStore,
}

impl AppState {
    pub const fn new(config: Arc<AppConfig>, records: RecordStore) -> Self {
        Self { config, records }
    }
}

pub fn app_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/record", get(get_record).put(put_record))
        .route("/record/watch", get(watch_record))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_room));

    Router::new()
        .route("/healthz", get(healthz))
        .nest("/v1", protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_headers(Any)
                .allow_methods(Any),
        )
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: i64,
    has_record: bool,
}

async fn healthz(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now().timestamp(),
        has_record: state.records.current().is_some(),
    })
}

async fn require_room(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(expected) = state.config.auth_token.as_deref() {
        let token = extract_bearer_token(request.headers())?;
        if token != expected {
            return Err(AppError::unauthorized("Bearer token is not valid for this host"));
        }
    }

    let room = request
        .headers()
        .get(ROOM_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .ok_or_else(|| AppError::bad_request(format!("Missing {ROOM_HEADER} header")))?;
    if room != ROOM_ID {
        return Err(AppError::not_found(format!("Unknown room '{room}'")));
    }

    Ok(next.run(request).await)
}

fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let header = headers
        .get("authorization")
        .ok_or_else(|| AppError::unauthorized("Missing Authorization header"))?
        .to_str()
        .map_err(|_| AppError::unauthorized("Authorization header is not valid UTF-8"))?;

    let (scheme, token) = header
        .split_once(' ')
        .ok_or_else(|| AppError::unauthorized("Authorization header must be `Bearer <token>`"))?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AppError::unauthorized(
            "Authorization scheme must be `Bearer`",
        ));
    }
    let token = token.trim();
    if token.is_empty() {
        return Err(AppError::unauthorized("Bearer token is empty"));
    }

    Ok(token)
}

async fn get_record(State(state): State<AppState>) -> Result<Json<StoredRecord>, AppError> {
    state
        .records
        .current()
        .map(Json)
        .ok_or_else(|| AppError::not_found("No record stored for this room"))
}

async fn put_record(
    State(state): State<AppState>,
    payload: Result<Json<StoredRecord>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let Json(record) = payload.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;

    let updated_at = record.updated_at;
    let updated_by = record.updated_by.clone();
    state.records.replace(record).await?;
    tracing::info!(updated_at, updated_by = %updated_by, "Record replaced");
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
struct WatchQuery {
    #[serde(default)]
    after: i64,
    timeout_secs: Option<u64>,
}

/// Long-poll: answers with the record as soon as it is newer than `after`,
/// or `204 No Content` once the wait is over.
async fn watch_record(
    State(state): State<AppState>,
    query: Result<Query<WatchQuery>, QueryRejection>,
) -> Result<Response, AppError> {
    let Query(query) = query.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;

    let max_wait = state.config.max_wait;
    let wait = query
        .timeout_secs
        .map_or(max_wait, |secs| Duration::from_secs(secs).min(max_wait));

    match state.records.wait_newer_than(query.after, wait).await {
        Some(record) => Ok(Json(record).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}
