use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use super::auth::{session_token, SessionManager};
use super::domain::{ConfigPatch, EntryDraft, EntryId, EntryPatch};
use super::repository::LeaderboardStore;
use super::service::{LeaderboardService, ServiceError};

/// Shared router state: the service facade plus the session registry.
pub struct LeaderboardApi<S> {
    pub service: Arc<LeaderboardService<S>>,
    pub sessions: Arc<SessionManager>,
}

impl<S> Clone for LeaderboardApi<S> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            sessions: Arc::clone(&self.sessions),
        }
    }
}

/// Router builder exposing the leaderboard CRUD and config endpoints.
pub fn leaderboard_router<S>(
    service: Arc<LeaderboardService<S>>,
    sessions: Arc<SessionManager>,
) -> Router
where
    S: LeaderboardStore + 'static,
{
    let api = LeaderboardApi { service, sessions };
    Router::new()
        .route(
            "/api/config",
            get(config_handler::<S>).put(update_config_handler::<S>),
        )
        .route(
            "/api/entries",
            get(entries_handler::<S>).post(create_entry_handler::<S>),
        )
        .route(
            "/api/entries/:entry_id",
            put(update_entry_handler::<S>).delete(delete_entry_handler::<S>),
        )
        .route(
            "/api/entries/:entry_id/explanation",
            get(explanation_handler::<S>),
        )
        .route("/api/login", post(login_handler::<S>))
        .with_state(api)
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginRequest {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

fn unauthorized() -> Response {
    let payload = json!({ "error": "Unauthorized" });
    (StatusCode::UNAUTHORIZED, axum::Json(payload)).into_response()
}

fn authorize<S>(api: &LeaderboardApi<S>, headers: &HeaderMap) -> Result<(), Response> {
    match session_token(headers) {
        Some(token) if api.sessions.is_valid(&token) => Ok(()),
        _ => Err(unauthorized()),
    }
}

fn parse_entry_id(raw: &str) -> Result<EntryId, Response> {
    Uuid::parse_str(raw)
        .map(EntryId)
        .map_err(|_| error_response(&ServiceError::NotFound))
}

fn error_response(error: &ServiceError) -> Response {
    let status = match error {
        ServiceError::NameRequired => StatusCode::BAD_REQUEST,
        ServiceError::NotFound => StatusCode::NOT_FOUND,
        ServiceError::EditingDisabled => StatusCode::FORBIDDEN,
        ServiceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn config_handler<S>(State(api): State<LeaderboardApi<S>>) -> Response
where
    S: LeaderboardStore + 'static,
{
    axum::Json(api.service.config_view()).into_response()
}

pub(crate) async fn entries_handler<S>(State(api): State<LeaderboardApi<S>>) -> Response
where
    S: LeaderboardStore + 'static,
{
    axum::Json(api.service.entries()).into_response()
}

pub(crate) async fn explanation_handler<S>(
    State(api): State<LeaderboardApi<S>>,
    Path(entry_id): Path<String>,
) -> Response
where
    S: LeaderboardStore + 'static,
{
    let id = match parse_entry_id(&entry_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match api.service.explanation(id) {
        Ok(explanation) => axum::Json(json!({ "explanation": explanation })).into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn login_handler<S>(
    State(api): State<LeaderboardApi<S>>,
    axum::Json(request): axum::Json<LoginRequest>,
) -> Response
where
    S: LeaderboardStore + 'static,
{
    if !api.service.verify_admin(&request.username, &request.password) {
        let payload = json!({ "error": "Invalid credentials" });
        return (StatusCode::UNAUTHORIZED, axum::Json(payload)).into_response();
    }

    let token = api.sessions.issue();
    axum::Json(json!({ "token": token })).into_response()
}

pub(crate) async fn create_entry_handler<S>(
    State(api): State<LeaderboardApi<S>>,
    headers: HeaderMap,
    axum::Json(draft): axum::Json<EntryDraft>,
) -> Response
where
    S: LeaderboardStore + 'static,
{
    if let Err(response) = authorize(&api, &headers) {
        return response;
    }

    match api.service.create_entry(draft) {
        Ok(entry) => (StatusCode::CREATED, axum::Json(entry)).into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn update_entry_handler<S>(
    State(api): State<LeaderboardApi<S>>,
    Path(entry_id): Path<String>,
    headers: HeaderMap,
    axum::Json(patch): axum::Json<EntryPatch>,
) -> Response
where
    S: LeaderboardStore + 'static,
{
    if let Err(response) = authorize(&api, &headers) {
        return response;
    }

    let id = match parse_entry_id(&entry_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match api.service.patch_entry(id, patch) {
        Ok(entry) => axum::Json(entry).into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn delete_entry_handler<S>(
    State(api): State<LeaderboardApi<S>>,
    Path(entry_id): Path<String>,
    headers: HeaderMap,
) -> Response
where
    S: LeaderboardStore + 'static,
{
    if let Err(response) = authorize(&api, &headers) {
        return response;
    }

    let id = match parse_entry_id(&entry_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match api.service.delete_entry(id) {
        Ok(()) => axum::Json(json!({ "ok": true })).into_response(),
        Err(error) => error_response(&error),
    }
}

pub(crate) async fn update_config_handler<S>(
    State(api): State<LeaderboardApi<S>>,
    headers: HeaderMap,
    axum::Json(patch): axum::Json<ConfigPatch>,
) -> Response
where
    S: LeaderboardStore + 'static,
{
    if let Err(response) = authorize(&api, &headers) {
        return response;
    }

    match api.service.update_config(patch) {
        Ok(view) => axum::Json(view).into_response(),
        Err(error) => error_response(&error),
    }
}
