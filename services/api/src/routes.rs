use crate::infra::{ApiContext, AppState};
use axum::extract::{DefaultBodyLimit, Multipart};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use rankboard::leaderboard::auth::session_token;
use rankboard::leaderboard::leaderboard_router;
use serde::Serialize;
use serde_json::json;
use std::path::Path;
use tower_http::services::ServeDir;
use uuid::Uuid;

const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// One uploaded image as reported by the manifest endpoint.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub(crate) struct AssetView {
    pub(crate) name: String,
    pub(crate) path: String,
}

pub(crate) fn with_api_routes(context: &ApiContext) -> axum::Router {
    leaderboard_router(
        context.service.clone(),
        context.sessions.clone(),
    )
    .route("/health", axum::routing::get(healthcheck))
    .route("/ready", axum::routing::get(readiness_endpoint))
    .route("/metrics", axum::routing::get(metrics_endpoint))
    .route(
        "/api/assets-manifest",
        axum::routing::get(assets_manifest_endpoint),
    )
    .route(
        "/api/upload",
        axum::routing::post(upload_endpoint).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
    )
    .nest_service("/assets", ServeDir::new(context.assets_dir.clone()))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) fn list_assets(assets_dir: &Path, assets_folder: &str) -> Vec<AssetView> {
    let Ok(read_dir) = std::fs::read_dir(assets_dir) else {
        return Vec::new();
    };

    let mut assets: Vec<AssetView> = read_dir
        .filter_map(|dir_entry| dir_entry.ok())
        .filter_map(|dir_entry| dir_entry.file_name().into_string().ok())
        .filter(|file| file.to_lowercase().ends_with(".png"))
        .map(|file| AssetView {
            name: Path::new(&file)
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| file.clone()),
            path: format!("{assets_folder}/{file}"),
        })
        .collect();
    assets.sort_by(|a, b| a.name.cmp(&b.name));
    assets
}

pub(crate) async fn assets_manifest_endpoint(
    Extension(context): Extension<ApiContext>,
) -> impl IntoResponse {
    let assets_folder = context.service.config_view().assets_folder;
    let assets = list_assets(&context.assets_dir, &assets_folder);
    Json(json!({ "assets": assets }))
}

fn is_png(field_name: Option<&str>, content_type: Option<&str>) -> bool {
    let name_ok = field_name
        .map(|name| name.to_lowercase().ends_with(".png"))
        .unwrap_or(false);
    name_ok && content_type == Some("image/png")
}

/// Stores a PNG upload under a fresh uuid filename and returns its relative
/// asset path.
pub(crate) async fn upload_endpoint(
    Extension(context): Extension<ApiContext>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> impl IntoResponse {
    let authorized = session_token(&headers)
        .map(|token| context.sessions.is_valid(&token))
        .unwrap_or(false);
    if !authorized {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Unauthorized" })),
        );
    }

    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("file") {
            continue;
        }

        if !is_png(field.file_name(), field.content_type()) {
            return (StatusCode::BAD_REQUEST, Json(json!({ "error": "PNG only" })));
        }

        let Ok(bytes) = field.bytes().await else {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Upload too large" })),
            );
        };

        let file = format!("{}.png", Uuid::new_v4());
        let destination = context.assets_dir.join(&file);
        if let Err(err) = tokio::fs::write(&destination, &bytes).await {
            tracing::error!(%err, path = %destination.display(), "asset write failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Server error" })),
            );
        }

        let assets_folder = context.service.config_view().assets_folder;
        return (
            StatusCode::OK,
            Json(json!({ "path": format!("{assets_folder}/{file}") })),
        );
    }

    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "Missing file" })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_lists_png_files_sorted_by_name() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("zeta.png"), b"png").expect("writes");
        std::fs::write(dir.path().join("alpha.png"), b"png").expect("writes");
        std::fs::write(dir.path().join("notes.txt"), b"txt").expect("writes");

        let assets = list_assets(dir.path(), "assets");

        assert_eq!(
            assets,
            vec![
                AssetView {
                    name: "alpha".to_string(),
                    path: "assets/alpha.png".to_string()
                },
                AssetView {
                    name: "zeta".to_string(),
                    path: "assets/zeta.png".to_string()
                },
            ]
        );
    }

    #[test]
    fn manifest_is_empty_for_a_missing_directory() {
        let assets = list_assets(Path::new("/definitely/not/here"), "assets");
        assert!(assets.is_empty());
    }

    #[test]
    fn png_gate_requires_extension_and_content_type() {
        assert!(is_png(Some("icon.png"), Some("image/png")));
        assert!(is_png(Some("ICON.PNG"), Some("image/png")));
        assert!(!is_png(Some("icon.jpg"), Some("image/png")));
        assert!(!is_png(Some("icon.png"), Some("image/jpeg")));
        assert!(!is_png(None, Some("image/png")));
    }
}
