use crate::cli::ServeArgs;
use crate::infra::{ApiContext, AppState, JsonFileStore};
use crate::routes::with_api_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use rankboard::config::AppConfig;
use rankboard::error::AppError;
use rankboard::leaderboard::auth::SessionManager;
use rankboard::leaderboard::service::LeaderboardService;
use rankboard::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(JsonFileStore::open(&config.storage.data_dir)?);
    let service = Arc::new(LeaderboardService::new(store)?);
    let sessions = Arc::new(SessionManager::default());

    std::fs::create_dir_all(&config.storage.assets_dir)?;
    let context = ApiContext {
        service,
        sessions,
        assets_dir: config.storage.assets_dir.clone(),
    };

    let app = with_api_routes(&context)
        .layer(Extension(app_state))
        .layer(Extension(context))
        .layer(CorsLayer::permissive())
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "leaderboard service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
