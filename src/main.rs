use axum::{
    middleware,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod auth;
mod config;
mod db;
mod error;
mod handlers;
mod models;
mod services;

use config::Config;
use db::store::PgProgressStore;
use services::progress::ProgressService;

#[derive(Clone)]
pub struct AppState {
    pub progress: ProgressService,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bodybank_api=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    let config = Arc::new(Config::from_env()?);

    // Database
    let db = db::create_pool(&config.database_url).await?;

    sqlx::migrate!("./migrations").run(&db).await?;

    tracing::info!("Database migrations applied");

    let progress = ProgressService::new(
        Arc::new(PgProgressStore::new(db)),
        config.day_boundary(),
        config.progress_log_limit,
    );
    tracing::info!(
        utc_offset_minutes = config.progress_utc_offset_minutes,
        "Progress day boundary configured"
    );

    let state = AppState {
        progress,
        config: config.clone(),
    };

    let mut allowed_origins = vec![config.frontend_url.parse::<axum::http::HeaderValue>()?];
    for origin in &config.cors_extra_origins {
        match origin.parse::<axum::http::HeaderValue>() {
            Ok(hv) => allowed_origins.push(hv),
            Err(_) => tracing::warn!(origin = %origin, "Ignoring invalid CORS origin"),
        }
    }
    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ])
        .allow_credentials(true);

    let app = router(state).layer(cors).layer(TraceLayer::new_for_http());

    let addr = config.listen_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readyz));

    let user_routes = Router::new()
        .route(
            "/api/progress",
            get(handlers::progress::get_progress).post(handlers::progress::post_progress),
        )
        .route("/api/progress/goals", get(handlers::progress::get_goals))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::require_auth,
        ));

    let admin_routes = Router::new()
        .route("/api/admin/users", get(handlers::admin_progress::list_users))
        .route(
            "/api/admin/user-progress/:user_id",
            get(handlers::admin_progress::get_user_progress),
        )
        .layer(middleware::from_fn(auth::middleware::require_admin))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(user_routes)
        .merge(admin_routes)
        .with_state(state)
}
