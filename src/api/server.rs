use std::sync::Arc;

use axum::routing::{delete, get, post, put};
use axum::Router;
use sqlx::SqlitePool;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::{auth, export, items, sales, users};
use crate::config::Config;
use crate::db;
use crate::export::Exporter;
use crate::security::TokenManager;

pub struct AppState {
    pub db: SqlitePool,
    pub tokens: TokenManager,
    pub exporter: Exporter,
}

impl AppState {
    pub fn new(db: SqlitePool, tokens: TokenManager, exporter: Exporter) -> Arc<Self> {
        Arc::new(Self {
            db,
            tokens,
            exporter,
        })
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/items", get(items::list).post(items::create))
        .route("/api/items/by-user", get(items::by_user))
        .route("/api/items/{id}/assign", put(items::assign))
        .route("/api/sales", post(sales::record))
        .route("/api/sales/me", get(sales::mine))
        .route("/api/sales/by-user", get(sales::by_user))
        .route("/api/users", get(users::list))
        .route("/api/users/{id}", delete(users::remove))
        .route("/api/users/assign", post(users::assign))
        .route("/api/export/pdf", post(export::pdf))
        .route("/api/export/items-by-user", post(export::items_by_user))
        .route("/api/export/sales-by-user", post(export::sales_by_user))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server(config: Config) {
    let pool = db::connect(&config.database_url)
        .await
        .expect("Failed to connect to SQLite");
    db::migrate(&pool).await.expect("Failed to run migrations");
    db::seed_admin(&pool, &config)
        .await
        .expect("Failed to seed admin account");

    let state = AppState::new(
        pool,
        TokenManager::new(&config.jwt_secret),
        Exporter::new(config.export.clone()),
    );
    let app = router(state.clone());

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind server address");
    tracing::info!(addr = %config.bind_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server failed");

    state.db.close().await;
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
