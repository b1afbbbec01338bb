//! API server initialization

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use axum::extract::{DefaultBodyLimit, FromRef};
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use super::middleware::{self, AllowedOrigins};
use super::routes::{health, invoices};
use crate::core::CoreApp;
use crate::core::constants::DEFAULT_BODY_LIMIT;
use crate::data::filters::FilterLimits;
use crate::data::sqlite::SqliteService;
use crate::domain::InvoiceCatalog;

/// State shared by every route
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<SqliteService>,
    pub invoices: Arc<InvoiceCatalog>,
    pub limits: FilterLimits,
}

impl AppState {
    pub fn new(
        db: Arc<SqliteService>,
        invoices: Arc<InvoiceCatalog>,
        limits: FilterLimits,
    ) -> Self {
        Self {
            db,
            invoices,
            limits,
        }
    }
}

impl FromRef<AppState> for FilterLimits {
    fn from_ref(state: &AppState) -> Self {
        state.limits
    }
}

/// Application routes without transport layers
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health::health))
        .merge(invoices::routes())
        .fallback(middleware::handle_404)
        .with_state(state)
}

pub struct ApiServer {
    app: CoreApp,
    allowed_origins: AllowedOrigins,
}

impl ApiServer {
    pub fn new(app: CoreApp) -> Self {
        let allowed_origins = AllowedOrigins::new(&app.config.server.host, app.config.server.port);
        Self {
            app,
            allowed_origins,
        }
    }

    /// Returns CoreApp for graceful shutdown
    pub async fn start(self) -> Result<CoreApp> {
        let Self {
            app,
            allowed_origins,
        } = self;

        let shutdown = app.shutdown.clone();
        let addr = SocketAddr::new(app.config.server.host.parse()?, app.config.server.port);

        let state = AppState::new(
            app.db.clone(),
            app.invoices.clone(),
            app.config.filters.limits(),
        );

        let router = router(state)
            .layer(TraceLayer::new_for_http())
            .layer(CompressionLayer::new())
            .layer(middleware::cors(&allowed_origins))
            .layer(DefaultBodyLimit::max(DEFAULT_BODY_LIMIT));

        let listener = TcpListener::bind(addr).await?;
        tracing::info!(address = %addr, "API server listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown.wait())
            .await?;

        Ok(app)
    }
}
