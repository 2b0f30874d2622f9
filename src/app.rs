//! Application wiring
//!
//! The App struct composes the stores through dependency injection, builds
//! the router, and drives the serve loop.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::State;
use axum::response::Json;
use axum::routing::get;
use serde_json::{Value, json};
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::traits::{CategoryStore, PageStore, SessionStore, UserStore};
use crate::web::handlers::{auth, pages};

/// How often expired sessions are swept out of the store.
const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Main application struct with dependency injection
#[derive(Clone)]
pub struct App<C, P, U, S>
where
    C: CategoryStore,
    P: PageStore,
    U: UserStore,
    S: SessionStore,
{
    state: Arc<AppState>,
    pub(crate) category_store: C,
    pub(crate) page_store: P,
    pub(crate) user_store: U,
    pub(crate) session_store: S,
}

impl<C, P, U, S> App<C, P, U, S>
where
    C: CategoryStore + Clone + Send + Sync + 'static,
    P: PageStore + Clone + Send + Sync + 'static,
    U: UserStore + Clone + Send + Sync + 'static,
    S: SessionStore + Clone + Send + Sync + 'static,
{
    /// Create the application with injected stores
    pub fn new(
        state: AppState,
        category_store: C,
        page_store: P,
        user_store: U,
        session_store: S,
    ) -> Self {
        Self {
            state: Arc::new(state),
            category_store,
            page_store,
            user_store,
            session_store,
        }
    }

    /// Shared state for handlers and tests
    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    /// Build the Axum router with all routes
    pub fn build_router(&self) -> Router {
        Router::new()
            // Browsing
            .route("/", get(pages::index))
            .route("/about", get(pages::about))
            .route("/category/:slug", get(pages::show_category))
            .route("/goto", get(pages::goto_page))
            // Contribution
            .route(
                "/add_category",
                get(pages::add_category_form).post(pages::add_category_submit),
            )
            .route(
                "/category/:slug/add_page",
                get(pages::add_page_form).post(pages::add_page_submit),
            )
            // Accounts
            .route(
                "/register",
                get(auth::register_form).post(auth::register_submit),
            )
            .route("/login", get(auth::login_form).post(auth::login_submit))
            .route("/logout", get(auth::logout))
            .route("/restricted", get(auth::restricted))
            // Health check
            .route("/health", get(health))
            // Static assets
            .nest_service("/static", ServeDir::new(&self.state.static_dir))
            .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).into_inner())
            .with_state(self.clone())
    }

    /// Serve until the process receives a shutdown signal
    pub async fn run(&self) -> AppResult<()> {
        let router = self.build_router();

        // periodic sweep of expired sessions
        let sweeper = {
            let store = self.session_store.clone();
            tokio::spawn(async move {
                let mut ticker = tokio::time::interval(SESSION_SWEEP_INTERVAL);
                loop {
                    ticker.tick().await;
                    if let Err(e) = store.cleanup_expired().await {
                        warn!("session sweep failed: {e}");
                    }
                }
            })
        };

        let listener = tokio::net::TcpListener::bind(self.state.bind_address)
            .await
            .map_err(|e| {
                AppError::ServerStartup(format!(
                    "failed to bind to {}: {e}",
                    self.state.bind_address
                ))
            })?;
        info!("listening on http://{}", self.state.bind_address);

        let server = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                error!("server error: {e}");
            }
        });

        tokio::select! {
            _ = server => {
                info!("http server task completed");
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown signal received");
                self.state.set_running(false);
            }
        }

        sweeper.abort();
        Ok(())
    }
}

/// Health check endpoint
async fn health<C, P, U, S>(State(app): State<App<C, P, U, S>>) -> Json<Value>
where
    C: CategoryStore + Clone + Send + Sync + 'static,
    P: PageStore + Clone + Send + Sync + 'static,
    U: UserStore + Clone + Send + Sync + 'static,
    S: SessionStore + Clone + Send + Sync + 'static,
{
    let active_sessions = app.session_store.active_sessions().await;
    let status = if app.state.is_running() { "running" } else { "stopping" };

    Json(json!({
        "status": status,
        "uptime_seconds": app.state.uptime_seconds(),
        "active_sessions": active_sessions,
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
