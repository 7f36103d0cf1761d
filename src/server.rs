//! HTTP surface: dashboards and the JSON listing endpoint.
//!
//! ## Routes
//!
//! | Route | Response |
//! |-------|----------|
//! | `GET /`, `GET /groups/` | groups dashboard |
//! | `GET /groups/{group_id}/` | group dashboard, `404` for unknown groups |
//! | `GET /api/reports` | `{"reports": [...]}`, every registered report |
//!
//! Handlers share one sealed [`Registry`] through [`AppState`]. Nothing is
//! locked; the registry cannot change once the server is running.

use crate::config::{ColorConfig, generate_color_css};
use crate::nav::{RenderContext, ReportListing};
use crate::registry::Registry;
use crate::render::{CSS_STATIC, render_group_dashboard, render_groups_dashboard};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, Json};
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum ServeError {
    #[error("could not bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// State shared by every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub registry: Arc<Registry>,
    /// Full stylesheet: configured colors followed by the base rules.
    pub css: Arc<str>,
}

impl AppState {
    pub fn new(registry: Registry, colors: &ColorConfig) -> Self {
        let css = format!("{}\n\n{}", generate_color_css(colors), CSS_STATIC);
        Self {
            registry: Arc::new(registry),
            css: css.into(),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(groups_dashboard))
        .route("/groups/", get(groups_dashboard))
        .route("/groups/{group_id}/", get(group_dashboard))
        .route("/api/reports", get(api_reports))
        .with_state(state)
}

/// `GET /api/reports`
pub async fn api_reports(State(state): State<AppState>) -> Json<ReportListing> {
    Json(ReportListing::from_registry(&state.registry))
}

/// `GET /` and `GET /groups/`
pub async fn groups_dashboard(State(state): State<AppState>) -> Html<String> {
    let ctx = RenderContext::new(&state.registry);
    debug!("Rendering groups dashboard with {} groups", ctx.nav_groups.len());
    Html(render_groups_dashboard(&ctx, &state.css).into_string())
}

/// `GET /groups/{group_id}/`
pub async fn group_dashboard(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
) -> Result<Html<String>, StatusCode> {
    let Some(group) = state.registry.group(&group_id) else {
        debug!("No group {:?}", group_id);
        return Err(StatusCode::NOT_FOUND);
    };
    let ctx = RenderContext::new(&state.registry);
    debug!(
        "Rendering {} dashboard with {} reports",
        group.id,
        ctx.dashboard_reports(&group.id).len()
    );
    Ok(Html(render_group_dashboard(&ctx, group, &state.css).into_string()))
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(state: AppState, addr: &str) -> Result<(), ServeError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServeError::Bind {
            addr: addr.to_string(),
            source,
        })?;
    info!("Dashboard listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Dashboard stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutting down"),
        Err(e) => {
            warn!("Could not listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
