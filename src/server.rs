// HTTP surface: one export route plus a liveness probe.
use crate::article::ArticleResolver;
use crate::config::AppConfig;
use crate::feed::build_feed;
use crate::keycrm::CatalogSource;
use crate::reconcile::reconcile;

use anyhow::Result;
use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use chrono::Local;
use std::sync::Arc;
use tracing::{error, info};

/// Fixed body for any pipeline failure; the caller never sees a partial
/// document.
const ERROR_BODY: &str = "Error generating feed";

pub struct AppState {
    pub source: Box<dyn CatalogSource>,
    pub resolver: ArticleResolver,
    pub config: AppConfig,
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/export/kasta.xml", get(export_feed))
        .route("/health", get(health))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn export_feed(State(state): State<Arc<AppState>>) -> Response {
    match generate_feed(state.as_ref()).await {
        Ok(bytes) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/xml")],
            bytes,
        )
            .into_response(),
        Err(err) => {
            error!("Feed generation failed: {err:#}");
            (StatusCode::INTERNAL_SERVER_ERROR, ERROR_BODY).into_response()
        }
    }
}

/// Full rebuild per request: load the three resources, reconcile, resolve
/// articles, serialize. Nothing is cached between requests.
pub async fn generate_feed(state: &AppState) -> Result<Vec<u8>> {
    let categories = state.source.load_categories().await?;
    let offers = state.source.load_offers().await?;
    let stocks = state.source.load_stocks().await?;
    info!(
        offers = offers.len(),
        stocks = stocks.len(),
        categories = categories.len(),
        "Catalog loaded"
    );

    let reconciled = reconcile(
        &offers,
        &stocks,
        &categories,
        &state.resolver,
        &state.config.shop.name,
    );

    let date = Local::now().format("%Y-%m-%d %H:%M").to_string();
    build_feed(&state.config.shop, &categories, &reconciled, &date)
}
