use kasta_feed::article::ArticleResolver;
use kasta_feed::config::load_config;
use kasta_feed::keycrm::KeyCrmClient;
use kasta_feed::server::{AppState, build_router};

use std::sync::Arc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let config = match load_config("config.json") {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Config load error: {}", e);
            return;
        }
    };
    if config.api_token.is_empty() {
        warn!("KEYCRM_API_KEY not set; upstream requests will be unauthorized");
    }

    let resolver = ArticleResolver::new(config.article_prefix.clone(), &config.article_overrides);
    let source = KeyCrmClient::new(&config);
    let bind_addr = config.bind_addr.clone();

    let state = Arc::new(AppState {
        source: Box::new(source),
        resolver,
        config,
    });

    let listener = match tokio::net::TcpListener::bind(&bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", bind_addr, e);
            return;
        }
    };
    info!("Listening on {}", bind_addr);

    if let Err(e) = axum::serve(listener, build_router(state)).await {
        error!("Server error: {}", e);
    }
}
