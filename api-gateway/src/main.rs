//! GreenQuote API Gateway binary

use std::sync::Arc;

use greenquote_api_gateway::{build_router, AppState, GatewayConfig, TokenVerifier};
use greenquote_pricing::QuotePricer;
use greenquote_quotes::{InMemoryQuoteStore, QuoteService, QuoteStore, RedisQuoteStore};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_gateway=info".parse()?)
                .add_directive("greenquote_api_gateway=info".parse()?)
                .add_directive("greenquote_quotes=info".parse()?)
                .add_directive("tower_http=info".parse()?),
        )
        .json()
        .init();

    let config = GatewayConfig::load()?;
    let tokens = TokenVerifier::new(config.jwt_secret()?);

    let store: Arc<dyn QuoteStore> = match &config.storage.redis_url {
        Some(url) => {
            let store = RedisQuoteStore::connect(url)
                .await?
                .with_prefix(&config.storage.redis_prefix);
            info!(prefix = %config.storage.redis_prefix, "Using Redis quote store");
            Arc::new(store)
        }
        None => {
            warn!("GREENQUOTE_REDIS_URL not set, quotes are kept in memory");
            Arc::new(InMemoryQuoteStore::new())
        }
    };

    let pricer = QuotePricer::new(config.pricing.clone());
    info!(
        unit_price_per_kw = %pricer.unit_price_per_kw(),
        cache_capacity = config.pricing.payment_cache_capacity,
        "Pricing configured"
    );

    let state = AppState::new(QuoteService::new(store, pricer), tokens);
    let app = build_router(state, &config.cors_origin)?;

    let addr = config.bind_addr();
    info!("GreenQuote API Gateway starting on {}", addr);
    info!("Endpoints: /api/health, /api/quotes, /api/quotes/:id, /api/quotes/admin/all");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("GreenQuote API Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
