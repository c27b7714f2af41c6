//! GreenQuote API Gateway
//!
//! REST surface over the quote service:
//! - `POST /api/quotes` create a quote for the caller
//! - `GET  /api/quotes` caller's quotes, newest first
//! - `GET  /api/quotes/admin/all?q=` every quote, admins only
//! - `GET  /api/quotes/:id` one quote, owner or admin
//! - `GET  /api/health`
//!
//! Every quote route requires an `Authorization: Bearer <jwt>` header; see
//! [`extract`].

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use greenquote_common::{QuoteError, Result};
use greenquote_quotes::QuoteService;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

pub use config::GatewayConfig;
pub use error::{ApiError, ApiResult};
pub use extract::{AuthUser, Claims, TokenVerifier};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub quotes: Arc<QuoteService>,
    pub tokens: Arc<TokenVerifier>,
}

impl AppState {
    pub fn new(quotes: QuoteService, tokens: TokenVerifier) -> Self {
        Self {
            quotes: Arc::new(quotes),
            tokens: Arc::new(tokens),
        }
    }
}

/// Build the gateway router with CORS restricted to `cors_origin`
pub fn build_router(state: AppState, cors_origin: &str) -> Result<Router> {
    let origin: HeaderValue = cors_origin
        .parse()
        .map_err(|e| QuoteError::Config(format!("Invalid CORS origin {:?}: {}", cors_origin, e)))?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let router = Router::new()
        .route("/api/health", get(routes::health_check))
        .route(
            "/api/quotes",
            get(routes::list_my_quotes).post(routes::create_quote),
        )
        .route("/api/quotes/admin/all", get(routes::list_all_quotes))
        .route("/api/quotes/:id", get(routes::get_quote))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state);

    Ok(router)
}
