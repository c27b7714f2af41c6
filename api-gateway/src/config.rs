//! Gateway configuration

use greenquote_common::{QuoteError, Result, MAX_NUMERIC_INPUT};
use greenquote_pricing::PricingConfig;
use greenquote_quotes::DEFAULT_KEY_PREFIX;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Gateway service configuration
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Service host
    pub host: String,
    /// Service port
    pub port: u16,
    /// Origin allowed by CORS
    pub cors_origin: String,
    /// Pricing pipeline settings
    pub pricing: PricingConfig,
    /// Storage settings
    pub storage: StorageSettings,
    /// Secret verifying HS256 bearer tokens
    pub jwt_secret: Option<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            cors_origin: "http://localhost:3001".to_string(),
            pricing: PricingConfig::default(),
            storage: StorageSettings::default(),
            jwt_secret: None,
        }
    }
}

/// Quote storage settings
#[derive(Debug, Clone)]
pub struct StorageSettings {
    /// Redis URL; quotes are kept in memory when unset
    pub redis_url: Option<String>,
    /// Key prefix for Redis entries
    pub redis_prefix: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            redis_url: None,
            redis_prefix: DEFAULT_KEY_PREFIX.to_string(),
        }
    }
}

impl GatewayConfig {
    /// Load configuration from `.env` and the process environment
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// `GREENQUOTE_PORT` wins over `PORT` when both are set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(port) = lookup("PORT") {
            cfg.port = parse_var("PORT", &port)?;
        }
        if let Some(port) = lookup("GREENQUOTE_PORT") {
            cfg.port = parse_var("GREENQUOTE_PORT", &port)?;
        }
        if let Some(host) = lookup("GREENQUOTE_HOST") {
            cfg.host = host;
        }
        if let Some(origin) = lookup("CORS_ORIGIN") {
            cfg.cors_origin = origin;
        }

        // Pricing
        if let Some(val) = lookup("GREENQUOTE_UNIT_PRICE_PER_KW") {
            let price: Decimal = parse_var("GREENQUOTE_UNIT_PRICE_PER_KW", &val)?;
            if price.is_sign_negative() || price > Decimal::from(MAX_NUMERIC_INPUT) {
                return Err(QuoteError::Config(format!(
                    "GREENQUOTE_UNIT_PRICE_PER_KW must be between 0 and {}",
                    MAX_NUMERIC_INPUT
                )));
            }
            cfg.pricing.unit_price_per_kw = price;
        }
        if let Some(val) = lookup("GREENQUOTE_PAYMENT_CACHE_CAPACITY") {
            cfg.pricing.payment_cache_capacity =
                parse_var("GREENQUOTE_PAYMENT_CACHE_CAPACITY", &val)?;
        }

        // Storage
        if let Some(url) = lookup("GREENQUOTE_REDIS_URL").filter(|u| !u.trim().is_empty()) {
            cfg.storage.redis_url = Some(url);
        }
        if let Some(prefix) = lookup("GREENQUOTE_REDIS_PREFIX") {
            cfg.storage.redis_prefix = prefix;
        }

        // Auth
        let secret = lookup("GREENQUOTE_JWT_SECRET").or_else(|| lookup("JWT_SECRET"));
        cfg.jwt_secret = secret.filter(|s| !s.trim().is_empty());

        Ok(cfg)
    }

    /// The bearer token secret; the gateway refuses to start without one
    pub fn jwt_secret(&self) -> Result<&str> {
        self.jwt_secret.as_deref().ok_or_else(|| {
            QuoteError::Config("GREENQUOTE_JWT_SECRET (or JWT_SECRET) must be set".to_string())
        })
    }

    /// Socket address to bind
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| QuoteError::Config(format!("Invalid {}={:?}: {}", key, value, e)))
}
