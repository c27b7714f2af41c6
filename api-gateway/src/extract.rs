//! Caller identity extraction
//!
//! Callers authenticate with an HS256 bearer token signed with the gateway's
//! shared secret. The `sub` claim is the user id and the `isAdmin` claim
//! grants admin access; nothing else on the request affects identity.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use greenquote_common::Requester;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{error::ApiError, AppState};

/// Bearer token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    /// User id
    pub sub: String,
    #[serde(default)]
    pub is_admin: bool,
    /// Expiry, seconds since the epoch
    pub exp: u64,
}

/// Verifies bearer tokens against the shared secret
#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Requester for a valid, unexpired token
    pub fn verify(&self, token: &str) -> Result<Requester, ApiError> {
        let claims = decode::<Claims>(token, &self.key, &self.validation)
            .map_err(|e| {
                debug!(error = %e, "Rejected bearer token");
                ApiError::Unauthorized
            })?
            .claims;

        if claims.sub.trim().is_empty() {
            return Err(ApiError::Unauthorized);
        }

        Ok(Requester {
            id: claims.sub,
            is_admin: claims.is_admin,
        })
    }
}

/// Authenticated caller
#[derive(Debug, Clone)]
pub struct AuthUser(pub Requester);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(ApiError::Unauthorized)?;

        state.tokens.verify(token).map(AuthUser)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use chrono::Utc;
    use greenquote_pricing::QuotePricer;
    use greenquote_quotes::{InMemoryQuoteStore, QuoteService};
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::sync::Arc;

    const SECRET: &str = "test-secret";

    fn state() -> AppState {
        AppState::new(
            QuoteService::new(Arc::new(InMemoryQuoteStore::new()), QuotePricer::default()),
            TokenVerifier::new(SECRET),
        )
    }

    fn token(secret: &str, sub: &str, is_admin: bool, ttl_secs: i64) -> String {
        let claims = Claims {
            sub: sub.to_string(),
            is_admin,
            exp: (Utc::now().timestamp() + ttl_secs) as u64,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    async fn extract(headers: &[(&str, String)]) -> Result<AuthUser, ApiError> {
        let mut builder = Request::builder().uri("/");
        for (name, value) in headers {
            builder = builder.header(*name, value.as_str());
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        AuthUser::from_request_parts(&mut parts, &state()).await
    }

    fn bearer(token: String) -> (&'static str, String) {
        ("authorization", format!("Bearer {}", token))
    }

    #[tokio::test]
    async fn test_regular_user() {
        let AuthUser(requester) = extract(&[bearer(token(SECRET, "user-1", false, 3600))])
            .await
            .unwrap();
        assert_eq!(requester, Requester::user("user-1"));
    }

    #[tokio::test]
    async fn test_admin_claim() {
        let AuthUser(requester) = extract(&[bearer(token(SECRET, "root", true, 3600))])
            .await
            .unwrap();
        assert_eq!(requester, Requester::admin("root"));
    }

    #[tokio::test]
    async fn test_token_signed_with_other_secret_rejected() {
        let forged = token("attacker-secret", "attacker", true, 3600);
        assert!(matches!(
            extract(&[bearer(forged)]).await,
            Err(ApiError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn test_expired_token_rejected() {
        let expired = token(SECRET, "user-1", false, -3600);
        assert!(matches!(
            extract(&[bearer(expired)]).await,
            Err(ApiError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn test_identity_headers_are_ignored() {
        let spoofed = [
            ("x-user-id", "attacker".to_string()),
            ("x-user-admin", "true".to_string()),
        ];
        assert!(matches!(extract(&spoofed).await, Err(ApiError::Unauthorized)));

        let AuthUser(requester) = extract(&[
            bearer(token(SECRET, "user-1", false, 3600)),
            ("x-user-admin", "true".to_string()),
        ])
        .await
        .unwrap();
        assert!(!requester.is_admin);
    }

    #[tokio::test]
    async fn test_missing_or_malformed_header_rejected() {
        assert!(matches!(extract(&[]).await, Err(ApiError::Unauthorized)));
        assert!(matches!(
            extract(&[("authorization", "Bearer ".to_string())]).await,
            Err(ApiError::Unauthorized)
        ));
        assert!(matches!(
            extract(&[("authorization", "Bearer not.a.jwt".to_string())]).await,
            Err(ApiError::Unauthorized)
        ));
        assert!(matches!(
            extract(&[(
                "authorization",
                format!("Basic {}", token(SECRET, "user-1", false, 3600))
            )])
            .await,
            Err(ApiError::Unauthorized)
        ));
    }
}
