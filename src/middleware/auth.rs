//! JWT authentication middleware.
//!
//! # Responsibilities
//! - Issue HS256 tokens carrying a user id and role
//! - Require `Authorization: Bearer <token>` on protected routes
//! - Attach the verified `Identity` to the request-scoped store
//!
//! # Design Decisions
//! - Expiry is checked with zero leeway
//! - The identity is a typed value, not an entry in the route params

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use axum::http::{header, StatusCode};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::engine::Context;
use crate::observability::metrics;

/// Token signing configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl: Duration,
}

/// Claims carried in issued tokens.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub uid: u64,
    pub role: String,
    /// Subject (user id as a string).
    pub sub: String,
    /// Expiration time (seconds since epoch).
    pub exp: u64,
    /// Issued at (seconds since epoch).
    pub iat: u64,
}

/// Authenticated caller, available to later chain entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub subject: String,
    pub role: String,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("failed to sign token: {0}")]
    Encode(#[source] jsonwebtoken::errors::Error),
    #[error("invalid token: {0}")]
    Decode(#[source] jsonwebtoken::errors::Error),
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

/// Sign claims with the configured secret.
pub fn encode_claims(config: &JwtConfig, claims: &Claims) -> Result<String, AuthError> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(AuthError::Encode)
}

/// Issue a token for `uid` with `role`, valid for `config.ttl`.
pub fn generate_token(config: &JwtConfig, uid: u64, role: &str) -> Result<String, AuthError> {
    let now = now_secs();
    let claims = Claims {
        uid,
        role: role.to_string(),
        sub: uid.to_string(),
        exp: now + config.ttl.as_secs(),
        iat: now,
    };
    encode_claims(config, &claims)
}

/// Verify signature and expiry, returning the claims.
pub fn verify_token(config: &JwtConfig, token: &str) -> Result<Claims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(AuthError::Decode)
}

/// Build the JWT middleware.
pub fn jwt_auth(config: JwtConfig) -> impl Fn(&mut Context) + Send + Sync + 'static {
    move |c: &mut Context| {
        let token = c
            .header(header::AUTHORIZATION.as_str())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::to_string);

        let Some(token) = token else {
            metrics::record_auth_rejection("missing_token");
            c.json(
                StatusCode::UNAUTHORIZED,
                &json!({ "error": "authorization required" }),
            );
            return;
        };

        match verify_token(&config, &token) {
            Ok(claims) => {
                c.extensions_mut().insert(Identity {
                    subject: claims.sub,
                    role: claims.role,
                });
                c.next();
            }
            Err(e) => {
                tracing::debug!(path = %c.path(), error = %e, "Token rejected");
                metrics::record_auth_rejection("invalid_token");
                c.json(
                    StatusCode::UNAUTHORIZED,
                    &json!({ "error": "invalid or expired token" }),
                );
            }
        }
    }
}
