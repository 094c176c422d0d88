//! JWT Service for token validation and generation.
//!
//! The identity provider in front of this API mints bearer tokens carrying a
//! principal id and role; this service validates them per request. Token
//! generation is kept for the provider-side tooling and for tests.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

use crate::models::Role;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (principal id)
    pub sub: Uuid,
    /// Role granted by the identity provider
    pub role: Role,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// JWT Service configuration
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_duration: Duration,
}

impl JwtService {
    /// Create a new JWT service with the given secret
    ///
    /// # Arguments
    /// * `secret` - The secret key for signing tokens (should be at least 32 bytes)
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_duration: Duration::hours(12),
        }
    }

    /// Create a new JWT service from environment variables.
    ///
    /// In production (APP_ENV != "development"), this will panic if JWT_SECRET
    /// is not set. In development, falls back to an insecure default secret
    /// with a warning.
    ///
    /// # Panics
    /// Panics in production if JWT_SECRET environment variable is not set.
    pub fn from_env() -> Self {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "production".to_string());
        let is_development = app_env.to_lowercase() == "development";

        let secret = match std::env::var("JWT_SECRET") {
            Ok(s) => s,
            Err(_) => {
                if is_development {
                    warn!(
                        "JWT_SECRET not set! Using default secret for development. DO NOT USE IN PRODUCTION!"
                    );
                    "dev-secret-do-not-use-in-production-change-me-now".to_string()
                } else {
                    panic!(
                        "CRITICAL: JWT_SECRET environment variable is required in production. Set APP_ENV=development to use default secret."
                    );
                }
            }
        };

        if secret.len() < 32 {
            if is_development {
                warn!("JWT_SECRET is less than 32 characters. Consider using a longer secret.");
            } else {
                panic!("CRITICAL: JWT_SECRET must be at least 32 characters in production.");
            }
        }

        Self::new(&secret)
    }

    /// Generate a signed token for a principal
    pub fn generate_token(&self, principal_id: Uuid, role: Role) -> Result<String, String> {
        let now = Utc::now();
        let claims = Claims {
            sub: principal_id,
            role,
            exp: (now + self.token_duration).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| format!("Failed to encode token: {}", e))
    }

    /// Validate a token and return the claims
    pub fn validate_token(&self, token: &str) -> Result<Claims, String> {
        Ok(self.decode_token(token)?.claims)
    }

    /// Decode and validate a token (checks signature and expiration)
    fn decode_token(&self, token: &str) -> Result<TokenData<Claims>, String> {
        let mut validation = Validation::default();
        validation.validate_exp = true;

        decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => "Token has expired".to_string(),
            jsonwebtoken::errors::ErrorKind::InvalidToken => "Invalid token format".to_string(),
            jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                "Invalid token signature".to_string()
            }
            _ => format!("Token validation failed: {}", e),
        })
    }

    /// Extract bearer token from Authorization header
    pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
        if auth_header.starts_with("Bearer ") {
            auth_header.strip_prefix("Bearer ")
        } else {
            None
        }
    }
}

/// Shared JWT service for use across the application
pub type SharedJwtService = Arc<JwtService>;
