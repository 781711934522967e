//! JWT authentication module.
//!
//! Issues access tokens for `POST /getToken` and verifies the bearer
//! credential of owner-scoped routes.
//!
//! ## Verification
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Authorization header                                                   │
//! │       │                                                                 │
//! │       ├── absent ─────────────────────────────► Unauthorized (401)     │
//! │       │                                                                 │
//! │       ├── not "Bearer <token>" ───────────────► Forbidden    (403)     │
//! │       │                                                                 │
//! │       ├── bad signature / malformed / expired ► Forbidden    (403)     │
//! │       │                                                                 │
//! │       └── valid ──────────────────────────────► Identity { email }     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rejections carry no detail in the response body. The reason is logged.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

use warehouse_core::validation::validate_email;
use warehouse_core::{Identity, ValidationError};

use crate::error::ApiError;
use crate::AppState;

/// Claim names the server sets itself; callers can't supply them as extras.
const RESERVED_CLAIMS: &[&str] = &["email", "iat", "exp"];

/// JWT claims structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Caller identity
    pub email: String,

    /// Any other claims the caller posted, carried through unchanged
    #[serde(flatten)]
    pub extra: Map<String, Value>,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,
}

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No `Authorization` header at all.
    #[error("Missing authorization header")]
    MissingCredentials,

    /// Header present but not of the form `Bearer <token>`.
    #[error("Authorization header is not a bearer credential")]
    MalformedHeader,

    /// Signature, structure, or expiry check failed.
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// The posted claims can't be signed.
    #[error(transparent)]
    InvalidClaims(#[from] ValidationError),

    /// Signing failed.
    #[error("Failed to generate token: {0}")]
    Signing(String),
}

/// JWT token manager.
#[derive(Clone)]
pub struct JwtManager {
    secret: String,
    lifetime_secs: i64,
}

impl JwtManager {
    /// Create a new JWT manager.
    pub fn new(secret: impl Into<String>, lifetime_secs: i64) -> Self {
        JwtManager {
            secret: secret.into(),
            lifetime_secs,
        }
    }

    /// Sign a caller-supplied claims object.
    ///
    /// `email` is required and must be well formed. `iat` and `exp` are set
    /// here; any values the caller sent for them are dropped.
    pub fn issue(&self, mut claims: Map<String, Value>) -> Result<String, AuthError> {
        let email = match claims.get("email") {
            Some(Value::String(email)) => email.clone(),
            Some(_) => {
                return Err(ValidationError::InvalidFormat {
                    field: "email".to_string(),
                    reason: "must be a string".to_string(),
                }
                .into())
            }
            None => {
                return Err(ValidationError::Required {
                    field: "email".to_string(),
                }
                .into())
            }
        };
        validate_email(&email)?;

        claims.retain(|key, _| !RESERVED_CLAIMS.contains(&key.as_str()));

        let now = Utc::now();
        let exp = now + Duration::seconds(self.lifetime_secs);

        let claims = Claims {
            email,
            extra: claims,
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Validate and decode a token.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let validation = Validation::new(Algorithm::HS256);

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        Ok(token_data.claims)
    }
}

/// Extract bearer token from authorization header.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Gate in front of owner-scoped routes.
#[derive(Clone)]
pub struct AuthGuard {
    jwt: JwtManager,
}

impl AuthGuard {
    pub fn new(jwt: JwtManager) -> Self {
        AuthGuard { jwt }
    }

    /// The manager used to issue tokens.
    pub fn jwt(&self) -> &JwtManager {
        &self.jwt
    }

    /// Verify the raw `Authorization` header value.
    pub fn verify(&self, header: Option<&str>) -> Result<Identity, AuthError> {
        let header = header.ok_or(AuthError::MissingCredentials)?;
        let token = extract_bearer_token(header).ok_or(AuthError::MalformedHeader)?;
        let claims = self.jwt.verify(token)?;

        Ok(Identity::new(claims.email))
    }
}

/// Extractor for handlers that need a verified caller.
///
/// ```rust,ignore
/// async fn list_my_items(AuthenticatedUser(identity): AuthenticatedUser) { ... }
/// ```
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Identity);

impl FromRequestParts<Arc<AppState>> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = match parts.headers.get(AUTHORIZATION) {
            None => None,
            // Non-visible ASCII can't be a bearer credential
            Some(value) => Some(value.to_str().map_err(|_| {
                warn!(path = %parts.uri.path(), "Rejected non-ASCII authorization header");
                ApiError::from(AuthError::MalformedHeader)
            })?),
        };

        match state.auth.verify(header) {
            Ok(identity) => Ok(AuthenticatedUser(identity)),
            Err(err) => {
                warn!(path = %parts.uri.path(), error = %err, "Authentication failed");
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn claims(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("claims must be an object"),
        }
    }

    #[test]
    fn test_jwt_roundtrip() {
        let manager = JwtManager::new("test-secret", 3600);

        let token = manager
            .issue(claims(json!({ "email": "a@x.com", "role": "picker" })))
            .unwrap();
        let decoded = manager.verify(&token).unwrap();

        assert_eq!(decoded.email, "a@x.com");
        assert_eq!(decoded.extra["role"], json!("picker"));
        assert_eq!(decoded.exp - decoded.iat, 3600);
    }

    #[test]
    fn test_issue_ignores_reserved_claims() {
        let manager = JwtManager::new("test-secret", 3600);

        let token = manager
            .issue(claims(json!({ "email": "a@x.com", "exp": 1, "iat": 1 })))
            .unwrap();
        let decoded = manager.verify(&token).unwrap();

        assert!(decoded.exp > Utc::now().timestamp());
        assert!(!decoded.extra.contains_key("exp"));
    }

    #[test]
    fn test_issue_requires_valid_email() {
        let manager = JwtManager::new("test-secret", 3600);

        assert!(matches!(
            manager.issue(claims(json!({ "name": "a" }))),
            Err(AuthError::InvalidClaims(ValidationError::Required { .. }))
        ));
        assert!(matches!(
            manager.issue(claims(json!({ "email": 42 }))),
            Err(AuthError::InvalidClaims(_))
        ));
        assert!(matches!(
            manager.issue(claims(json!({ "email": "nope" }))),
            Err(AuthError::InvalidClaims(_))
        ));
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let issuer = JwtManager::new("secret-a", 3600);
        let verifier = JwtManager::new("secret-b", 3600);

        let token = issuer
            .issue(claims(json!({ "email": "a@x.com" })))
            .unwrap();

        assert!(matches!(
            verifier.verify(&token),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let manager = JwtManager::new("test-secret", 3600);
        let past = Utc::now().timestamp() - 3600;

        let expired = Claims {
            email: "a@x.com".to_string(),
            extra: Map::new(),
            iat: past - 60,
            exp: past,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &expired,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert!(matches!(
            manager.verify(&token),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_guard_outcomes() {
        let guard = AuthGuard::new(JwtManager::new("test-secret", 3600));
        let token = guard
            .jwt()
            .issue(claims(json!({ "email": "a@x.com" })))
            .unwrap();

        assert!(matches!(
            guard.verify(None),
            Err(AuthError::MissingCredentials)
        ));
        assert!(matches!(
            guard.verify(Some(token.as_str())),
            Err(AuthError::MalformedHeader)
        ));
        assert!(matches!(
            guard.verify(Some("Bearer not.a.jwt")),
            Err(AuthError::InvalidToken(_))
        ));

        let header = format!("Bearer {}", token);
        let identity = guard.verify(Some(header.as_str())).unwrap();
        assert_eq!(identity, Identity::new("a@x.com"));
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("Bearer "), None);
        assert_eq!(extract_bearer_token("Basic abc"), None);
    }
}
