//! Shared-secret authentication for every customer route.
//!
//! The gate reads the raw `Authorization` header and hands it to a
//! [`TokenVerifier`]. The header value is compared as-is; there is no
//! `Bearer ` prefix handling.
//!
//! # Usage
//!
//! ```rust,ignore
//! use axum::middleware;
//! use customers::server::auth::{auth_gate, AuthState};
//!
//! let auth = AuthState::from_config(&config.auth);
//! let app = Router::new()
//!     .route("/customers", get(list_customers_handler))
//!     .layer(middleware::from_fn_with_state(auth, auth_gate));
//! ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::config::AuthConfig;
use crate::server::api_error::{ApiError, ErrorCode};

/// Decides whether a presented credential is acceptable.
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> bool;
}

/// Hash a token using SHA-256, hex encoded.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Accepts exactly one configured secret.
///
/// Only the SHA-256 digest of the secret is kept in memory.
#[derive(Clone)]
pub struct StaticTokenVerifier {
    token_hash: String,
}

impl StaticTokenVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            token_hash: hash_token(secret),
        }
    }
}

impl TokenVerifier for StaticTokenVerifier {
    fn verify(&self, token: &str) -> bool {
        hash_token(token) == self.token_hash
    }
}

impl std::fmt::Debug for StaticTokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticTokenVerifier").finish_non_exhaustive()
    }
}

/// Authentication errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// Missing Authorization header
    MissingToken,
    /// Header present but rejected by the verifier
    InvalidToken,
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::MissingToken => write!(f, "missing authorization token"),
            AuthError::InvalidToken => write!(f, "you don't have authorization"),
        }
    }
}

impl std::error::Error for AuthError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let code = match err {
            AuthError::MissingToken => ErrorCode::MissingToken,
            AuthError::InvalidToken => ErrorCode::InvalidToken,
        };
        ApiError::with_message(code, err.to_string())
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}

/// State handed to [`auth_gate`].
#[derive(Clone)]
pub struct AuthState {
    pub verifier: Arc<dyn TokenVerifier>,
}

impl AuthState {
    pub fn new(verifier: Arc<dyn TokenVerifier>) -> Self {
        Self { verifier }
    }

    /// Build a [`StaticTokenVerifier`] for the configured secret.
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(Arc::new(StaticTokenVerifier::new(&config.token)))
    }

    /// Check a raw `Authorization` header value.
    pub fn check(&self, header: Option<&str>) -> Result<(), AuthError> {
        let token = header.ok_or(AuthError::MissingToken)?;
        if self.verifier.verify(token) {
            Ok(())
        } else {
            Err(AuthError::InvalidToken)
        }
    }
}

impl std::fmt::Debug for AuthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthState").finish_non_exhaustive()
    }
}

/// Middleware that rejects requests without the shared secret.
///
/// A rejected request never reaches its handler.
pub async fn auth_gate(State(auth): State<AuthState>, request: Request, next: Next) -> Response {
    let header = match request.headers().get(AUTHORIZATION) {
        None => None,
        Some(value) => match value.to_str() {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(path = %request.uri().path(), "Rejected request: unreadable authorization header");
                return AuthError::InvalidToken.into_response();
            }
        },
    };

    if let Err(err) = auth.check(header) {
        warn!(path = %request.uri().path(), reason = %err, "Rejected request");
        return err.into_response();
    }

    let response = next.run(request).await;
    debug!(status = %response.status().as_u16(), "auth gate passed");
    response
}
