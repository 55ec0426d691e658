pub mod jwks;
pub mod verifier;

pub use verifier::{OidcVerifier, SharedSecretVerifier};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Claims the service reads from a verified token. Signature, expiry,
/// issuer, and audience checks all happen during verification; claims the
/// service does not care about are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Stable subject identifier from the identity provider.
    pub sub: String,
    /// Expiry as a unix timestamp.
    pub exp: i64,
    #[serde(default)]
    pub iat: i64,
    #[serde(default)]
    pub preferred_username: Option<String>,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing Authorization header")]
    MissingToken,

    #[error("Authorization header must use the Bearer scheme")]
    MalformedHeader,

    #[error("empty bearer token")]
    EmptyToken,

    #[error("invalid bearer token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("token signed with a key this service does not trust")]
    UnknownKey,

    #[error("identity provider metadata fetch failed: {0}")]
    Discovery(#[from] reqwest::Error),

    #[error("identity provider published no usable signing keys")]
    NoSigningKeys,
}

/// Token verification behind a trait so the trust source is swappable:
/// provider-published keys in production, a shared secret in development
/// and tests.
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<Claims, AuthError>;
}
