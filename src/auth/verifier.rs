use std::sync::Arc;

use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};

use super::jwks::{self, JwkSet};
use super::{AuthError, Claims, TokenVerifier};
use crate::config::AuthConfig;

/// Select the verifier for the configured trust source: the provider's
/// published keys when a metadata URL is set, otherwise the development
/// shared secret.
pub async fn from_config(config: &AuthConfig) -> Result<Arc<dyn TokenVerifier>, AuthError> {
    if let Some(metadata_url) = &config.metadata_url {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()?;
        let key_set = jwks::fetch_key_set(&http, metadata_url).await?;
        let verifier = OidcVerifier::from_key_set(&config.issuer, &config.audience, key_set)?;
        return Ok(Arc::new(verifier));
    }

    match &config.shared_secret {
        Some(secret) => {
            tracing::warn!("verifying tokens with a shared secret; intended for development only");
            Ok(Arc::new(SharedSecretVerifier::new(
                &config.issuer,
                &config.audience,
                secret,
            )))
        }
        None => Err(AuthError::NoSigningKeys),
    }
}

/// Verifies RS256 tokens against the identity provider's published keys.
pub struct OidcVerifier {
    keys: Vec<(Option<String>, DecodingKey)>,
    validation: Validation,
}

impl OidcVerifier {
    pub fn from_key_set(
        issuer: &str,
        audience: &str,
        key_set: JwkSet,
    ) -> Result<Self, AuthError> {
        let mut keys = Vec::new();
        for jwk in key_set.keys {
            if !jwk.is_rsa_signing_key() {
                continue;
            }
            let (Some(n), Some(e)) = (&jwk.n, &jwk.e) else {
                continue;
            };
            match DecodingKey::from_rsa_components(n, e) {
                Ok(key) => keys.push((jwk.kid.clone(), key)),
                Err(err) => {
                    tracing::warn!(kid = ?jwk.kid, "skipping unusable signing key: {}", err)
                }
            }
        }
        if keys.is_empty() {
            return Err(AuthError::NoSigningKeys);
        }
        Ok(Self {
            keys,
            validation: build_validation(Algorithm::RS256, issuer, audience),
        })
    }
}

impl TokenVerifier for OidcVerifier {
    fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let header = decode_header(token)?;

        // Prefer the key the token names; without a kid, try all of them
        let candidates: Vec<&DecodingKey> = match &header.kid {
            Some(kid) => self
                .keys
                .iter()
                .filter(|(key_id, _)| key_id.as_deref() == Some(kid.as_str()))
                .map(|(_, key)| key)
                .collect(),
            None => self.keys.iter().map(|(_, key)| key).collect(),
        };
        if candidates.is_empty() {
            return Err(AuthError::UnknownKey);
        }

        let mut last_err = None;
        for key in candidates {
            match decode::<Claims>(token, key, &self.validation) {
                Ok(data) => return Ok(data.claims),
                Err(err) => last_err = Some(err),
            }
        }
        Err(last_err.map(AuthError::from).unwrap_or(AuthError::UnknownKey))
    }
}

/// HS256 verification against a locally shared secret, with the same
/// issuer and audience checks as the OIDC verifier. For development and
/// tests where no provider is reachable.
pub struct SharedSecretVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl SharedSecretVerifier {
    pub fn new(issuer: &str, audience: &str, secret: &str) -> Self {
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation: build_validation(Algorithm::HS256, issuer, audience),
        }
    }
}

impl TokenVerifier for SharedSecretVerifier {
    fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(token, &self.key, &self.validation)?;
        Ok(data.claims)
    }
}

fn build_validation(algorithm: Algorithm, issuer: &str, audience: &str) -> Validation {
    let mut validation = Validation::new(algorithm);
    validation.set_issuer(&[issuer]);
    validation.set_audience(&[audience]);
    validation
}
