use serde::Deserialize;

use super::AuthError;

/// The slice of the OIDC discovery document this service needs.
#[derive(Debug, Deserialize)]
pub struct ProviderMetadata {
    pub issuer: String,
    pub jwks_uri: String,
}

/// JSON Web Key Set as published at the provider's `jwks_uri`.
#[derive(Debug, Deserialize)]
pub struct JwkSet {
    pub keys: Vec<Jwk>,
}

#[derive(Debug, Deserialize)]
pub struct Jwk {
    pub kty: String,
    #[serde(default)]
    pub kid: Option<String>,
    #[serde(rename = "use", default)]
    pub public_key_use: Option<String>,
    #[serde(default)]
    pub alg: Option<String>,
    /// RSA modulus, base64url.
    #[serde(default)]
    pub n: Option<String>,
    /// RSA public exponent, base64url.
    #[serde(default)]
    pub e: Option<String>,
}

impl Jwk {
    /// Whether this key can verify RS256 signatures. Providers also
    /// publish encryption keys; those are skipped.
    pub fn is_rsa_signing_key(&self) -> bool {
        self.kty == "RSA"
            && self.public_key_use.as_deref() != Some("enc")
            && self.n.is_some()
            && self.e.is_some()
    }
}

/// Fetch the discovery document, then the key set it points at. Runs once
/// at startup; picking up rotated keys takes a restart.
pub async fn fetch_key_set(
    http: &reqwest::Client,
    metadata_url: &str,
) -> Result<JwkSet, AuthError> {
    let metadata: ProviderMetadata = http
        .get(metadata_url)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    tracing::info!(issuer = %metadata.issuer, jwks_uri = %metadata.jwks_uri, "discovered identity provider");

    let key_set: JwkSet = http
        .get(&metadata.jwks_uri)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    Ok(key_set)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_provider_metadata() {
        let metadata: ProviderMetadata = serde_json::from_str(
            r#"{
                "issuer": "https://idp.test/realms/catalog",
                "authorization_endpoint": "https://idp.test/realms/catalog/auth",
                "jwks_uri": "https://idp.test/realms/catalog/certs"
            }"#,
        )
        .expect("metadata");
        assert_eq!(metadata.issuer, "https://idp.test/realms/catalog");
        assert_eq!(metadata.jwks_uri, "https://idp.test/realms/catalog/certs");
    }

    #[test]
    fn signing_key_filter_skips_encryption_and_non_rsa_keys() {
        let key_set: JwkSet = serde_json::from_str(
            r#"{"keys": [
                {"kty": "RSA", "kid": "sig-1", "use": "sig", "alg": "RS256", "n": "abc", "e": "AQAB"},
                {"kty": "RSA", "kid": "enc-1", "use": "enc", "n": "abc", "e": "AQAB"},
                {"kty": "EC", "kid": "ec-1", "use": "sig"},
                {"kty": "RSA", "kid": "broken", "use": "sig"}
            ]}"#,
        )
        .expect("key set");

        let signing: Vec<&str> = key_set
            .keys
            .iter()
            .filter(|k| k.is_rsa_signing_key())
            .filter_map(|k| k.kid.as_deref())
            .collect();
        assert_eq!(signing, vec!["sig-1"]);
    }
}
