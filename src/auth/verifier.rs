//! Credential resolution: ordered verifier chain over the two token schemes.

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use crate::config::Config;

use super::jwks::IdentityJwks;

/// Canonical authenticated identity derived from a credential.
///
/// Resolved once per connection (or per request) and immutable afterwards.
#[derive(Debug, Clone)]
pub struct Principal {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("missing credential")]
    Unauthenticated,
    #[error("invalid credential: {0}")]
    InvalidCredential(String),
}

/// One credential scheme. Verifiers are tried in order; the first success
/// wins.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Short scheme name used in aggregated failure reasons.
    fn scheme(&self) -> &'static str;

    async fn verify(&self, token: &str) -> Result<Principal, String>;
}

/// Resolves a bearer credential to a [`Principal`].
///
/// Externally-issued identity tokens are preferred over locally-signed
/// session tokens: a token valid under both schemes resolves through the
/// external one. Verification results are never cached across connections.
pub struct IdentityResolver {
    verifiers: Vec<Box<dyn CredentialVerifier>>,
}

impl IdentityResolver {
    pub fn new(verifiers: Vec<Box<dyn CredentialVerifier>>) -> Self {
        Self { verifiers }
    }

    /// Build the production chain: external identity tokens first (when the
    /// provider is configured), locally-signed session tokens as fallback.
    pub fn from_config(config: &Config) -> Self {
        let mut verifiers: Vec<Box<dyn CredentialVerifier>> = Vec::new();

        if let (Some(jwks_url), Some(issuer), Some(audience)) = (
            &config.identity_jwks_url,
            &config.identity_issuer,
            &config.identity_audience,
        ) {
            verifiers.push(Box::new(IdentityTokenVerifier::new(
                IdentityJwks::new(jwks_url),
                issuer,
                audience,
            )));
        } else {
            tracing::info!("identity provider not configured; session tokens only");
        }

        verifiers.push(Box::new(SessionTokenVerifier::new(&config.session_secret)));

        Self::new(verifiers)
    }

    pub async fn resolve(&self, credential: Option<&str>) -> Result<Principal, ResolveError> {
        let token = credential
            .filter(|t| !t.is_empty())
            .ok_or(ResolveError::Unauthenticated)?;

        let mut reasons = Vec::with_capacity(self.verifiers.len());
        for verifier in &self.verifiers {
            match verifier.verify(token).await {
                Ok(principal) => return Ok(principal),
                Err(reason) => reasons.push(format!("{}: {}", verifier.scheme(), reason)),
            }
        }

        Err(ResolveError::InvalidCredential(reasons.join("; ")))
    }
}

// ---------------------------------------------------------------------------
// External identity tokens (RS256, provider JWKS)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct IdentityClaims {
    sub: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

pub struct IdentityTokenVerifier {
    jwks: IdentityJwks,
    issuer: String,
    audience: String,
}

impl IdentityTokenVerifier {
    pub fn new(jwks: IdentityJwks, issuer: &str, audience: &str) -> Self {
        Self {
            jwks,
            issuer: issuer.to_string(),
            audience: audience.to_string(),
        }
    }
}

#[async_trait]
impl CredentialVerifier for IdentityTokenVerifier {
    fn scheme(&self) -> &'static str {
        "identity"
    }

    async fn verify(&self, token: &str) -> Result<Principal, String> {
        let header =
            jsonwebtoken::decode_header(token).map_err(|e| format!("bad header: {e}"))?;
        let kid = header.kid.ok_or_else(|| "token missing kid".to_string())?;

        let key = self.jwks.get_key(&kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);

        let data = jsonwebtoken::decode::<IdentityClaims>(token, &key, &validation)
            .map_err(|e| e.to_string())?;

        Ok(Principal {
            uid: data.claims.sub,
            email: data.claims.email,
            display_name: data.claims.name,
        })
    }
}

// ---------------------------------------------------------------------------
// Locally-signed session tokens (HS256, shared secret)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct SessionClaims {
    uid: String,
    #[serde(default)]
    email: Option<String>,
}

pub struct SessionTokenVerifier {
    key: DecodingKey,
}

impl SessionTokenVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

#[async_trait]
impl CredentialVerifier for SessionTokenVerifier {
    fn scheme(&self) -> &'static str {
        "session"
    }

    async fn verify(&self, token: &str) -> Result<Principal, String> {
        let validation = Validation::new(Algorithm::HS256);
        let data = jsonwebtoken::decode::<SessionClaims>(token, &self.key, &validation)
            .map_err(|e| e.to_string())?;

        Ok(Principal {
            uid: data.claims.uid,
            email: data.claims.email,
            display_name: None,
        })
    }
}
