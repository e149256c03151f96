//! JWKS client for fetching and caching the identity provider's RSA keys.

use std::collections::HashMap;
use std::sync::Arc;

use jsonwebtoken::DecodingKey;
use serde::Deserialize;
use tokio::sync::RwLock;

/// How long to cache JWKS before re-fetching (1 hour).
const CACHE_TTL: std::time::Duration = std::time::Duration::from_secs(3600);

/// A cached set of decoding keys fetched from the identity provider.
#[derive(Clone)]
pub struct IdentityJwks {
    url: String,
    http: reqwest::Client,
    cache: Arc<RwLock<JwksCache>>,
}

struct JwksCache {
    keys: HashMap<String, DecodingKey>,
    fetched_at: Option<std::time::Instant>,
}

#[derive(Debug, Deserialize)]
struct JwksResponse {
    keys: Vec<JwkEntry>,
}

#[derive(Debug, Deserialize)]
struct JwkEntry {
    kid: Option<String>,
    kty: String,
    n: Option<String>,
    e: Option<String>,
}

impl IdentityJwks {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            http: reqwest::Client::new(),
            cache: Arc::new(RwLock::new(JwksCache {
                keys: HashMap::new(),
                fetched_at: None,
            })),
        }
    }

    /// For tests: create a client pre-loaded with a known key.
    pub fn with_static_key(kid: &str, decoding_key: DecodingKey) -> Self {
        let mut keys = HashMap::new();
        keys.insert(kid.to_string(), decoding_key);
        Self {
            url: String::new(),
            http: reqwest::Client::new(),
            cache: Arc::new(RwLock::new(JwksCache {
                keys,
                // Set fetched_at far in the future so it never expires in tests.
                fetched_at: Some(std::time::Instant::now() + std::time::Duration::from_secs(86400)),
            })),
        }
    }

    /// Get the decoding key for a given `kid`. Fetches/re-fetches JWKS as needed.
    pub async fn get_key(&self, kid: &str) -> Result<DecodingKey, String> {
        // Try cache first.
        {
            let cache = self.cache.read().await;
            if let Some(key) = cache.keys.get(kid) {
                if cache_is_fresh(&cache) {
                    return Ok(key.clone());
                }
            }
        }

        // Cache miss or stale — re-fetch.
        self.refresh().await?;

        // Try again after refresh.
        let cache = self.cache.read().await;
        cache
            .keys
            .get(kid)
            .cloned()
            .ok_or_else(|| "unknown signing key".to_string())
    }

    async fn refresh(&self) -> Result<(), String> {
        tracing::info!(url = %self.url, "fetching identity provider JWKS");

        let resp: JwksResponse = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(?e, "JWKS fetch failed");
                "failed to fetch JWKS".to_string()
            })?
            .json()
            .await
            .map_err(|e| {
                tracing::warn!(?e, "JWKS parse failed");
                "failed to parse JWKS".to_string()
            })?;

        let mut keys = HashMap::new();
        for entry in resp.keys {
            if entry.kty != "RSA" {
                continue;
            }
            let (Some(kid), Some(n), Some(e)) = (entry.kid, entry.n, entry.e) else {
                continue;
            };

            match DecodingKey::from_rsa_components(&n, &e) {
                Ok(decoding) => {
                    keys.insert(kid, decoding);
                }
                Err(err) => {
                    tracing::warn!(?err, %kid, "bad JWKS RSA components");
                }
            }
        }

        let mut cache = self.cache.write().await;
        cache.keys = keys;
        cache.fetched_at = Some(std::time::Instant::now());

        Ok(())
    }
}

fn cache_is_fresh(cache: &JwksCache) -> bool {
    match cache.fetched_at {
        Some(t) => t.elapsed() < CACHE_TTL,
        None => false,
    }
}
