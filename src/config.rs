/// Service configuration, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Secret used to verify locally-signed HS256 session tokens.
    pub session_secret: String,
    /// Expected `iss` claim of external identity tokens.
    pub identity_issuer: Option<String>,
    /// Expected `aud` claim of external identity tokens.
    pub identity_audience: Option<String>,
    /// JWKS endpoint of the external identity provider.
    pub identity_jwks_url: Option<String>,
    /// Allowed CORS origin. Any origin when unset.
    pub client_url: Option<String>,
    /// Port the HTTP server binds to.
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// The external identity provider is optional: when its variables are
    /// missing, only locally-signed session tokens are accepted.
    pub fn from_env() -> Self {
        Self {
            session_secret: std::env::var("SESSION_SECRET")
                .unwrap_or_else(|_| "supersecretkey".to_string()),
            identity_issuer: optional_var("IDENTITY_ISSUER"),
            identity_audience: optional_var("IDENTITY_AUDIENCE"),
            identity_jwks_url: optional_var("IDENTITY_JWKS_URL"),
            client_url: optional_var("CLIENT_URL"),
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5001),
        }
    }
}

fn optional_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}
