//! Process configuration, read once at startup.

use std::net::SocketAddr;

use thiserror::Error;

use garrison_auth::{Secret, TokenError, Ttl};

const DEV_SECRET: &str = "dev-secret";
const DEFAULT_TTL: &str = "1h";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("TOKEN_TTL: {0}")]
    InvalidTtl(#[source] TokenError),

    #[error("BIND_ADDR '{value}': {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("{key} must be true or false, got '{value}'")]
    InvalidBool { key: &'static str, value: String },
}

/// Login bootstrap account seeded into the development credential directory.
#[derive(Clone, PartialEq, Eq)]
pub struct BootstrapAdmin {
    pub username: String,
    pub password: String,
}

impl core::fmt::Debug for BootstrapAdmin {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BootstrapAdmin")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// HMAC secret for every token this process signs or verifies.
    pub jwt_secret: Secret,
    /// Lifetime of tokens minted at login; also the cookie `Max-Age`.
    pub token_ttl: Ttl,
    pub bind_addr: SocketAddr,
    /// Add `Secure` to the session cookie (set in production behind TLS).
    pub cookie_secure: bool,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

impl ApiConfig {
    /// Defaults with an explicit secret.
    pub fn with_secret(secret: impl Into<Secret>) -> Self {
        Self {
            jwt_secret: secret.into(),
            token_ttl: Ttl::default(),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 5000)),
            cookie_secure: false,
            bootstrap_admin: None,
        }
    }

    /// Load from the process environment, after reading `.env` if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let jwt_secret = match lookup("JWT_SECRET").filter(|s| !s.is_empty()) {
            Some(secret) => Secret::from(secret),
            None => {
                tracing::warn!("JWT_SECRET not set; using insecure dev default");
                Secret::from(DEV_SECRET)
            }
        };

        let token_ttl = lookup("TOKEN_TTL")
            .unwrap_or_else(|| DEFAULT_TTL.to_string())
            .parse::<Ttl>()
            .map_err(ConfigError::InvalidTtl)?;

        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr
            .parse::<SocketAddr>()
            .map_err(|source| ConfigError::InvalidBindAddr {
                value: bind_addr.clone(),
                source,
            })?;

        let cookie_secure = match lookup("COOKIE_SECURE") {
            None => false,
            Some(value) => parse_bool(&value).ok_or(ConfigError::InvalidBool {
                key: "COOKIE_SECURE",
                value,
            })?,
        };

        let bootstrap_admin = match (
            lookup("BOOTSTRAP_ADMIN_USERNAME"),
            lookup("BOOTSTRAP_ADMIN_PASSWORD"),
        ) {
            (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
                Some(BootstrapAdmin { username, password })
            }
            _ => None,
        };

        Ok(Self {
            jwt_secret,
            token_ttl,
            bind_addr,
            cookie_secure,
            bootstrap_admin,
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
