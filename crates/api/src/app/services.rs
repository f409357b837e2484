//! Shared service wiring for handlers.

use std::sync::Arc;

use garrison_auth::{TokenCodec, Ttl};

use crate::config::ApiConfig;
use crate::credentials::CredentialVerifier;
use crate::middleware::TOKEN_COOKIE;

pub struct AppServices {
    pub codec: Arc<TokenCodec>,
    pub credentials: Arc<dyn CredentialVerifier>,
    pub token_ttl: Ttl,
    pub cookie_secure: bool,
}

impl AppServices {
    /// `Set-Cookie` value carrying a freshly minted token.
    pub fn session_cookie(&self, token: &str) -> String {
        self.cookie(token, self.token_ttl.as_secs())
    }

    /// `Set-Cookie` value that makes the browser drop the token.
    pub fn cleared_cookie(&self) -> String {
        self.cookie("", 0)
    }

    fn cookie(&self, value: &str, max_age: i64) -> String {
        let mut cookie = format!("{TOKEN_COOKIE}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}");
        if self.cookie_secure {
            cookie.push_str("; Secure");
        }
        cookie
    }
}

pub fn build_services(
    config: &ApiConfig,
    codec: Arc<TokenCodec>,
    credentials: Arc<dyn CredentialVerifier>,
) -> AppServices {
    AppServices {
        codec,
        credentials,
        token_ttl: config.token_ttl,
        cookie_secure: config.cookie_secure,
    }
}

#[cfg(test)]
mod tests {
    use garrison_auth::Secret;

    use super::*;
    use crate::credentials::InMemoryCredentials;

    fn services(secure: bool) -> AppServices {
        let mut config = ApiConfig::with_secret("s");
        config.cookie_secure = secure;
        config.token_ttl = "30m".parse().unwrap();
        build_services(
            &config,
            Arc::new(TokenCodec::new(Secret::from("s"))),
            Arc::new(InMemoryCredentials::new()),
        )
    }

    #[test]
    fn session_cookie_is_http_only_with_ttl_max_age() {
        let cookie = services(false).session_cookie("a.b.c");
        assert_eq!(cookie, "token=a.b.c; Path=/; HttpOnly; SameSite=Lax; Max-Age=1800");
    }

    #[test]
    fn secure_flag_follows_config() {
        assert!(services(true).session_cookie("a.b.c").ends_with("; Secure"));
        assert!(services(true).cleared_cookie().contains("Max-Age=0"));
    }
}
