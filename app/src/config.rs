//! Runtime configuration read from the environment.

use actix_web::cookie::Key;
use std::env;
use std::io;

const MIN_SESSION_KEY_BYTES: usize = 64;

/// Startup configuration, read once before the server starts.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Listen address
    pub bind_addr: String,
    /// Session signing key material (unset: generate per process)
    pub session_key: Option<String>,
    /// Bcrypt cost factor (unset: crate default)
    pub bcrypt_cost: Option<u32>,
    /// Username lookup case mode (default: case-sensitive)
    pub case_insensitive_usernames: bool,
}

impl AppConfig {
    /// Read configuration from the process environment, loading `.env`
    /// first when present.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            bind_addr: env::var("STOCKSIM_BIND").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            session_key: env::var("STOCKSIM_SESSION_KEY").ok(),
            bcrypt_cost: env::var("STOCKSIM_BCRYPT_COST")
                .ok()
                .and_then(|v| v.parse().ok()),
            case_insensitive_usernames: env::var("STOCKSIM_CASE_INSENSITIVE_USERNAMES")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        }
    }

    /// The session signing key.
    ///
    /// A configured key must be at least 64 bytes; anything shorter is a
    /// startup error, not a silent fallback. Without a configured key a
    /// random one is generated, so sessions do not survive a restart.
    pub fn session_key(&self) -> io::Result<Key> {
        match &self.session_key {
            Some(secret) if secret.len() >= MIN_SESSION_KEY_BYTES => {
                Ok(Key::from(secret.as_bytes()))
            }
            Some(_) => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "STOCKSIM_SESSION_KEY must be at least 64 bytes",
            )),
            None => {
                log::warn!("STOCKSIM_SESSION_KEY not set; sessions will not survive a restart");
                Ok(Key::generate())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_key(key: Option<&str>) -> AppConfig {
        AppConfig {
            bind_addr: "127.0.0.1:0".to_string(),
            session_key: key.map(String::from),
            bcrypt_cost: None,
            case_insensitive_usernames: false,
        }
    }

    #[test]
    fn test_session_key_accepts_long_secret() {
        let config = config_with_key(Some(&"x".repeat(64)));
        assert!(config.session_key().is_ok());
    }

    #[test]
    fn test_session_key_rejects_short_secret() {
        let config = config_with_key(Some("too-short"));
        let err = config.session_key().err().unwrap();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_session_key_generated_when_unset() {
        let config = config_with_key(None);
        assert!(config.session_key().is_ok());
    }
}
