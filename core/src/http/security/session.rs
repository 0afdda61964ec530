//! Session-based Authentication.
//!
//! After a successful login the principal is stored in the request
//! session; on every following request the [`SessionAuthenticator`]
//! reads it back out. Session state lives in whatever store the
//! application mounts via `actix-session`'s `SessionMiddleware`
//! (a signed cookie store in the shipped application).
//!
//! # Example
//! ```rust,ignore
//! let config = SessionConfig::new()
//!     .fixation_strategy(SessionFixationStrategy::MigrateSession);
//!
//! // In a login handler, once credentials are verified:
//! SessionAuthenticator::login(&session, &user, &config)?;
//! ```

use crate::http::security::config::Authenticator;
use crate::http::security::user::User;
use actix_session::SessionExt;
use actix_web::dev::ServiceRequest;
use serde::{Deserialize, Serialize};

// =============================================================================
// Session Fixation Strategy
// =============================================================================

/// Strategy for session fixation protection.
///
/// Session fixation attacks occur when an attacker sets a user's session ID
/// before they authenticate. After authentication, the attacker can hijack
/// the session using the known session ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionFixationStrategy {
    /// Create a new session ID and keep the session attributes.
    #[default]
    MigrateSession,

    /// Start from a completely fresh session after login.
    NewSession,

    /// No session fixation protection.
    /// **WARNING**: This is insecure and should only be used for testing.
    None,
}

// =============================================================================
// Session User Data
// =============================================================================

/// Serializable principal stored in the session.
///
/// Separate from [`User`] so that only the username crosses into the
/// session store; the password hash never does.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUser {
    /// Username
    pub username: String,
}

impl SessionUser {
    /// Create from a User.
    pub fn from_user(user: &User) -> Self {
        Self {
            username: user.get_username().to_string(),
        }
    }

    /// Convert back to a User. The password field stays empty.
    pub fn to_user(&self) -> User {
        User::new(self.username.clone(), String::new())
    }
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self::from_user(user)
    }
}

impl From<SessionUser> for User {
    fn from(session_user: SessionUser) -> Self {
        session_user.to_user()
    }
}

// =============================================================================
// Session Configuration
// =============================================================================

/// Session authentication configuration.
///
/// # Example
/// ```rust
/// use stocksim_security::http::security::{SessionConfig, SessionFixationStrategy};
///
/// let config = SessionConfig::new()
///     .user_key("user")
///     .fixation_strategy(SessionFixationStrategy::MigrateSession);
/// ```
#[derive(Clone)]
pub struct SessionConfig {
    /// Session key for storing user data
    user_key: String,
    /// Session key for authentication flag
    authenticated_key: String,
    /// Session key for storing the original request URL (for redirect after login)
    saved_request_key: String,
    /// Session fixation protection strategy
    fixation_strategy: SessionFixationStrategy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionConfig {
    /// Create a new session configuration with default keys.
    pub fn new() -> Self {
        Self {
            user_key: "security_user".to_string(),
            authenticated_key: "security_authenticated".to_string(),
            saved_request_key: "security_saved_request".to_string(),
            fixation_strategy: SessionFixationStrategy::MigrateSession,
        }
    }

    /// Set the session key for user data.
    pub fn user_key(mut self, key: &str) -> Self {
        self.user_key = key.to_string();
        self
    }

    /// Set the session key for the authentication flag.
    pub fn authenticated_key(mut self, key: &str) -> Self {
        self.authenticated_key = key.to_string();
        self
    }

    /// Set the session key for the saved request URL.
    pub fn saved_request_key(mut self, key: &str) -> Self {
        self.saved_request_key = key.to_string();
        self
    }

    /// Set the session fixation protection strategy.
    pub fn fixation_strategy(mut self, strategy: SessionFixationStrategy) -> Self {
        self.fixation_strategy = strategy;
        self
    }

    /// Get the user key.
    pub fn get_user_key(&self) -> &str {
        &self.user_key
    }

    /// Get the authenticated key.
    pub fn get_authenticated_key(&self) -> &str {
        &self.authenticated_key
    }

    /// Get the saved request key.
    pub fn get_saved_request_key(&self) -> &str {
        &self.saved_request_key
    }

    /// Get the fixation strategy.
    pub fn get_fixation_strategy(&self) -> SessionFixationStrategy {
        self.fixation_strategy
    }
}

// =============================================================================
// Session Authenticator
// =============================================================================

/// Session-based authenticator.
///
/// Reads the principal from the request session. Requires the
/// application to mount `SessionMiddleware` outside the security
/// transform.
#[derive(Clone)]
pub struct SessionAuthenticator {
    config: SessionConfig,
}

impl SessionAuthenticator {
    /// Create a new session authenticator.
    pub fn new(config: SessionConfig) -> Self {
        Self { config }
    }

    /// Create with default configuration.
    pub fn default_config() -> Self {
        Self::new(SessionConfig::default())
    }

    /// Store user in session (login) with session fixation protection.
    ///
    /// This method:
    /// 1. Applies session fixation protection based on configuration
    /// 2. Stores user data in the session
    /// 3. Sets the authenticated flag
    pub fn login(
        session: &actix_session::Session,
        user: &User,
        config: &SessionConfig,
    ) -> Result<(), SessionError> {
        Self::apply_fixation_protection(session, config);

        let session_user = SessionUser::from_user(user);

        session
            .insert(&config.user_key, &session_user)
            .map_err(|e| SessionError::InsertError(e.to_string()))?;

        session
            .insert(&config.authenticated_key, true)
            .map_err(|e| SessionError::InsertError(e.to_string()))?;

        Ok(())
    }

    /// Apply session fixation protection based on configuration.
    fn apply_fixation_protection(session: &actix_session::Session, config: &SessionConfig) {
        match config.fixation_strategy {
            SessionFixationStrategy::MigrateSession => {
                // Regenerate the session ID but keep data
                session.renew();
            }
            SessionFixationStrategy::NewSession => {
                // Clear all session data and regenerate
                session.purge();
            }
            SessionFixationStrategy::None => {}
        }
    }

    /// Remove the principal from the session (logout).
    ///
    /// The whole session is invalidated, not just the security keys, so
    /// nothing established during the authenticated session survives.
    pub fn logout(session: &actix_session::Session, config: &SessionConfig) {
        session.remove(&config.user_key);
        session.remove(&config.authenticated_key);
        session.remove(&config.saved_request_key);
        session.purge();
    }

    /// Check if session is authenticated.
    pub fn is_authenticated(session: &actix_session::Session, config: &SessionConfig) -> bool {
        session
            .get::<bool>(&config.authenticated_key)
            .ok()
            .flatten()
            .unwrap_or(false)
    }

    /// Get user from session.
    pub fn get_session_user(
        session: &actix_session::Session,
        config: &SessionConfig,
    ) -> Option<User> {
        session
            .get::<SessionUser>(&config.user_key)
            .ok()
            .flatten()
            .map(|su| su.to_user())
    }

    /// Save the current request URL for redirect after login.
    pub fn save_request(
        session: &actix_session::Session,
        url: &str,
        config: &SessionConfig,
    ) -> Result<(), SessionError> {
        session
            .insert(&config.saved_request_key, url)
            .map_err(|e| SessionError::InsertError(e.to_string()))
    }

    /// Get the saved request URL and remove it from the session.
    ///
    /// Returns the saved URL or the default URL if none was saved.
    pub fn get_saved_request(
        session: &actix_session::Session,
        config: &SessionConfig,
        default_url: &str,
    ) -> String {
        let saved = session
            .get::<String>(&config.saved_request_key)
            .ok()
            .flatten();

        if saved.is_some() {
            session.remove(&config.saved_request_key);
        }

        saved.unwrap_or_else(|| default_url.to_string())
    }

    /// Get the configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}

impl Authenticator for SessionAuthenticator {
    fn get_user(&self, req: &ServiceRequest) -> Option<User> {
        let session = req.get_session();

        if !Self::is_authenticated(&session, &self.config) {
            return None;
        }

        Self::get_session_user(&session, &self.config)
    }
}

// =============================================================================
// Session Error
// =============================================================================

/// Session-related errors.
#[derive(Debug)]
pub enum SessionError {
    /// Error inserting data into session
    InsertError(String),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::InsertError(e) => write!(f, "session insert error: {}", e),
        }
    }
}

impl std::error::Error for SessionError {}
