//! Form-based Login.
//!
//! Configures the login/logout endpoints and their redirect targets, and
//! produces the corresponding responses: establish the session principal
//! and redirect on success, redirect to the failure URL on bad
//! credentials, invalidate the session and redirect on logout.
//!
//! # Example
//! ```rust
//! use stocksim_security::http::security::FormLoginConfig;
//!
//! let config = FormLoginConfig::new()
//!     .login_page("/login")
//!     .login_processing_url("/login")
//!     .default_success_url("/dashboard")
//!     .always_use_default_success_url(true)
//!     .failure_url("/login?error=true")
//!     .logout_url("/perform_logout")
//!     .logout_success_url("/login?logout");
//! ```

use crate::http::security::session::{SessionAuthenticator, SessionConfig};
use crate::http::security::user::User;
use actix_web::http::header::LOCATION;
use actix_web::HttpResponse;
use serde::Deserialize;

// =============================================================================
// Form Login Configuration
// =============================================================================

/// Form login configuration.
#[derive(Clone)]
pub struct FormLoginConfig {
    /// URL of the login page (GET)
    login_page: String,
    /// URL that processes the login form (POST)
    login_processing_url: String,
    /// Form parameter name for username
    username_parameter: String,
    /// Form parameter name for password
    password_parameter: String,
    /// Default URL after successful login
    default_success_url: String,
    /// Always redirect to the default success URL (ignore saved request)
    always_use_default_success_url: bool,
    /// URL after failed login
    failure_url: String,
    /// URL for logout (POST)
    logout_url: String,
    /// URL after successful logout
    logout_success_url: String,
}

impl Default for FormLoginConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl FormLoginConfig {
    /// Create a new form login configuration with default values.
    pub fn new() -> Self {
        Self {
            login_page: "/login".to_string(),
            login_processing_url: "/login".to_string(),
            username_parameter: "username".to_string(),
            password_parameter: "password".to_string(),
            default_success_url: "/".to_string(),
            always_use_default_success_url: false,
            failure_url: "/login?error".to_string(),
            logout_url: "/logout".to_string(),
            logout_success_url: "/login?logout".to_string(),
        }
    }

    /// Set the login page URL (GET request).
    pub fn login_page(mut self, url: &str) -> Self {
        self.login_page = url.to_string();
        self
    }

    /// Set the login processing URL (POST request).
    pub fn login_processing_url(mut self, url: &str) -> Self {
        self.login_processing_url = url.to_string();
        self
    }

    /// Set the username parameter name.
    pub fn username_parameter(mut self, param: &str) -> Self {
        self.username_parameter = param.to_string();
        self
    }

    /// Set the password parameter name.
    pub fn password_parameter(mut self, param: &str) -> Self {
        self.password_parameter = param.to_string();
        self
    }

    /// Set the default success URL.
    pub fn default_success_url(mut self, url: &str) -> Self {
        self.default_success_url = url.to_string();
        self
    }

    /// Always redirect to the default success URL, ignoring any saved
    /// request.
    pub fn always_use_default_success_url(mut self, always: bool) -> Self {
        self.always_use_default_success_url = always;
        self
    }

    /// Set the failure URL.
    pub fn failure_url(mut self, url: &str) -> Self {
        self.failure_url = url.to_string();
        self
    }

    /// Set the logout URL (POST request).
    pub fn logout_url(mut self, url: &str) -> Self {
        self.logout_url = url.to_string();
        self
    }

    /// Set the logout success URL.
    pub fn logout_success_url(mut self, url: &str) -> Self {
        self.logout_success_url = url.to_string();
        self
    }

    // Getters

    /// Get the login page URL.
    pub fn get_login_page(&self) -> &str {
        &self.login_page
    }

    /// Get the login processing URL.
    pub fn get_login_processing_url(&self) -> &str {
        &self.login_processing_url
    }

    /// Get the username parameter name.
    pub fn get_username_parameter(&self) -> &str {
        &self.username_parameter
    }

    /// Get the password parameter name.
    pub fn get_password_parameter(&self) -> &str {
        &self.password_parameter
    }

    /// Get the default success URL.
    pub fn get_default_success_url(&self) -> &str {
        &self.default_success_url
    }

    /// Check if the default success URL is always used.
    pub fn is_always_use_default_success_url(&self) -> bool {
        self.always_use_default_success_url
    }

    /// Get the failure URL.
    pub fn get_failure_url(&self) -> &str {
        &self.failure_url
    }

    /// Get the logout URL.
    pub fn get_logout_url(&self) -> &str {
        &self.logout_url
    }

    /// Get the logout success URL.
    pub fn get_logout_success_url(&self) -> &str {
        &self.logout_success_url
    }
}

// =============================================================================
// Login Form Data
// =============================================================================

/// Login form data structure.
///
/// This is the expected form data for login requests.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    /// Username from form
    pub username: String,
    /// Password from form
    pub password: String,
}

// =============================================================================
// Form Login Handler
// =============================================================================

/// Produces the login/logout responses for the configured URLs.
///
/// # Example
/// ```rust,ignore
/// async fn login(
///     session: Session,
///     form: Form<LoginForm>,
///     state: Data<AppState>,
/// ) -> Result<HttpResponse, AuthError> {
///     match state.provider.authenticate(&form.username, &form.password).await {
///         Ok(user) => Ok(state.form_login.on_authentication_success(&session, &user)),
///         Err(_) => Ok(state.form_login.on_authentication_failure()),
///     }
/// }
/// ```
#[derive(Clone)]
pub struct FormLoginHandler {
    config: FormLoginConfig,
    session_config: SessionConfig,
}

impl FormLoginHandler {
    /// Create a new form login handler.
    pub fn new(config: FormLoginConfig, session_config: SessionConfig) -> Self {
        Self {
            config,
            session_config,
        }
    }

    /// Handle successful authentication.
    ///
    /// Stores the principal in the session (with fixation protection) and
    /// redirects to the saved request URL, unless the configuration forces
    /// the default success URL.
    pub fn on_authentication_success(
        &self,
        session: &actix_session::Session,
        user: &User,
    ) -> HttpResponse {
        if SessionAuthenticator::login(session, user, &self.session_config).is_err() {
            return self.on_authentication_failure();
        }

        let redirect_url = if self.config.always_use_default_success_url {
            self.config.default_success_url.clone()
        } else {
            SessionAuthenticator::get_saved_request(
                session,
                &self.session_config,
                &self.config.default_success_url,
            )
        };

        HttpResponse::Found()
            .insert_header((LOCATION, redirect_url))
            .finish()
    }

    /// Handle failed authentication.
    ///
    /// Redirects to the failure URL. The response is the same for every
    /// credential failure; the cause is not observable to the client.
    pub fn on_authentication_failure(&self) -> HttpResponse {
        HttpResponse::Found()
            .insert_header((LOCATION, self.config.failure_url.clone()))
            .finish()
    }

    /// Handle logout: invalidate the session and redirect to the logout
    /// success URL.
    pub fn on_logout(&self, session: &actix_session::Session) -> HttpResponse {
        SessionAuthenticator::logout(session, &self.session_config);

        HttpResponse::Found()
            .insert_header((LOCATION, self.config.logout_success_url.clone()))
            .finish()
    }

    /// Get the form login configuration.
    pub fn config(&self) -> &FormLoginConfig {
        &self.config
    }

    /// Get the session configuration.
    pub fn session_config(&self) -> &SessionConfig {
        &self.session_config
    }
}
