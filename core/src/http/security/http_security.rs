//! Builder assembling the security filter chain.
//!
//! One place to declare the whole gate: access rules, form login,
//! session handling and CSRF. [`HttpSecurity::build`] produces the
//! [`SecurityFilterChain`] the application wraps its server with —
//! constructed once at startup, cloned into workers.
//!
//! # Example
//! ```rust
//! use stocksim_security::http::security::{
//!     AccessPolicy, AccessRules, CsrfConfig, FormLoginConfig, HttpSecurity, SessionConfig,
//! };
//!
//! let chain = HttpSecurity::new()
//!     .authorize_requests(
//!         AccessRules::new()
//!             .permit_all(&["/register", "/login", "/error"])
//!             .any_request(AccessPolicy::Authenticated),
//!     )
//!     .form_login(
//!         FormLoginConfig::new()
//!             .login_page("/login")
//!             .login_processing_url("/login")
//!             .default_success_url("/dashboard")
//!             .always_use_default_success_url(true)
//!             .failure_url("/login?error=true")
//!             .logout_url("/perform_logout")
//!             .logout_success_url("/login?logout"),
//!     )
//!     .session_management(SessionConfig::new())
//!     .csrf(CsrfConfig::disabled())
//!     .build();
//! ```

use crate::http::security::access::AccessRules;
use crate::http::security::authorizer::RuleAuthorizer;
use crate::http::security::csrf::{CsrfConfig, CsrfProtection};
use crate::http::security::form_login::{FormLoginConfig, FormLoginHandler};
use crate::http::security::middleware::SecurityTransform;
use crate::http::security::session::{SessionAuthenticator, SessionConfig};

/// Builder for a [`SecurityFilterChain`].
pub struct HttpSecurity {
    rules: AccessRules,
    form_login: FormLoginConfig,
    session: SessionConfig,
    csrf: CsrfConfig,
}

impl Default for HttpSecurity {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpSecurity {
    /// Start a new configuration with defaults: every request requires
    /// authentication, default form-login URLs, CSRF enabled.
    pub fn new() -> Self {
        Self {
            rules: AccessRules::new(),
            form_login: FormLoginConfig::new(),
            session: SessionConfig::new(),
            csrf: CsrfConfig::new(),
        }
    }

    /// Set the access rules.
    pub fn authorize_requests(mut self, rules: AccessRules) -> Self {
        self.rules = rules;
        self
    }

    /// Set the form-login configuration (login and logout URLs).
    pub fn form_login(mut self, config: FormLoginConfig) -> Self {
        self.form_login = config;
        self
    }

    /// Set the session configuration.
    pub fn session_management(mut self, config: SessionConfig) -> Self {
        self.session = config;
        self
    }

    /// Set the CSRF configuration.
    pub fn csrf(mut self, config: CsrfConfig) -> Self {
        self.csrf = config;
        self
    }

    /// Assemble the filter chain.
    pub fn build(self) -> SecurityFilterChain {
        if !self.csrf.is_enabled() {
            log::warn!(
                "CSRF protection is disabled; state-changing requests are not origin-checked"
            );
        }

        let authenticator = SessionAuthenticator::new(self.session.clone());

        let mut authorizer =
            RuleAuthorizer::new(self.rules).login_url(self.form_login.get_login_page());
        // A forced success target makes saved requests dead weight; only
        // record them when they can be consumed.
        if !self.form_login.is_always_use_default_success_url() {
            authorizer = authorizer.save_request_in(self.session.clone());
        }

        let form_login = FormLoginHandler::new(self.form_login, self.session.clone());

        SecurityFilterChain {
            authenticator,
            authorizer,
            form_login,
            session: self.session,
            csrf: CsrfProtection::new(self.csrf),
        }
    }
}

/// The assembled security components of the application.
///
/// Process-lifetime singleton: build it once in `main`, hand clones to
/// the server factory and the handlers.
#[derive(Clone)]
pub struct SecurityFilterChain {
    authenticator: SessionAuthenticator,
    authorizer: RuleAuthorizer,
    form_login: FormLoginHandler,
    session: SessionConfig,
    csrf: CsrfProtection,
}

impl SecurityFilterChain {
    /// The security middleware to wrap the application with.
    pub fn transform(&self) -> SecurityTransform<SessionAuthenticator, RuleAuthorizer> {
        SecurityTransform::new(self.authenticator.clone(), self.authorizer.clone())
    }

    /// The CSRF middleware to wrap the application with.
    pub fn csrf(&self) -> CsrfProtection {
        self.csrf.clone()
    }

    /// The form-login handler for the login/logout routes.
    pub fn form_login(&self) -> &FormLoginHandler {
        &self.form_login
    }

    /// The session configuration the chain was built with.
    pub fn session_config(&self) -> &SessionConfig {
        &self.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::security::access::AccessPolicy;

    #[test]
    fn test_build_wires_login_url_from_form_login() {
        let chain = HttpSecurity::new()
            .authorize_requests(
                AccessRules::new()
                    .permit_all(&["/signin"])
                    .any_request(AccessPolicy::Authenticated),
            )
            .form_login(FormLoginConfig::new().login_page("/signin"))
            .build();

        assert_eq!(chain.form_login().config().get_login_page(), "/signin");
        assert_eq!(chain.authorizer.get_login_url(), "/signin");
    }

    #[test]
    fn test_build_with_csrf_disabled() {
        let chain = HttpSecurity::new().csrf(CsrfConfig::disabled()).build();
        assert!(!chain.csrf().config().is_enabled());
    }

    #[test]
    fn test_forced_success_url_skips_saved_requests() {
        let forced = HttpSecurity::new()
            .form_login(FormLoginConfig::new().always_use_default_success_url(true))
            .build();
        assert!(!forced.authorizer.saves_requests());

        let unforced = HttpSecurity::new().build();
        assert!(unforced.authorizer.saves_requests());
    }
}
