//! Security configuration for the application.
//!
//! Public paths: `/register`, `/login`, `/error`. Everything else
//! requires an authenticated session and redirects to `/login` without
//! one. Login posts to `/login` and always lands on `/dashboard`;
//! failures land on `/login?error=true`. Logout posts to
//! `/perform_logout` and lands on `/login?logout`.

use stocksim_security::http::security::{
    AccessPolicy, AccessRules, CsrfConfig, FormLoginConfig, HttpSecurity, SecurityFilterChain,
    SessionConfig, SessionFixationStrategy,
};

/// Assemble the security filter chain. Called once at startup.
pub fn security_filter_chain() -> SecurityFilterChain {
    HttpSecurity::new()
        .authorize_requests(
            AccessRules::new()
                .permit_all(&["/register", "/login", "/error"])
                .any_request(AccessPolicy::Authenticated),
        )
        .form_login(
            FormLoginConfig::new()
                .login_page("/login")
                .login_processing_url("/login")
                .default_success_url("/dashboard")
                // Always land on the dashboard, even when a protected page
                // triggered the login.
                .always_use_default_success_url(true)
                .failure_url("/login?error=true")
                .logout_url("/perform_logout")
                .logout_success_url("/login?logout"),
        )
        .session_management(
            SessionConfig::new().fixation_strategy(SessionFixationStrategy::MigrateSession),
        )
        // Intentionally off for the plain form flow; build() logs the
        // weakening at startup.
        .csrf(CsrfConfig::disabled())
        .build()
}
