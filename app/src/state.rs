//! Process-lifetime application state.

use std::sync::Arc;

use stocksim_security::http::security::{
    BcryptPasswordEncoder, DaoAuthenticationProvider, FormLoginHandler, SecurityFilterChain,
    UserManager,
};

/// Shared state handed to every handler, assembled once at startup.
pub struct AppState {
    /// Credential verification: user store bound to the password encoder
    pub provider: DaoAuthenticationProvider<dyn UserManager, BcryptPasswordEncoder>,
    /// The user store itself (registration writes through this)
    pub users: Arc<dyn UserManager>,
    /// Password encoder used when registering new accounts
    pub encoder: BcryptPasswordEncoder,
    /// Login/logout response handling
    pub form_login: FormLoginHandler,
}

impl AppState {
    /// Wire the state from its parts. The provider shares the store and
    /// encoder used for registration, so a freshly registered credential
    /// verifies against the same hash parameters.
    pub fn new(
        users: Arc<dyn UserManager>,
        encoder: BcryptPasswordEncoder,
        chain: &SecurityFilterChain,
    ) -> Self {
        let provider =
            DaoAuthenticationProvider::new(Arc::clone(&users), Arc::new(encoder.clone()));

        Self {
            provider,
            users,
            encoder,
            form_login: chain.form_login().clone(),
        }
    }
}
