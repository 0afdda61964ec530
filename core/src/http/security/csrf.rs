//! CSRF (Cross-Site Request Forgery) Protection.
//!
//! Token-per-session protection for state-changing requests. Safe
//! methods get a token generated and stored in the session (and exposed
//! in request extensions for templates); protected methods must echo the
//! token back in the `X-CSRF-TOKEN` header or the `_csrf` query
//! parameter, or the request is rejected with `403 Forbidden`.
//!
//! Disabling the protection is an explicit configuration choice
//! ([`CsrfConfig::disabled`]); a disabled middleware passes every request
//! through untouched.

use actix_session::SessionExt;
use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::error::ResponseError;
use actix_web::http::Method;
use actix_web::{Error, HttpMessage};
use futures_util::future::{ok, LocalBoxFuture, Ready};
use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};
use std::rc::Rc;

use crate::http::error::AuthError;
use crate::http::security::path_matcher::PathPattern;

const TOKEN_LENGTH: usize = 32;

// =============================================================================
// CSRF Token
// =============================================================================

/// CSRF token exposed to handlers via request extensions.
#[derive(Debug, Clone)]
pub struct CsrfToken {
    token: String,
    header_name: String,
    parameter_name: String,
}

impl CsrfToken {
    /// Get the token value.
    pub fn value(&self) -> &str {
        &self.token
    }

    /// Get the header name the token is accepted in.
    pub fn header_name(&self) -> &str {
        &self.header_name
    }

    /// Get the parameter name the token is accepted in.
    pub fn parameter_name(&self) -> &str {
        &self.parameter_name
    }
}

// =============================================================================
// CSRF Configuration
// =============================================================================

/// CSRF protection configuration.
///
/// By default:
/// - protection is enabled
/// - POST, PUT, DELETE and PATCH require a token
/// - token header: `X-CSRF-TOKEN`, token parameter: `_csrf`
#[derive(Clone)]
pub struct CsrfConfig {
    enabled: bool,
    protected_methods: Vec<Method>,
    ignored_paths: Vec<PathPattern>,
    header_name: String,
    parameter_name: String,
    session_key: String,
}

impl Default for CsrfConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl CsrfConfig {
    /// Create a new configuration with protection enabled.
    pub fn new() -> Self {
        Self {
            enabled: true,
            protected_methods: vec![Method::POST, Method::PUT, Method::DELETE, Method::PATCH],
            ignored_paths: Vec::new(),
            header_name: "X-CSRF-TOKEN".to_string(),
            parameter_name: "_csrf".to_string(),
            session_key: "CSRF_TOKEN".to_string(),
        }
    }

    /// Create a configuration with protection switched off.
    ///
    /// Every request passes through unchecked. Deliberately weakening;
    /// the filter-chain builder logs a warning when it sees this.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new()
        }
    }

    /// Set the methods that require a token.
    pub fn protected_methods(mut self, methods: Vec<Method>) -> Self {
        self.protected_methods = methods;
        self
    }

    /// Add a path pattern exempt from validation.
    pub fn ignore_path(mut self, pattern: &str) -> Self {
        self.ignored_paths.push(PathPattern::new(pattern));
        self
    }

    /// Set the header name for the token.
    pub fn header_name(mut self, name: &str) -> Self {
        self.header_name = name.to_string();
        self
    }

    /// Set the parameter name for the token.
    pub fn parameter_name(mut self, name: &str) -> Self {
        self.parameter_name = name.to_string();
        self
    }

    /// Set the session key the token is stored under.
    pub fn session_key(mut self, key: &str) -> Self {
        self.session_key = key.to_string();
        self
    }

    /// Whether protection is enabled.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Check if a path is exempt from validation.
    fn is_path_ignored(&self, path: &str) -> bool {
        self.ignored_paths.iter().any(|p| p.matches(path))
    }

    /// Check if a method requires a token.
    fn requires_protection(&self, method: &Method) -> bool {
        self.protected_methods.contains(method)
    }

    fn generate_token(&self) -> CsrfToken {
        let token: String = thread_rng()
            .sample_iter(&Alphanumeric)
            .take(TOKEN_LENGTH)
            .map(char::from)
            .collect();

        CsrfToken {
            token,
            header_name: self.header_name.clone(),
            parameter_name: self.parameter_name.clone(),
        }
    }
}

// =============================================================================
// CSRF Protection Middleware
// =============================================================================

/// CSRF protection middleware.
///
/// # Behavior
/// 1. For safe methods (GET, HEAD, ...): generate and store a session token
/// 2. For protected methods: validate the submitted token
/// 3. The token is available in request extensions as [`CsrfToken`]
#[derive(Clone)]
pub struct CsrfProtection {
    config: CsrfConfig,
}

impl CsrfProtection {
    /// Create new CSRF protection with the given configuration.
    pub fn new(config: CsrfConfig) -> Self {
        Self { config }
    }

    /// The configuration this middleware applies.
    pub fn config(&self) -> &CsrfConfig {
        &self.config
    }
}

impl<S, B> Transform<S, ServiceRequest> for CsrfProtection
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = CsrfMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(CsrfMiddleware {
            service: Rc::new(service),
            config: self.config.clone(),
        })
    }
}

/// CSRF middleware service.
pub struct CsrfMiddleware<S> {
    service: Rc<S>,
    config: CsrfConfig,
}

impl<S, B> Service<ServiceRequest> for CsrfMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let config = self.config.clone();

        Box::pin(async move {
            let path = req.path().to_string();
            let method = req.method().clone();

            if !config.enabled || config.is_path_ignored(&path) {
                let res = service.call(req).await?;
                return Ok(res.map_into_left_body());
            }

            let session = req.get_session();

            // Load or generate the session token
            let token = match session.get::<String>(&config.session_key).ok().flatten() {
                Some(value) => CsrfToken {
                    token: value,
                    header_name: config.header_name.clone(),
                    parameter_name: config.parameter_name.clone(),
                },
                None => {
                    let token = config.generate_token();
                    let _ = session.insert(&config.session_key, token.value());
                    token
                }
            };

            // Make the token available to handlers (form rendering)
            req.extensions_mut().insert(token.clone());

            if config.requires_protection(&method) {
                match token_from_request(&req, &config) {
                    Some(submitted) if submitted == token.token => {
                        let res = service.call(req).await?;
                        Ok(res.map_into_left_body())
                    }
                    _ => {
                        log::debug!("rejecting {} {}: missing or stale token", method, path);
                        let response = AuthError::Forbidden.error_response().map_into_right_body();
                        Ok(req.into_response(response))
                    }
                }
            } else {
                let res = service.call(req).await?;
                Ok(res.map_into_left_body())
            }
        })
    }
}

/// Extract the submitted token from the request (header, then query
/// parameter).
fn token_from_request(req: &ServiceRequest, config: &CsrfConfig) -> Option<String> {
    if let Some(header_value) = req.headers().get(&config.header_name) {
        if let Ok(token) = header_value.to_str() {
            return Some(token.to_string());
        }
    }

    let param_prefix = format!("{}=", config.parameter_name);
    for pair in req.query_string().split('&') {
        if let Some(value) = pair.strip_prefix(&param_prefix) {
            return Some(value.to_string());
        }
    }

    None
}
