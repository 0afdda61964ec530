//! Rule-based request authorization.
//!
//! Applies an ordered [`AccessRules`] table to each request: permitted
//! paths are forwarded for everyone, protected paths are forwarded only
//! for authenticated principals, and unauthenticated requests to a
//! protected path are redirected to the login entry point.

use actix_web::body::EitherBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::{http, Error, HttpResponse};
use actix_session::SessionExt;
use futures_util::future::LocalBoxFuture;
use std::sync::Arc;

use crate::http::security::access::{AccessPolicy, AccessRules};
use crate::http::security::config::Authorizer;
use crate::http::security::session::{SessionAuthenticator, SessionConfig};
use crate::http::security::user::User;

/// Authorizer evaluating an ordered access-rule table.
///
/// # Example
/// ```rust
/// use stocksim_security::http::security::{AccessPolicy, AccessRules, RuleAuthorizer};
///
/// let authorizer = RuleAuthorizer::new(
///     AccessRules::new()
///         .permit_all(&["/register", "/login", "/error"])
///         .any_request(AccessPolicy::Authenticated),
/// )
/// .login_url("/login");
/// ```
#[derive(Clone)]
pub struct RuleAuthorizer {
    rules: Arc<AccessRules>,
    login_url: String,
    /// When set, the original path of a redirected request is saved in
    /// the session so a later login can return to it.
    save_request: Option<SessionConfig>,
}

impl RuleAuthorizer {
    /// Creates a new authorizer over the given rules.
    pub fn new(rules: AccessRules) -> Self {
        RuleAuthorizer {
            rules: Arc::new(rules),
            login_url: "/login".to_string(),
            save_request: None,
        }
    }

    /// Sets the login URL unauthenticated requests are redirected to
    /// (default: "/login").
    pub fn login_url(mut self, url: &str) -> Self {
        self.login_url = url.to_string();
        self
    }

    /// Enables saving the original request path in the session before
    /// redirecting to login.
    pub fn save_request_in(mut self, config: SessionConfig) -> Self {
        self.save_request = Some(config);
        self
    }

    /// The access rules this authorizer evaluates.
    pub fn rules(&self) -> &AccessRules {
        &self.rules
    }

    /// The login URL unauthenticated requests are redirected to.
    pub fn get_login_url(&self) -> &str {
        &self.login_url
    }

    /// Whether redirected request paths are saved in the session.
    pub fn saves_requests(&self) -> bool {
        self.save_request.is_some()
    }
}

impl<B: 'static> Authorizer<B> for RuleAuthorizer {
    fn process(
        &self,
        req: ServiceRequest,
        user: Option<&User>,
        next: impl FnOnce(ServiceRequest) -> LocalBoxFuture<'static, Result<ServiceResponse<B>, Error>>
            + 'static,
    ) -> LocalBoxFuture<'static, Result<ServiceResponse<EitherBody<B>>, Error>> {
        let path = req.path().to_string();

        match self.rules.decide(&path) {
            AccessPolicy::PermitAll => Box::pin(async move {
                let res = next(req).await?;
                Ok(res.map_into_left_body())
            }),
            AccessPolicy::Authenticated => {
                if user.is_some() {
                    return Box::pin(async move {
                        let res = next(req).await?;
                        Ok(res.map_into_left_body())
                    });
                }

                if let Some(session_config) = &self.save_request {
                    let session = req.get_session();
                    let _ = SessionAuthenticator::save_request(&session, &path, session_config);
                }

                log::debug!("unauthenticated request to {}; redirecting to login", path);

                let redirect_url = self.login_url.clone();
                Box::pin(async move {
                    Ok(req.into_response(
                        HttpResponse::Found()
                            .append_header((http::header::LOCATION, redirect_url))
                            .finish()
                            .map_into_right_body(),
                    ))
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let authorizer = RuleAuthorizer::new(AccessRules::new());
        assert_eq!(authorizer.get_login_url(), "/login");
        assert!(!authorizer.saves_requests());
        assert!(authorizer.rules().is_empty());
    }

    #[test]
    fn test_builder_overrides() {
        let authorizer = RuleAuthorizer::new(AccessRules::new().permit_all(&["/login"]))
            .login_url("/signin")
            .save_request_in(SessionConfig::new());

        assert_eq!(authorizer.get_login_url(), "/signin");
        assert!(authorizer.saves_requests());
        assert_eq!(authorizer.rules().len(), 1);
    }
}
