//! Security middleware for Actix Web.
//!
//! The transform is the filter chain: it authenticates the request,
//! publishes the principal to request extensions, and hands the
//! authorization decision to the configured [`Authorizer`].

use std::rc::Rc;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, HttpMessage};
use futures_util::future::{ok, LocalBoxFuture, Ready};

use crate::http::security::config::{Authenticator, Authorizer};

/// Security middleware factory.
///
/// Built once at startup (usually through
/// [`crate::http::security::HttpSecurity`]) and cloned into each worker.
///
/// # Example
/// ```ignore
/// App::new().wrap(SecurityTransform::new(authenticator, authorizer))
/// ```
#[derive(Clone)]
pub struct SecurityTransform<Auth, Autho> {
    authenticator: Auth,
    authorizer: Autho,
}

impl<Auth, Autho> SecurityTransform<Auth, Autho> {
    /// Combine an authenticator and an authorizer into a middleware factory.
    pub fn new(authenticator: Auth, authorizer: Autho) -> Self {
        SecurityTransform {
            authenticator,
            authorizer,
        }
    }
}

impl<S, B, Auth, Autho> Transform<S, ServiceRequest> for SecurityTransform<Auth, Autho>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
    Auth: Authenticator + Clone + 'static,
    Autho: Authorizer<B> + Clone + 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = SecurityService<Auth, Autho, S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(SecurityService {
            authenticator: self.authenticator.clone(),
            authorizer: self.authorizer.clone(),
            service: Rc::new(service),
        })
    }
}

/// Security middleware service.
pub struct SecurityService<Auth, Autho, S> {
    authenticator: Auth,
    authorizer: Autho,
    service: Rc<S>,
}

impl<Auth, Autho, S, B> Service<ServiceRequest> for SecurityService<Auth, Autho, S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
    Auth: Authenticator,
    Autho: Authorizer<B>,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        // Step 1: Authenticate - extract user from request
        let user = self.authenticator.get_user(&req);

        // Step 2: Store user in request extensions (if authenticated)
        // This makes the user available to handlers via AuthenticatedUser
        if let Some(ref u) = user {
            req.extensions_mut().insert(u.clone());
        }

        // Step 3: Process authorization
        let next = move |req: ServiceRequest| -> LocalBoxFuture<
            'static,
            Result<ServiceResponse<B>, Error>,
        > {
            let fut = service.call(req);
            Box::pin(fut)
        };

        self.authorizer.process(req, user.as_ref(), next)
    }
}
