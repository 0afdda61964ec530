//! Extractors for accessing the authenticated principal in handlers.

use std::future::{ready, Ready};
use std::ops::Deref;

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};

use crate::http::error::AuthError;
use crate::http::security::user::User;

/// Extractor for the authenticated user.
///
/// # Usage
/// ```ignore
/// async fn handler(user: AuthenticatedUser) -> impl Responder {
///     format!("Hello, {}!", user.get_username())
/// }
/// ```
///
/// # Errors
/// Returns `401 Unauthorized` if the user is not authenticated.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(User);

impl AuthenticatedUser {
    /// Creates a new AuthenticatedUser wrapper.
    pub fn new(user: User) -> Self {
        AuthenticatedUser(user)
    }

    /// Returns the inner User.
    pub fn into_inner(self) -> User {
        self.0
    }
}

impl Deref for AuthenticatedUser {
    type Target = User;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = AuthError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<User>().cloned() {
            Some(user) => ready(Ok(AuthenticatedUser(user))),
            None => ready(Err(AuthError::Unauthorized)),
        }
    }
}

/// Optional extractor for the authenticated user.
///
/// Returns `None` if not authenticated instead of an error.
#[derive(Debug, Clone)]
pub struct OptionalUser(Option<User>);

impl OptionalUser {
    /// Returns the inner Option<User>.
    pub fn into_inner(self) -> Option<User> {
        self.0
    }

    /// Returns true if a user is present.
    pub fn is_authenticated(&self) -> bool {
        self.0.is_some()
    }
}

impl Deref for OptionalUser {
    type Target = Option<User>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for OptionalUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let user = req.extensions().get::<User>().cloned();
        ready(Ok(OptionalUser(user)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_authenticated_user_absent() {
        let req = TestRequest::default().to_http_request();
        let mut payload = Payload::None;

        let result = AuthenticatedUser::from_request(&req, &mut payload).await;
        assert!(matches!(result, Err(AuthError::Unauthorized)));
    }

    #[actix_web::test]
    async fn test_authenticated_user_present() {
        let req = TestRequest::default().to_http_request();
        req.extensions_mut()
            .insert(User::with_encoded_password("alice", "hash".to_string()));
        let mut payload = Payload::None;

        let user = AuthenticatedUser::from_request(&req, &mut payload)
            .await
            .unwrap();
        assert_eq!(user.get_username(), "alice");
    }

    #[actix_web::test]
    async fn test_optional_user() {
        let req = TestRequest::default().to_http_request();
        let mut payload = Payload::None;

        let user = OptionalUser::from_request(&req, &mut payload).await.unwrap();
        assert!(!user.is_authenticated());

        req.extensions_mut()
            .insert(User::with_encoded_password("alice", "hash".to_string()));
        let user = OptionalUser::from_request(&req, &mut payload).await.unwrap();
        assert!(user.is_authenticated());
        assert_eq!(user.into_inner().unwrap().get_username(), "alice");
    }
}
