//! Session-based authentication and access control for Actix Web.
//!
//! The crate provides the building blocks of a form-login authentication
//! gate: an ordered access-rule table, a security middleware combining an
//! [`http::security::Authenticator`] with an
//! [`http::security::Authorizer`], cookie-session principal storage,
//! password hashing, CSRF protection, and the user-lookup contract an
//! application implements against its own store.
//!
//! Everything is assembled once at startup through
//! [`http::security::HttpSecurity`] and shared for the lifetime of the
//! process.

pub mod http;
