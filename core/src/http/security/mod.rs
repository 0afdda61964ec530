//! Security module providing authentication and authorization.
//!
//! # Module Structure
//!
//! - `access` - Ordered access rules (first match wins)
//! - `authorizer` - Rule-based request authorization (RuleAuthorizer)
//! - `config` - Core traits (Authenticator, Authorizer)
//! - `crypto` - Password encoding (BCrypt, NoOp)
//! - `csrf` - CSRF protection middleware
//! - `extractor` - Actix Web extractors (AuthenticatedUser, OptionalUser)
//! - `form_login` - Form-based login (redirect handling)
//! - `http_security` - Builder assembling the security filter chain
//! - `middleware` - Security middleware (SecurityTransform)
//! - `path_matcher` - Ant-style URL pattern matching
//! - `session` - Session-based authentication
//! - `user` - User model
//! - `user_details` - User lookup contract and authentication provider

// Re-exports for convenience
pub use access::{AccessPolicy, AccessRules};
pub use authorizer::RuleAuthorizer;
pub use config::{Authenticator, Authorizer};
pub use crypto::{BcryptPasswordEncoder, NoOpPasswordEncoder, PasswordEncoder};
pub use csrf::{CsrfConfig, CsrfProtection, CsrfToken};
pub use extractor::{AuthenticatedUser, OptionalUser};
pub use form_login::{FormLoginConfig, FormLoginHandler, LoginForm};
pub use http_security::{HttpSecurity, SecurityFilterChain};
pub use path_matcher::PathPattern;
pub use session::{
    SessionAuthenticator, SessionConfig, SessionError, SessionFixationStrategy, SessionUser,
};
pub use user::User;
pub use user_details::{
    AuthenticationError, DaoAuthenticationProvider, InMemoryUserRepository, RepositoryError,
    UserManager, UserRepository,
};

// Internal modules (private implementation details)
mod config;
mod extractor;
mod user;

// Public modules
pub mod access;
pub mod authorizer;
pub mod crypto;
pub mod csrf;
pub mod form_login;
pub mod http_security;
pub mod middleware;
pub mod path_matcher;
pub mod session;
pub mod user_details;
