pub use auth_error::AuthError;

mod auth_error;
