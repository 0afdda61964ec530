//! User model for authentication.

use std::fmt;

/// An account principal: unique username plus encoded password hash.
///
/// # Example
/// ```
/// use stocksim_security::http::security::User;
///
/// let user = User::with_encoded_password("alice", "$2b$12$...".to_string());
/// assert_eq!(user.get_username(), "alice");
/// ```
#[derive(Clone, Debug)]
pub struct User {
    username: String,
    password: String,
}

impl User {
    /// Creates a new user. The password is stored as given; callers are
    /// expected to pass an already-encoded hash.
    pub fn new(username: String, password: String) -> Self {
        User { username, password }
    }

    /// Creates a new user with a pre-encoded password.
    ///
    /// # Example
    /// ```
    /// use stocksim_security::http::security::{
    ///     BcryptPasswordEncoder, PasswordEncoder, User,
    /// };
    ///
    /// let encoder = BcryptPasswordEncoder::with_cost(4);
    /// let user = User::with_encoded_password("alice", encoder.encode("secret"));
    /// assert!(encoder.matches("secret", user.get_password()));
    /// ```
    pub fn with_encoded_password(username: &str, encoded_password: String) -> Self {
        User {
            username: username.to_string(),
            password: encoded_password,
        }
    }

    /// Returns the username.
    pub fn get_username(&self) -> &str {
        &self.username
    }

    /// Returns the encoded password (for verification only).
    pub fn get_password(&self) -> &str {
        &self.password
    }
}

impl fmt::Display for User {
    // The hash stays out of Display output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "User {{ username: {} }}", self.username)
    }
}
