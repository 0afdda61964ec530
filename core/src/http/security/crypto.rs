//! Password encoding utilities.
//!
//! One salted, adaptive, one-way scheme (bcrypt). Verification recomputes
//! and compares; there is no decryption path.

/// Trait for encoding and verifying passwords.
///
/// # Example
/// ```
/// use stocksim_security::http::security::{BcryptPasswordEncoder, PasswordEncoder};
///
/// let encoder = BcryptPasswordEncoder::with_cost(4);
/// let hash = encoder.encode("my_password");
/// assert!(encoder.matches("my_password", &hash));
/// ```
pub trait PasswordEncoder: Send + Sync {
    /// Encode the raw password.
    fn encode(&self, raw_password: &str) -> String;

    /// Verify a raw password against an encoded password.
    fn matches(&self, raw_password: &str, encoded_password: &str) -> bool;
}

/// BCrypt password encoder.
///
/// Each call to [`PasswordEncoder::encode`] generates a fresh salt, so
/// the same password never produces the same hash twice.
#[derive(Clone)]
pub struct BcryptPasswordEncoder {
    cost: u32,
}

impl BcryptPasswordEncoder {
    /// Creates a new encoder with the bcrypt crate's default cost.
    pub fn new() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }

    /// Creates a new encoder with a custom cost.
    ///
    /// Cost is clamped to bcrypt's valid range (4 to 31). Higher values
    /// are more secure but slower.
    pub fn with_cost(cost: u32) -> Self {
        Self {
            cost: cost.clamp(4, 31),
        }
    }

    /// The configured cost factor.
    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for BcryptPasswordEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordEncoder for BcryptPasswordEncoder {
    fn encode(&self, raw_password: &str) -> String {
        // The cost is clamped at construction, the only input bcrypt rejects.
        bcrypt::hash(raw_password, self.cost).expect("failed to hash password with bcrypt")
    }

    fn matches(&self, raw_password: &str, encoded_password: &str) -> bool {
        bcrypt::verify(raw_password, encoded_password).unwrap_or(false)
    }
}

/// No-op password encoder that stores passwords in plain text.
///
/// # Warning
/// **NEVER use this in production!** This is only for testing.
#[derive(Clone, Copy, Default)]
pub struct NoOpPasswordEncoder;

impl PasswordEncoder for NoOpPasswordEncoder {
    fn encode(&self, raw_password: &str) -> String {
        raw_password.to_string()
    }

    fn matches(&self, raw_password: &str, encoded_password: &str) -> bool {
        raw_password == encoded_password
    }
}
