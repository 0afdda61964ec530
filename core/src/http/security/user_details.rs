//! User lookup contract and the authentication provider built on it.
//!
//! The [`UserRepository`] trait is the seam between the security layer
//! and whatever store holds the accounts: one read-only operation,
//! `find_by_username`, where absence is a valid outcome and storage
//! faults are surfaced, never swallowed. [`DaoAuthenticationProvider`]
//! binds a repository to a [`PasswordEncoder`] and turns the pair into a
//! credential check.
//!
//! # Example
//! ```rust,ignore
//! struct PgUserRepository {
//!     pool: PgPool,
//! }
//!
//! #[async_trait]
//! impl UserRepository for PgUserRepository {
//!     async fn find_by_username(
//!         &self,
//!         username: &str,
//!     ) -> Result<Option<User>, RepositoryError> {
//!         let row = sqlx::query!("SELECT * FROM users WHERE username = $1", username)
//!             .fetch_optional(&self.pool)
//!             .await
//!             .map_err(|e| RepositoryError::Storage(e.to_string()))?;
//!         Ok(row.map(|r| User::with_encoded_password(&r.username, r.password)))
//!     }
//! }
//! ```

use crate::http::security::crypto::PasswordEncoder;
use crate::http::security::user::User;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

// =============================================================================
// Repository Error
// =============================================================================

/// Errors from the user store.
#[derive(Debug)]
pub enum RepositoryError {
    /// A user with this username already exists
    DuplicateUsername,
    /// Storage fault (connection, query, corruption)
    Storage(String),
}

impl std::fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepositoryError::DuplicateUsername => write!(f, "username already taken"),
            RepositoryError::Storage(e) => write!(f, "storage error: {}", e),
        }
    }
}

impl std::error::Error for RepositoryError {}

// =============================================================================
// Authentication Error
// =============================================================================

/// Outcome of a failed authentication attempt.
///
/// `UserNotFound` and `BadCredentials` are distinct here but must be
/// surfaced identically to HTTP clients; only `Storage` may produce a
/// different observable outcome (a server error).
#[derive(Debug)]
pub enum AuthenticationError {
    /// No user with the given username
    UserNotFound,
    /// Password did not match the stored hash
    BadCredentials,
    /// Lookup failed before credentials could be checked
    Storage(RepositoryError),
}

impl AuthenticationError {
    /// True for the failures a client must not be able to tell apart.
    pub fn is_credential_failure(&self) -> bool {
        matches!(
            self,
            AuthenticationError::UserNotFound | AuthenticationError::BadCredentials
        )
    }
}

impl std::fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthenticationError::UserNotFound => write!(f, "user not found"),
            AuthenticationError::BadCredentials => write!(f, "bad credentials"),
            AuthenticationError::Storage(e) => write!(f, "lookup failed: {}", e),
        }
    }
}

impl std::error::Error for AuthenticationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AuthenticationError::Storage(e) => Some(e),
            _ => None,
        }
    }
}

// =============================================================================
// User Repository Traits
// =============================================================================

/// Async trait for loading users from any data source.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by username.
    ///
    /// Returns `Ok(Some(user))` if found, `Ok(None)` if no user has this
    /// username, or `Err(...)` on a storage fault. Read-only; no side
    /// effects.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError>;

    /// Check if a user exists.
    async fn user_exists(&self, username: &str) -> Result<bool, RepositoryError> {
        Ok(self.find_by_username(username).await?.is_some())
    }
}

/// Extended trait for stores that can also register users.
#[async_trait]
pub trait UserManager: UserRepository {
    /// Create a new user.
    ///
    /// Fails with [`RepositoryError::DuplicateUsername`] if the username
    /// is taken under the store's equality rules.
    async fn create_user(&self, user: &User) -> Result<(), RepositoryError>;
}

// =============================================================================
// In-Memory User Repository
// =============================================================================

/// In-memory implementation of [`UserRepository`] and [`UserManager`].
///
/// Username equality is an explicit choice: case-sensitive by default,
/// case-insensitive via [`InMemoryUserRepository::case_insensitive`].
/// With case-insensitive lookup the stored username keeps its original
/// spelling; only the lookup key folds case.
#[derive(Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<String, User>>>,
    case_insensitive: bool,
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryUserRepository {
    /// Create a new, empty, case-sensitive store.
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
            case_insensitive: false,
        }
    }

    /// Switch the store to case-insensitive username lookup.
    pub fn case_insensitive(mut self) -> Self {
        self.case_insensitive = true;
        self
    }

    fn lookup_key(&self, username: &str) -> String {
        if self.case_insensitive {
            username.to_lowercase()
        } else {
            username.to_string()
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        let users = self.users.read().await;
        Ok(users.get(&self.lookup_key(username)).cloned())
    }
}

#[async_trait]
impl UserManager for InMemoryUserRepository {
    async fn create_user(&self, user: &User) -> Result<(), RepositoryError> {
        use std::collections::hash_map::Entry;

        let mut users = self.users.write().await;
        match users.entry(self.lookup_key(user.get_username())) {
            Entry::Occupied(_) => Err(RepositoryError::DuplicateUsername),
            Entry::Vacant(e) => {
                e.insert(user.clone());
                Ok(())
            }
        }
    }
}

// =============================================================================
// Authentication Provider
// =============================================================================

/// Binds exactly one user-lookup capability to exactly one password
/// encoder; both are required at construction and the provider lives for
/// the whole process.
///
/// # Example
/// ```rust,ignore
/// let provider = DaoAuthenticationProvider::new(
///     Arc::new(repository),
///     Arc::new(BcryptPasswordEncoder::new()),
/// );
///
/// let user = provider.authenticate("alice", "secret").await?;
/// ```
pub struct DaoAuthenticationProvider<R, E>
where
    R: UserRepository + ?Sized,
    E: PasswordEncoder + ?Sized,
{
    repository: Arc<R>,
    encoder: Arc<E>,
}

impl<R, E> Clone for DaoAuthenticationProvider<R, E>
where
    R: UserRepository + ?Sized,
    E: PasswordEncoder + ?Sized,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            encoder: Arc::clone(&self.encoder),
        }
    }
}

impl<R, E> DaoAuthenticationProvider<R, E>
where
    R: UserRepository + ?Sized,
    E: PasswordEncoder + ?Sized,
{
    /// Create a new provider from a repository and an encoder.
    pub fn new(repository: Arc<R>, encoder: Arc<E>) -> Self {
        Self {
            repository,
            encoder,
        }
    }

    /// Authenticate a user with username and password.
    ///
    /// Looks the user up, then verifies the supplied password against the
    /// stored hash. Storage faults propagate; they are never reported as
    /// a credential failure.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<User, AuthenticationError> {
        let user = self
            .repository
            .find_by_username(username)
            .await
            .map_err(AuthenticationError::Storage)?
            .ok_or(AuthenticationError::UserNotFound)?;

        if self.encoder.matches(password, user.get_password()) {
            Ok(user)
        } else {
            Err(AuthenticationError::BadCredentials)
        }
    }

    /// Get the user repository.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Get the password encoder.
    pub fn encoder(&self) -> &E {
        &self.encoder
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::security::crypto::NoOpPasswordEncoder;

    fn test_user(username: &str) -> User {
        User::with_encoded_password(username, "password".to_string())
    }

    /// A repository whose storage is permanently down.
    struct BrokenRepository;

    #[async_trait]
    impl UserRepository for BrokenRepository {
        async fn find_by_username(
            &self,
            _username: &str,
        ) -> Result<Option<User>, RepositoryError> {
            Err(RepositoryError::Storage("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn test_in_memory_find_and_exists() {
        let repo = InMemoryUserRepository::new();
        repo.create_user(&test_user("alice")).await.unwrap();

        let found = repo.find_by_username("alice").await.unwrap();
        assert_eq!(found.unwrap().get_username(), "alice");

        assert!(repo.user_exists("alice").await.unwrap());
        assert!(!repo.user_exists("bob").await.unwrap());
    }

    #[tokio::test]
    async fn test_in_memory_absence_is_not_an_error() {
        let repo = InMemoryUserRepository::new();
        let result = repo.find_by_username("nobody").await;
        assert!(matches!(result, Ok(None)));
    }

    #[tokio::test]
    async fn test_in_memory_duplicate_create_fails() {
        let repo = InMemoryUserRepository::new();
        repo.create_user(&test_user("alice")).await.unwrap();

        let result = repo.create_user(&test_user("alice")).await;
        assert!(matches!(result, Err(RepositoryError::DuplicateUsername)));
    }

    #[tokio::test]
    async fn test_case_sensitive_lookup_by_default() {
        let repo = InMemoryUserRepository::new();
        repo.create_user(&test_user("Alice")).await.unwrap();

        assert!(repo.find_by_username("Alice").await.unwrap().is_some());
        assert!(repo.find_by_username("alice").await.unwrap().is_none());
        assert!(repo.find_by_username("ALICE").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_case_insensitive_lookup_when_configured() {
        let repo = InMemoryUserRepository::new().case_insensitive();
        repo.create_user(&test_user("Alice")).await.unwrap();

        let found = repo.find_by_username("aLiCe").await.unwrap().unwrap();
        // Original spelling is preserved
        assert_eq!(found.get_username(), "Alice");

        // Duplicate detection folds case too
        let result = repo.create_user(&test_user("ALICE")).await;
        assert!(matches!(result, Err(RepositoryError::DuplicateUsername)));
    }

    #[tokio::test]
    async fn test_provider_success() {
        let repo = InMemoryUserRepository::new();
        repo.create_user(&test_user("alice")).await.unwrap();

        let provider =
            DaoAuthenticationProvider::new(Arc::new(repo), Arc::new(NoOpPasswordEncoder));

        let user = provider.authenticate("alice", "password").await.unwrap();
        assert_eq!(user.get_username(), "alice");
    }

    #[tokio::test]
    async fn test_provider_unknown_user() {
        let repo = InMemoryUserRepository::new();
        let provider =
            DaoAuthenticationProvider::new(Arc::new(repo), Arc::new(NoOpPasswordEncoder));

        let err = provider.authenticate("ghost", "password").await.unwrap_err();
        assert!(matches!(err, AuthenticationError::UserNotFound));
        assert!(err.is_credential_failure());
    }

    #[tokio::test]
    async fn test_provider_wrong_password() {
        let repo = InMemoryUserRepository::new();
        repo.create_user(&test_user("alice")).await.unwrap();

        let provider =
            DaoAuthenticationProvider::new(Arc::new(repo), Arc::new(NoOpPasswordEncoder));

        let err = provider.authenticate("alice", "wrong").await.unwrap_err();
        assert!(matches!(err, AuthenticationError::BadCredentials));
        assert!(err.is_credential_failure());
    }

    #[tokio::test]
    async fn test_provider_storage_fault_propagates() {
        let provider = DaoAuthenticationProvider::new(
            Arc::new(BrokenRepository),
            Arc::new(NoOpPasswordEncoder),
        );

        let err = provider.authenticate("alice", "password").await.unwrap_err();
        assert!(matches!(err, AuthenticationError::Storage(_)));
        // A storage fault is not a credential failure
        assert!(!err.is_credential_failure());
    }

    #[tokio::test]
    async fn test_provider_with_trait_objects() {
        let repo: Arc<dyn UserManager> = Arc::new(InMemoryUserRepository::new());
        repo.create_user(&test_user("alice")).await.unwrap();

        let encoder: Arc<dyn PasswordEncoder> = Arc::new(NoOpPasswordEncoder);
        let provider = DaoAuthenticationProvider::new(repo, encoder);

        assert!(provider.authenticate("alice", "password").await.is_ok());
    }
}
