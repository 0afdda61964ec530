//! Ordered access rules for request paths.
//!
//! A rule table maps path patterns to an [`AccessPolicy`]. Rules are
//! evaluated top-to-bottom and the first matching pattern wins; requests
//! matching no rule fall through to the catch-all policy, which defaults
//! to requiring authentication.
//!
//! # Example
//! ```rust
//! use stocksim_security::http::security::{AccessPolicy, AccessRules};
//!
//! let rules = AccessRules::new()
//!     .permit_all(&["/register", "/login", "/error"])
//!     .any_request(AccessPolicy::Authenticated);
//!
//! assert_eq!(rules.decide("/login"), AccessPolicy::PermitAll);
//! assert_eq!(rules.decide("/dashboard"), AccessPolicy::Authenticated);
//! ```

use crate::http::security::path_matcher::PathPattern;

/// Decision for a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessPolicy {
    /// Anyone may pass, session or not.
    PermitAll,
    /// An authenticated session is required.
    Authenticated,
}

/// Ordered list of `(pattern, policy)` rules, first match wins.
#[derive(Debug, Clone)]
pub struct AccessRules {
    rules: Vec<(PathPattern, AccessPolicy)>,
    any_request: AccessPolicy,
}

impl Default for AccessRules {
    fn default() -> Self {
        Self::new()
    }
}

impl AccessRules {
    /// Create an empty rule table. Unmatched requests require
    /// authentication until [`AccessRules::any_request`] says otherwise.
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            any_request: AccessPolicy::Authenticated,
        }
    }

    /// Append a rule for a single pattern.
    pub fn add_rule(mut self, pattern: &str, policy: AccessPolicy) -> Self {
        self.rules.push((PathPattern::new(pattern), policy));
        self
    }

    /// Append permit-all rules for the given patterns.
    pub fn permit_all(mut self, patterns: &[&str]) -> Self {
        for pattern in patterns {
            self.rules
                .push((PathPattern::new(pattern), AccessPolicy::PermitAll));
        }
        self
    }

    /// Append authentication-required rules for the given patterns.
    pub fn authenticated(mut self, patterns: &[&str]) -> Self {
        for pattern in patterns {
            self.rules
                .push((PathPattern::new(pattern), AccessPolicy::Authenticated));
        }
        self
    }

    /// Set the catch-all policy for requests matching no rule.
    pub fn any_request(mut self, policy: AccessPolicy) -> Self {
        self.any_request = policy;
        self
    }

    /// Decide the policy for a request path. Rules are checked in
    /// insertion order; the first match wins.
    pub fn decide(&self, path: &str) -> AccessPolicy {
        for (pattern, policy) in &self.rules {
            if pattern.matches(path) {
                return *policy;
            }
        }
        self.any_request
    }

    /// Number of explicit rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if there are no explicit rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
