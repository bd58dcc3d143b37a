//! crates/viperhead_core/src/gate.rs
//!
//! The email allow-list consulted after every successful OAuth round-trip.

use std::collections::HashSet;

/// A static set of email addresses permitted to use the service.
#[derive(Debug, Clone, Default)]
pub struct AuthorizationGate {
    allowed: HashSet<String>,
}

impl AuthorizationGate {
    pub fn new<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: emails.into_iter().map(Into::into).collect(),
        }
    }

    /// Exact match against the allow-list.
    pub fn is_allowed(&self, email: &str) -> bool {
        self.allowed.contains(email)
    }

    pub fn len(&self) -> usize {
        self.allowed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }
}
