//! Credential verification seam used by the login route.
//!
//! User persistence and password hashing live outside this service; the
//! login flow only needs "who is this, and what role do they hold".

use std::collections::HashMap;

use uuid::Uuid;

use garrison_auth::Role;

/// Result of a successful credential check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedUser {
    pub id: String,
    pub role: Role,
}

pub trait CredentialVerifier: Send + Sync {
    /// `None` for an unknown user or a wrong password; the caller must not
    /// be able to tell which.
    fn verify(&self, username: &str, password: &str) -> Option<VerifiedUser>;
}

struct Account {
    password: String,
    user: VerifiedUser,
}

/// In-memory directory for development and tests.
///
/// Passwords are compared as given; production wiring supplies a verifier
/// backed by the user store.
#[derive(Default)]
pub struct InMemoryCredentials {
    accounts: HashMap<String, Account>,
}

impl InMemoryCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) an account and return its generated id.
    pub fn add_user(&mut self, username: impl Into<String>, password: impl Into<String>, role: Role) -> String {
        let id = Uuid::now_v7().to_string();
        self.accounts.insert(
            username.into(),
            Account {
                password: password.into(),
                user: VerifiedUser { id: id.clone(), role },
            },
        );
        id
    }

    pub fn with_user(mut self, username: impl Into<String>, password: impl Into<String>, role: Role) -> Self {
        self.add_user(username, password, role);
        self
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl CredentialVerifier for InMemoryCredentials {
    fn verify(&self, username: &str, password: &str) -> Option<VerifiedUser> {
        self.accounts
            .get(username)
            .filter(|account| account.password == password)
            .map(|account| account.user.clone())
    }
}
