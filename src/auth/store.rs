//! Account Storage
//! Mission: Hold registered accounts in memory with hashed credentials

use crate::auth::models::Account;
use crate::hierarchy::{Role, RoleHierarchy};
use anyhow::{Context, Result};
use bcrypt::{hash, verify, DEFAULT_COST};
use parking_lot::RwLock;
use tracing::info;

/// Signup failures surfaced to the caller as values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignupError {
    /// Username uniqueness is enforced here, at the store boundary.
    UsernameTaken,
    /// Unknown roles are a hard validation error at account creation,
    /// even though the distribution engine tolerates them downstream.
    UnknownRole(Role),
}

impl std::fmt::Display for SignupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignupError::UsernameTaken => write!(f, "Username already exists"),
            SignupError::UnknownRole(role) => {
                write!(f, "Role {} is not part of the hierarchy", role)
            }
        }
    }
}

impl std::error::Error for SignupError {}

/// In-memory account store. The demo keeps no persistent storage; the
/// process owns the full account list for its lifetime.
#[derive(Debug, Default)]
pub struct AccountStore {
    accounts: RwLock<Vec<Account>>,
}

impl AccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new account. Validates the role against the hierarchy
    /// and enforces username uniqueness, then stores a bcrypt hash of
    /// the password.
    pub fn create_account(
        &self,
        username: &str,
        email: &str,
        password: &str,
        role: Role,
        hierarchy: &RoleHierarchy,
    ) -> Result<Result<Account, SignupError>> {
        if !hierarchy.contains(&role) {
            return Ok(Err(SignupError::UnknownRole(role)));
        }

        let password_hash = hash(password, DEFAULT_COST).context("Failed to hash password")?;

        let mut accounts = self.accounts.write();
        if accounts.iter().any(|a| a.username == username) {
            return Ok(Err(SignupError::UsernameTaken));
        }

        let account = Account::new(username, email, password_hash, role);
        accounts.push(account.clone());

        info!("✅ Created account: {} ({})", account.username, account.role);

        Ok(Ok(account))
    }

    /// Verify username, password, and role together. Returns None on any
    /// mismatch without revealing which field failed.
    pub fn authenticate(
        &self,
        username: &str,
        password: &str,
        role: &Role,
    ) -> Result<Option<Account>> {
        let account = {
            let accounts = self.accounts.read();
            accounts
                .iter()
                .find(|a| a.username == username && &a.role == role)
                .cloned()
        };

        let Some(account) = account else {
            return Ok(None);
        };

        let valid =
            verify(password, &account.password_hash).context("Failed to verify password")?;
        Ok(valid.then_some(account))
    }

    pub fn get_by_username(&self, username: &str) -> Option<Account> {
        self.accounts
            .read()
            .iter()
            .find(|a| a.username == username)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.accounts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_and_hierarchy() -> (AccountStore, RoleHierarchy) {
        (AccountStore::new(), RoleHierarchy::default())
    }

    #[test]
    fn test_create_and_retrieve_account() {
        let (store, hierarchy) = store_and_hierarchy();

        let account = store
            .create_account("alice", "alice@example.com", "password1", Role::from("role5"), &hierarchy)
            .unwrap()
            .unwrap();
        assert_eq!(account.username, "alice");
        assert_eq!(account.role, Role::from("role5"));

        let retrieved = store.get_by_username("alice").unwrap();
        assert_eq!(retrieved.id, account.id);
    }

    #[test]
    fn test_password_is_hashed_not_verbatim() {
        let (store, hierarchy) = store_and_hierarchy();

        let account = store
            .create_account("alice", "alice@example.com", "password1", Role::from("role5"), &hierarchy)
            .unwrap()
            .unwrap();
        assert_ne!(account.password_hash, "password1");
    }

    #[test]
    fn test_username_uniqueness_enforced() {
        let (store, hierarchy) = store_and_hierarchy();

        store
            .create_account("alice", "a@example.com", "password1", Role::from("role5"), &hierarchy)
            .unwrap()
            .unwrap();
        let second = store
            .create_account("alice", "b@example.com", "password2", Role::from("role4"), &hierarchy)
            .unwrap();
        assert_eq!(second.unwrap_err(), SignupError::UsernameTaken);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_unknown_role_rejected_at_signup() {
        let (store, hierarchy) = store_and_hierarchy();

        let result = store
            .create_account("mallory", "m@example.com", "password1", Role::from("role42"), &hierarchy)
            .unwrap();
        assert_eq!(
            result.unwrap_err(),
            SignupError::UnknownRole(Role::from("role42"))
        );
        assert!(store.is_empty());
    }

    #[test]
    fn test_authenticate_requires_all_three_to_match() {
        let (store, hierarchy) = store_and_hierarchy();

        store
            .create_account("alice", "alice@example.com", "password1", Role::from("role5"), &hierarchy)
            .unwrap()
            .unwrap();

        // All three match
        assert!(store
            .authenticate("alice", "password1", &Role::from("role5"))
            .unwrap()
            .is_some());

        // Wrong password
        assert!(store
            .authenticate("alice", "wrong", &Role::from("role5"))
            .unwrap()
            .is_none());

        // Right credentials, wrong role
        assert!(store
            .authenticate("alice", "password1", &Role::from("role4"))
            .unwrap()
            .is_none());

        // Unknown user
        assert!(store
            .authenticate("nobody", "password1", &Role::from("role5"))
            .unwrap()
            .is_none());
    }
}
