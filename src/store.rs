//! Account Store
//!
//! Concurrent mapping from account identity to [`Account`]. Insert and
//! lookup are internally thread-safe; balance reads still require the
//! account's own lock.

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use thiserror::Error;

use crate::account::Account;

/// Store-level errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Account id {0} already exists")]
    DuplicateAccountId(String),
}

impl StoreError {
    /// Error code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::DuplicateAccountId(_) => "DUPLICATE_ACCOUNT_ID",
        }
    }
}

/// Concurrent account map.
///
/// Accounts are shared as `Arc<Account>` so an in-flight transfer keeps its
/// resolved accounts alive independently of the map.
#[derive(Debug, Default)]
pub struct AccountStore {
    accounts: DashMap<String, Arc<Account>>,
}

impl AccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new account keyed by its identity.
    ///
    /// The create-or-reject decision is atomic: a concurrent create for the
    /// same identity cannot overwrite an existing entry.
    ///
    /// # Errors
    /// `DuplicateAccountId` if the identity is already present; the existing
    /// entry is left untouched.
    pub fn create(&self, account: Account) -> Result<Arc<Account>, StoreError> {
        match self.accounts.entry(account.account_id().to_string()) {
            Entry::Occupied(entry) => Err(StoreError::DuplicateAccountId(entry.key().clone())),
            Entry::Vacant(entry) => {
                let account = Arc::new(account);
                entry.insert(account.clone());
                Ok(account)
            }
        }
    }

    /// Look up an account by identity.
    pub fn get(&self, account_id: &str) -> Option<Arc<Account>> {
        self.accounts.get(account_id).map(|entry| entry.value().clone())
    }

    /// Number of accounts in the store.
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Remove every account. Test/reset support.
    pub fn clear(&self) {
        self.accounts.clear();
    }
}
