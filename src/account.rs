//! Account entity
//!
//! A single monetary account: immutable identity, decimal balance, and the
//! account's own exclusive-access lock.

use rust_decimal::Decimal;
use serde::Serialize;
use tokio::sync::{Mutex, MutexGuard};
use utoipa::ToSchema;

/// A monetary account.
///
/// # Invariants (enforced by private fields):
/// - `account_id` is immutable after creation and unique within a store
/// - the balance is only read or written through a held [`Account::lock`]
///   guard, so it never goes negative as an observable result of a transfer
/// - the lock itself is never serialized and takes no part in comparisons
///
/// The lock is non-reentrant: a caller that already holds this account's
/// guard must not call [`Account::lock`] again.
#[derive(Debug)]
pub struct Account {
    account_id: String,
    balance: Mutex<Decimal>,
}

impl Account {
    /// Create a new account with the given identity and opening balance.
    pub fn new(account_id: impl Into<String>, balance: Decimal) -> Self {
        Self {
            account_id: account_id.into(),
            balance: Mutex::new(balance),
        }
    }

    /// Read-only access to the account identity.
    #[inline(always)]
    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    /// Acquire exclusive access to this account's balance.
    ///
    /// Blocks the calling task until the lock is available. The returned
    /// guard releases the lock when dropped, so every exit path of the
    /// caller releases exactly once.
    pub async fn lock(&self) -> MutexGuard<'_, Decimal> {
        self.balance.lock().await
    }

    /// Snapshot the current balance under the account lock.
    pub async fn balance(&self) -> Decimal {
        *self.balance.lock().await
    }

    /// Caller-facing representation (identity + balance, no lock).
    pub async fn view(&self) -> AccountView {
        AccountView {
            account_id: self.account_id.clone(),
            balance: self.balance().await,
        }
    }
}

/// Serializable account representation exposed to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AccountView {
    #[serde(rename = "accountId")]
    #[schema(example = "Id-123")]
    pub account_id: String,
    #[schema(value_type = String, example = "123.45")]
    pub balance: Decimal,
}
