//! Transfer Coordinator
//!
//! Executes atomic transfers between two accounts. A transfer moves through
//! `Validating → Locking → Mutating → Notifying → Releasing`, ending in one
//! of four terminal outcomes. Account and pair locks are held as RAII
//! guards, so every path through the state machine releases everything it
//! acquired, including the insufficient-funds path.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::account::Account;
use crate::notification::NotificationService;
use crate::pair_lock::{PairKey, PairLockRegistry};
use crate::store::{AccountStore, StoreError};

/// A single transfer order. Constructed per call, never stored.
#[derive(Debug, Clone)]
pub struct TransferRequest {
    pub from_account_id: String,
    pub to_account_id: String,
    pub amount: Decimal,
}

impl TransferRequest {
    pub fn new(
        from_account_id: impl Into<String>,
        to_account_id: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        Self {
            from_account_id: from_account_id.into(),
            to_account_id: to_account_id.into(),
            amount,
        }
    }
}

/// Terminal outcome of a transfer. Business results, not errors: any
/// non-success outcome leaves both balances untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferOutcome {
    Success,
    SourceMissing,
    DestinationMissing,
    InsufficientFunds,
}

impl TransferOutcome {
    /// Outcome code for API responses and logs.
    pub fn code(&self) -> &'static str {
        match self {
            TransferOutcome::Success => "SUCCESS",
            TransferOutcome::SourceMissing => "SOURCE_MISSING",
            TransferOutcome::DestinationMissing => "DESTINATION_MISSING",
            TransferOutcome::InsufficientFunds => "INSUFFICIENT_FUNDS",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, TransferOutcome::Success)
    }
}

/// Coordinates account creation, lookup, and atomic transfers.
pub struct TransferCoordinator {
    store: Arc<AccountStore>,
    pair_locks: PairLockRegistry,
    notifier: Arc<dyn NotificationService>,
}

impl TransferCoordinator {
    pub fn new(store: Arc<AccountStore>, notifier: Arc<dyn NotificationService>) -> Self {
        Self {
            store,
            pair_locks: PairLockRegistry::new(),
            notifier,
        }
    }

    /// Register a new account.
    pub fn create_account(&self, account: Account) -> Result<Arc<Account>, StoreError> {
        self.store.create(account)
    }

    /// Look up an account by identity.
    pub fn get_account(&self, account_id: &str) -> Option<Arc<Account>> {
        self.store.get(account_id)
    }

    /// Pairs currently contended (diagnostic).
    pub fn active_pairs(&self) -> usize {
        self.pair_locks.active_pairs()
    }

    /// Execute one transfer to completion.
    ///
    /// Disjoint account pairs run fully concurrently. Requests with the
    /// same ordered (from, to) pair queue on the pairwise handle. The two
    /// account locks are acquired in identity order, a consistent global
    /// order, so opposite-direction transfers on the same two accounts
    /// cannot form a circular wait.
    pub async fn transfer(&self, request: &TransferRequest) -> TransferOutcome {
        // Validating: resolve both accounts before taking any lock.
        let Some(from) = self.store.get(&request.from_account_id) else {
            return TransferOutcome::SourceMissing;
        };
        let Some(to) = self.store.get(&request.to_account_id) else {
            return TransferOutcome::DestinationMissing;
        };
        if request.amount <= Decimal::ZERO {
            // Canonical rejection lives at the boundary layer; this is the
            // coordinator's defensive backstop.
            warn!(
                from = %request.from_account_id,
                to = %request.to_account_id,
                amount = %request.amount,
                "Rejecting non-positive transfer amount"
            );
            return TransferOutcome::InsufficientFunds;
        }

        // Locking: pairwise handle first, then the account locks.
        let _pair = self
            .pair_locks
            .acquire(PairKey::new(
                &request.from_account_id,
                &request.to_account_id,
            ))
            .await;

        if from.account_id() == to.account_id() {
            return self.transfer_to_self(&from, request.amount).await;
        }

        // Identity order, not request order: the account lock is not
        // reentrant and from-before-to deadlocks against its own mirror.
        let (mut from_balance, mut to_balance) = if from.account_id() < to.account_id() {
            let f = from.lock().await;
            let t = to.lock().await;
            (f, t)
        } else {
            let t = to.lock().await;
            let f = from.lock().await;
            (f, t)
        };

        // Mutating: validate and move funds under both locks.
        if *from_balance < request.amount {
            return TransferOutcome::InsufficientFunds;
        }
        *from_balance -= request.amount;
        *to_balance += request.amount;

        // Notifying: one leg each, still under lock, best-effort.
        self.notifier
            .notify_about_transfer(
                from.account_id(),
                &debit_message(request.amount, to.account_id()),
            )
            .await;
        self.notifier
            .notify_about_transfer(
                to.account_id(),
                &credit_message(request.amount, from.account_id()),
            )
            .await;

        info!(
            from = %request.from_account_id,
            to = %request.to_account_id,
            amount = %request.amount,
            "Transfer completed"
        );
        TransferOutcome::Success
        // Releasing: both account guards and the pairwise handle drop here,
        // on this and every earlier return.
    }

    /// Same-account transfer: the lock is taken once (it is not reentrant),
    /// funds are validated, and the balance is left as-is because the debit
    /// and credit legs cancel out. Both legs are still notified.
    async fn transfer_to_self(&self, account: &Account, amount: Decimal) -> TransferOutcome {
        let balance = account.lock().await;
        if *balance < amount {
            return TransferOutcome::InsufficientFunds;
        }

        self.notifier
            .notify_about_transfer(account.account_id(), &debit_message(amount, account.account_id()))
            .await;
        self.notifier
            .notify_about_transfer(account.account_id(), &credit_message(amount, account.account_id()))
            .await;

        info!(account = %account.account_id(), amount = %amount, "Self-transfer completed (no-op)");
        TransferOutcome::Success
    }
}

fn debit_message(amount: Decimal, to_account_id: &str) -> String {
    format!("Transferred {} from your account to {}", amount, to_account_id)
}

fn credit_message(amount: Decimal, from_account_id: &str) -> String {
    format!("Transferred {} into your account from {}", amount, from_account_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::RecordingNotifier;

    struct TestHarness {
        coordinator: TransferCoordinator,
        notifier: Arc<RecordingNotifier>,
    }

    impl TestHarness {
        fn new() -> Self {
            let store = Arc::new(AccountStore::new());
            let notifier = Arc::new(RecordingNotifier::new());
            let coordinator = TransferCoordinator::new(store, notifier.clone());
            Self {
                coordinator,
                notifier,
            }
        }

        fn account(&self, id: &str, balance: u64) {
            self.coordinator
                .create_account(Account::new(id, Decimal::from(balance)))
                .unwrap();
        }

        async fn balance(&self, id: &str) -> Decimal {
            self.coordinator.get_account(id).unwrap().balance().await
        }
    }

    #[tokio::test]
    async fn test_successful_transfer_moves_funds() {
        let h = TestHarness::new();
        h.account("from", 10);
        h.account("to", 0);

        let outcome = h
            .coordinator
            .transfer(&TransferRequest::new("from", "to", Decimal::ONE))
            .await;

        assert_eq!(outcome, TransferOutcome::Success);
        assert!(outcome.is_success());
        assert_eq!(h.balance("from").await, Decimal::from(9));
        assert_eq!(h.balance("to").await, Decimal::ONE);
    }

    #[tokio::test]
    async fn test_transfer_twice() {
        let h = TestHarness::new();
        h.account("from", 10);
        h.account("to", 0);

        let request = TransferRequest::new("from", "to", Decimal::ONE);
        assert_eq!(h.coordinator.transfer(&request).await, TransferOutcome::Success);
        assert_eq!(h.coordinator.transfer(&request).await, TransferOutcome::Success);

        assert_eq!(h.balance("from").await, Decimal::from(8));
        assert_eq!(h.balance("to").await, Decimal::from(2));
    }

    #[tokio::test]
    async fn test_exact_decimal_arithmetic() {
        let h = TestHarness::new();
        h.coordinator
            .create_account(Account::new("from", "10.10".parse().unwrap()))
            .unwrap();
        h.coordinator
            .create_account(Account::new("to", "0.90".parse().unwrap()))
            .unwrap();

        let amount: Decimal = "0.10".parse().unwrap();
        let outcome = h
            .coordinator
            .transfer(&TransferRequest::new("from", "to", amount))
            .await;

        assert_eq!(outcome, TransferOutcome::Success);
        assert_eq!(h.balance("from").await, "10.00".parse::<Decimal>().unwrap());
        assert_eq!(h.balance("to").await, "1.00".parse::<Decimal>().unwrap());
        // Conservation, exactly.
        assert_eq!(
            h.balance("from").await + h.balance("to").await,
            "11.00".parse::<Decimal>().unwrap()
        );
    }

    #[tokio::test]
    async fn test_source_missing_short_circuits() {
        let h = TestHarness::new();
        h.account("to", 5);

        let outcome = h
            .coordinator
            .transfer(&TransferRequest::new("ghost", "to", Decimal::ONE))
            .await;

        assert_eq!(outcome, TransferOutcome::SourceMissing);
        assert_eq!(outcome.code(), "SOURCE_MISSING");
        assert_eq!(h.balance("to").await, Decimal::from(5));
        assert_eq!(h.notifier.count(), 0);
    }

    #[tokio::test]
    async fn test_destination_missing_short_circuits() {
        let h = TestHarness::new();
        h.account("from", 5);

        let outcome = h
            .coordinator
            .transfer(&TransferRequest::new("from", "ghost", Decimal::ONE))
            .await;

        assert_eq!(outcome, TransferOutcome::DestinationMissing);
        assert_eq!(h.balance("from").await, Decimal::from(5));
        assert_eq!(h.notifier.count(), 0);
    }

    #[tokio::test]
    async fn test_insufficient_funds_is_idempotent() {
        let h = TestHarness::new();
        h.account("from", 3);
        h.account("to", 0);

        let request = TransferRequest::new("from", "to", Decimal::from(5));
        assert_eq!(
            h.coordinator.transfer(&request).await,
            TransferOutcome::InsufficientFunds
        );
        assert_eq!(
            h.coordinator.transfer(&request).await,
            TransferOutcome::InsufficientFunds
        );

        // Never partially applied.
        assert_eq!(h.balance("from").await, Decimal::from(3));
        assert_eq!(h.balance("to").await, Decimal::ZERO);
        assert_eq!(h.notifier.count(), 0);
    }

    #[tokio::test]
    async fn test_non_positive_amount_rejected_defensively() {
        let h = TestHarness::new();
        h.account("from", 10);
        h.account("to", 0);

        for amount in [Decimal::ZERO, Decimal::from(-1)] {
            let outcome = h
                .coordinator
                .transfer(&TransferRequest::new("from", "to", amount))
                .await;
            assert_eq!(outcome, TransferOutcome::InsufficientFunds);
        }
        assert_eq!(h.balance("from").await, Decimal::from(10));
        assert_eq!(h.balance("to").await, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_notifies_each_leg_exactly_once() {
        let h = TestHarness::new();
        h.account("from", 10);
        h.account("to", 0);

        h.coordinator
            .transfer(&TransferRequest::new("from", "to", Decimal::ONE))
            .await;

        assert_eq!(h.notifier.count(), 2);
        assert_eq!(
            h.notifier.messages_for("from"),
            vec!["Transferred 1 from your account to to"]
        );
        assert_eq!(
            h.notifier.messages_for("to"),
            vec!["Transferred 1 into your account from from"]
        );
    }

    #[tokio::test]
    async fn test_self_transfer_is_a_funds_checked_noop() {
        let h = TestHarness::new();
        h.account("solo", 10);

        let outcome = h
            .coordinator
            .transfer(&TransferRequest::new("solo", "solo", Decimal::from(4)))
            .await;

        assert_eq!(outcome, TransferOutcome::Success);
        assert_eq!(h.balance("solo").await, Decimal::from(10));
        // Both legs notified, like any other successful transfer.
        assert_eq!(h.notifier.messages_for("solo").len(), 2);
    }

    #[tokio::test]
    async fn test_self_transfer_still_checks_funds() {
        let h = TestHarness::new();
        h.account("solo", 3);

        let outcome = h
            .coordinator
            .transfer(&TransferRequest::new("solo", "solo", Decimal::from(5)))
            .await;

        assert_eq!(outcome, TransferOutcome::InsufficientFunds);
        assert_eq!(h.balance("solo").await, Decimal::from(3));
        assert_eq!(h.notifier.count(), 0);
    }

    #[tokio::test]
    async fn test_pair_registry_drains_after_transfer() {
        let h = TestHarness::new();
        h.account("from", 10);
        h.account("to", 0);

        h.coordinator
            .transfer(&TransferRequest::new("from", "to", Decimal::ONE))
            .await;

        assert_eq!(h.coordinator.active_pairs(), 0);
    }
}
