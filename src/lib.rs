//! transferd - Atomic in-memory account transfer service
//!
//! Maintains monetary accounts in memory and executes atomic transfers
//! between them under concurrent load: no overdraft, no lost updates, and
//! no deadlock even for opposite-direction transfers between the same two
//! accounts.
//!
//! # Modules
//!
//! - [`account`] - Account entity (identity, decimal balance, per-account lock)
//! - [`store`] - Concurrent account store (create / lookup)
//! - [`pair_lock`] - Pairwise lock registry for same-ordered-pair transfers
//! - [`coordinator`] - Transfer state machine and outcome type
//! - [`notification`] - Fire-and-forget notification collaborator
//! - [`gateway`] - HTTP surface (axum)
//! - [`config`] / [`logging`] - service configuration and tracing setup

pub mod account;
pub mod config;
pub mod coordinator;
pub mod gateway;
pub mod logging;
pub mod notification;
pub mod pair_lock;
pub mod store;

// Convenient re-exports at crate root
pub use account::{Account, AccountView};
pub use coordinator::{TransferCoordinator, TransferOutcome, TransferRequest};
pub use notification::{LogNotificationService, NotificationService, RecordingNotifier};
pub use pair_lock::{PairKey, PairLockRegistry};
pub use store::{AccountStore, StoreError};
