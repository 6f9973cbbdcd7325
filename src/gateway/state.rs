use std::sync::Arc;

use crate::coordinator::TransferCoordinator;

/// Shared gateway state.
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<TransferCoordinator>,
}

impl AppState {
    pub fn new(coordinator: Arc<TransferCoordinator>) -> Self {
        Self { coordinator }
    }
}
