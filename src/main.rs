//! transferd - Atomic in-memory account transfer service
//!
//! Entry point: loads config, initializes logging, wires the account store,
//! notifier, and transfer coordinator, then serves the HTTP gateway.

use std::sync::Arc;

use transferd::config::AppConfig;
use transferd::coordinator::TransferCoordinator;
use transferd::gateway;
use transferd::logging::init_logging;
use transferd::notification::LogNotificationService;
use transferd::store::AccountStore;

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

/// Get port override from command line (--port argument)
fn get_port_override() -> Option<u16> {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if args[i] == "--port" && i + 1 < args.len() {
            return args[i + 1].parse().ok();
        }
    }
    None
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = get_env();
    let mut config = AppConfig::load(&env);
    if let Some(port) = get_port_override() {
        config.gateway.port = port;
    }
    let _log_guard = init_logging(&config);

    tracing::info!("Starting transferd in {} mode", env);

    let store = Arc::new(AccountStore::new());
    let notifier = Arc::new(LogNotificationService::new());
    let coordinator = Arc::new(TransferCoordinator::new(store, notifier));

    gateway::run_server(&config.gateway, coordinator).await
}
