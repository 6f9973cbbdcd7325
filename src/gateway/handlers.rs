//! Account and transfer handlers

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;
use utoipa::ToSchema;

use super::state::AppState;
use super::types::{ApiError, CreateAccountRequest, TransferApiRequest, TransferResponseData};
use crate::account::{Account, AccountView};
use crate::coordinator::{TransferOutcome, TransferRequest};

/// Create a new account
///
/// POST /v1/accounts
#[utoipa::path(
    post,
    path = "/v1/accounts",
    request_body = CreateAccountRequest,
    responses(
        (status = 201, description = "Account created", body = AccountView, content_type = "application/json"),
        (status = 400, description = "Duplicate account id or invalid request")
    ),
    tag = "Accounts"
)]
pub async fn create_account(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateAccountRequest>,
) -> Result<(StatusCode, Json<AccountView>), ApiError> {
    tracing::info!("Creating account {}", req.account_id);

    let account = Account::new(req.account_id, req.balance.inner());
    let created = state
        .coordinator
        .create_account(account)
        .map_err(|e| ApiError::DuplicateAccountId(e.to_string()))?;

    Ok((StatusCode::CREATED, Json(created.view().await)))
}

/// Retrieve one account
///
/// GET /v1/accounts/{account_id}
#[utoipa::path(
    get,
    path = "/v1/accounts/{account_id}",
    params(
        ("account_id" = String, Path, description = "Account identity")
    ),
    responses(
        (status = 200, description = "Account details", body = AccountView, content_type = "application/json"),
        (status = 404, description = "Account does not exist")
    ),
    tag = "Accounts"
)]
pub async fn get_account(
    State(state): State<Arc<AppState>>,
    Path(account_id): Path<String>,
) -> Result<Json<AccountView>, ApiError> {
    tracing::info!("Retrieving account for id {}", account_id);

    match state.coordinator.get_account(&account_id) {
        Some(account) => Ok(Json(account.view().await)),
        None => Err(ApiError::AccountNotFound(account_id)),
    }
}

/// Transfer funds between two accounts
///
/// POST /v1/accounts/transfer
///
/// Business outcomes map onto the response message: `Success` with 200, or
/// 400 with the reason.
#[utoipa::path(
    post,
    path = "/v1/accounts/transfer",
    request_body = TransferApiRequest,
    responses(
        (status = 200, description = "Transfer completed", body = TransferResponseData, content_type = "application/json"),
        (status = 400, description = "Missing account, insufficient funds, or invalid amount")
    ),
    tag = "Transfer"
)]
pub async fn transfer(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TransferApiRequest>,
) -> (StatusCode, Json<TransferResponseData>) {
    if req.amount.is_zero() {
        return (
            StatusCode::BAD_REQUEST,
            Json(TransferResponseData::new(
                "Transferred amount must be positive.",
            )),
        );
    }

    let request = TransferRequest::new(req.from_account_id, req.to_account_id, req.amount.inner());
    let outcome = state.coordinator.transfer(&request).await;

    let (status, message) = match outcome {
        TransferOutcome::Success => (StatusCode::OK, "Success"),
        TransferOutcome::SourceMissing => {
            (StatusCode::BAD_REQUEST, "'From' account does not exist")
        }
        TransferOutcome::DestinationMissing => {
            (StatusCode::BAD_REQUEST, "'To' account does not exist")
        }
        TransferOutcome::InsufficientFunds => (StatusCode::BAD_REQUEST, "Transfer limit exceeded"),
    };
    (status, Json(TransferResponseData::new(message)))
}

/// Health check response data
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(value_type = String, example = "ok")]
    pub status: &'static str,
    #[schema(value_type = String, example = "0.1.0")]
    pub version: &'static str,
    #[schema(value_type = String, example = "a1b2c3d")]
    pub build: &'static str,
}

/// Health check endpoint
///
/// GET /health
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service healthy", body = HealthResponse, content_type = "application/json")
    ),
    tag = "System"
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        build: env!("GIT_HASH"),
    })
}
