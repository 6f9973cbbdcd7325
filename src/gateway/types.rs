//! Gateway boundary types
//!
//! Request DTOs enforce the boundary validation contract at the serde
//! layer: identities must be non-empty, amounts must be well-formed,
//! non-negative decimals. Business outcomes are mapped to responses in the
//! handlers.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

// ============================================================================
// StrictAmount: Format-Validated Decimal at Serde Layer
// ============================================================================

/// Strict format decimal amount - validated during deserialization.
///
/// - Rejects `.5` (must be `0.5`)
/// - Rejects `5.` (must be `5.0` or `5`)
/// - Rejects negative numbers
/// - Rejects empty strings
///
/// Accepts both JSON strings and JSON numbers. Zero is accepted here;
/// strictly-positive checks belong to the operation (a transfer amount must
/// be positive, an opening balance only non-negative).
#[derive(Debug, Clone, Copy)]
pub struct StrictAmount(Decimal);

impl StrictAmount {
    /// Get the inner Decimal value
    pub fn inner(self) -> Decimal {
        self.0
    }

    #[cfg(test)]
    pub fn from_decimal(d: Decimal) -> Self {
        Self(d)
    }
}

impl std::ops::Deref for StrictAmount {
    type Target = Decimal;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'de> Deserialize<'de> for StrictAmount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error;

        // Support both JSON number and JSON string
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum DecimalOrString {
            String(String),
            Number(Decimal),
        }

        let value = DecimalOrString::deserialize(deserializer)?;

        match value {
            DecimalOrString::String(s) => {
                if s.is_empty() {
                    return Err(D::Error::custom("Amount cannot be empty"));
                }
                if s.starts_with('.') {
                    return Err(D::Error::custom("Invalid format: use 0.5 not .5"));
                }
                if s.ends_with('.') {
                    return Err(D::Error::custom("Invalid format: use 5.0 not 5."));
                }

                let d: Decimal = s
                    .parse()
                    .map_err(|e| D::Error::custom(format!("Invalid decimal: {}", e)))?;

                if d.is_sign_negative() {
                    return Err(D::Error::custom("Amount cannot be negative"));
                }

                Ok(StrictAmount(d))
            }
            DecimalOrString::Number(d) => {
                if d.is_sign_negative() {
                    return Err(D::Error::custom("Amount cannot be negative"));
                }
                Ok(StrictAmount(d))
            }
        }
    }
}

impl Serialize for StrictAmount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Serialize as string to preserve precision
        serializer.serialize_str(&self.0.to_string())
    }
}

/// Custom deserializer for non-empty strings
fn deserialize_non_empty_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    if s.is_empty() {
        return Err(serde::de::Error::custom("string cannot be empty"));
    }
    Ok(s)
}

// ============================================================================
// Request DTOs
// ============================================================================

/// Account creation request.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateAccountRequest {
    /// Account identity (must not be empty)
    #[serde(rename = "accountId", deserialize_with = "deserialize_non_empty_string")]
    #[schema(example = "Id-123")]
    pub account_id: String,
    /// Opening balance (non-negative)
    #[schema(value_type = String, example = "1000")]
    pub balance: StrictAmount,
}

/// Transfer request.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TransferApiRequest {
    #[serde(rename = "fromAccountId", deserialize_with = "deserialize_non_empty_string")]
    #[schema(example = "Id-123")]
    pub from_account_id: String,
    #[serde(rename = "toAccountId", deserialize_with = "deserialize_non_empty_string")]
    #[schema(example = "Id-456")]
    pub to_account_id: String,
    /// Amount to move (strictly positive)
    #[schema(value_type = String, example = "10.50")]
    pub amount: StrictAmount,
}

// ============================================================================
// Response DTOs
// ============================================================================

/// Transfer endpoint response body.
#[derive(Debug, Serialize, ToSchema)]
pub struct TransferResponseData {
    #[schema(example = "Success")]
    pub message: String,
}

impl TransferResponseData {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    #[schema(value_type = String, example = "DUPLICATE_ACCOUNT_ID")]
    pub code: &'static str,
    #[schema(example = "Account id Id-123 already exists")]
    pub message: String,
}

// ============================================================================
// ApiError
// ============================================================================

/// Gateway-level errors, rendered as `ErrorBody` with a matching status.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Account {0} does not exist")]
    AccountNotFound(String),

    #[error("{0}")]
    DuplicateAccountId(String),
}

impl ApiError {
    /// Error code for API responses.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            ApiError::DuplicateAccountId(_) => "DUPLICATE_ACCOUNT_ID",
        }
    }

    /// HTTP status for this error.
    pub fn http_status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) | ApiError::DuplicateAccountId(_) => StatusCode::BAD_REQUEST,
            ApiError::AccountNotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            code: self.code(),
            message: self.to_string(),
        };
        (self.http_status(), Json(body)).into_response()
    }
}
