//! OpenAPI / Swagger UI Documentation
//!
//! - Swagger UI: `http://localhost:8080/docs`
//! - OpenAPI JSON: `http://localhost:8080/api-docs/openapi.json`

use utoipa::OpenApi;

use crate::account::AccountView;
use crate::gateway::handlers::HealthResponse;
use crate::gateway::types::{CreateAccountRequest, ErrorBody, TransferApiRequest, TransferResponseData};

/// Main API Documentation struct
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Transferd Accounts API",
        version = "1.0.0",
        description = "In-memory account service with atomic, deadlock-free transfers."
    ),
    servers(
        (url = "http://localhost:8080", description = "Development"),
    ),
    paths(
        crate::gateway::handlers::health_check,
        crate::gateway::handlers::create_account,
        crate::gateway::handlers::get_account,
        crate::gateway::handlers::transfer,
    ),
    components(
        schemas(
            HealthResponse,
            AccountView,
            CreateAccountRequest,
            TransferApiRequest,
            TransferResponseData,
            ErrorBody,
        )
    ),
    tags(
        (name = "Accounts", description = "Account creation and lookup"),
        (name = "Transfer", description = "Atomic transfers between accounts"),
        (name = "System", description = "Health checks and system info")
    )
)]
pub struct ApiDoc;
