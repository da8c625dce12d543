//! OpenAPI schema definitions for domain types and shared response bodies.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. The
//! wrappers here mirror their structure and live in the inbound adapter layer
//! where framework concerns belong.

use serde::Serialize;
use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The request body exceeds the configured limit.
    #[schema(rename = "payload_too_large")]
    PayloadTooLarge,
    /// An unexpected error occurred on the server or a collaborator.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Summary of the failed operation.
    #[schema(example = "Error creating stock item")]
    message: String,
    /// Underlying cause.
    #[schema(example = "`Meat` is not a valid category")]
    error: Option<String>,
    /// Structured validation context.
    details: Option<serde_json::Value>,
    /// Correlation identifier, also sent as the `trace-id` header.
    #[schema(format = "uuid")]
    trace_id: Option<String>,
}

/// Plain `{ "message": ... }` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct MessageBody {
    #[schema(example = "Stock item deleted successfully")]
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
