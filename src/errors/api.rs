use poem_openapi::{payload::Json, ApiResponse, Object};

use crate::errors::internal::InternalError;

/// Standardized error response body for audit endpoints
#[derive(Object, Debug)]
pub struct AuditErrorResponse {
    /// Error code identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code
    pub status_code: u16,
}

/// Audit viewer error types
#[derive(ApiResponse, Debug)]
pub enum AuditApiError {
    /// Query filter rejected
    #[oai(status = 400)]
    InvalidFilter(Json<AuditErrorResponse>),

    /// The store could not satisfy the request
    #[oai(status = 500)]
    StoreError(Json<AuditErrorResponse>),
}

impl AuditApiError {
    /// Create an InvalidFilter error
    pub fn invalid_filter(message: impl Into<String>) -> Self {
        AuditApiError::InvalidFilter(Json(AuditErrorResponse {
            error: "invalid_filter".to_string(),
            message: message.into(),
            status_code: 400,
        }))
    }

    /// Create a StoreError error
    pub fn store_error(message: impl Into<String>) -> Self {
        AuditApiError::StoreError(Json(AuditErrorResponse {
            error: "store_error".to_string(),
            message: message.into(),
            status_code: 500,
        }))
    }
}

impl From<InternalError> for AuditApiError {
    fn from(err: InternalError) -> Self {
        match err {
            InternalError::Validation(validation) => Self::invalid_filter(validation.to_string()),
            other => {
                // Reads have no fallback; the viewer gets a terminal error
                tracing::error!("Audit query failed: {:?}", other);
                Self::store_error("The audit store could not satisfy the request")
            }
        }
    }
}
