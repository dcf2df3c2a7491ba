// Errors layer - Error type definitions
pub mod api;
pub mod internal;

// Re-exports for convenience
pub use api::AuditApiError;
pub use internal::{AuditError, InternalError, ValidationError};
