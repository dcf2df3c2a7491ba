use thiserror::Error;

/// Internal error type for store and service operations
///
/// Separates infrastructure errors (Database, Parse, Io) shared by all
/// layers from domain errors (Audit, Validation) specific to this
/// subsystem. This error type is NOT exposed over HTTP; the API layer
/// converts it to `AuditApiError`.
#[derive(Error, Debug)]
pub enum InternalError {
    /// Database query or operation failed
    #[error("Database error: {operation} failed: {source}")]
    Database {
        operation: String,
        #[source]
        source: sea_orm::DbErr,
    },

    /// Failed to parse a value (timestamp, JSON, etc.)
    #[error("Parse error: failed to parse {value_type}: {message}")]
    Parse { value_type: String, message: String },

    /// File system operation failed (store backup)
    #[error("File system error: {operation} failed: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// Audit recorder errors (write failures, invalid events)
    #[error(transparent)]
    Audit(#[from] AuditError),

    /// Query filter validation errors
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl InternalError {
    /// Create a database error with context
    pub fn database(operation: impl Into<String>, source: sea_orm::DbErr) -> Self {
        Self::Database {
            operation: operation.into(),
            source,
        }
    }

    /// Create a parse error with context
    pub fn parse(value_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            value_type: value_type.into(),
            message: message.into(),
        }
    }

    /// Create a file system error with context
    pub fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            source,
        }
    }
}

/// Audit recorder specific errors
///
/// These never reach a business caller: the recorder catches them at its
/// boundary, logs them, and returns nothing.
#[derive(Error, Debug)]
pub enum AuditError {
    /// The store rejected or could not accept a new record
    #[error("Failed to write audit log: {0}")]
    WriteFailed(String),

    /// A mutation event arrived without any row snapshot
    #[error("No snapshot supplied for {action} on {table_name}#{record_key}")]
    MissingSnapshot {
        action: String,
        table_name: String,
        record_key: String,
    },
}

/// Query filter validation errors, surfaced to the viewer
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Page must be 1 or greater, got {0}")]
    InvalidPage(i64),

    #[error("Page size must be between 1 and {max}, got {got}")]
    InvalidPageSize { got: i64, max: u64 },

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid date range: {from} is after {to}")]
    InvalidDateRange { from: String, to: String },

    #[error("Unknown action kind: {0}")]
    UnknownAction(String),

    #[error("Unknown sort order: {0} (expected \"asc\" or \"desc\")")]
    InvalidSortOrder(String),
}
