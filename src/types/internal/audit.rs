use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

use crate::errors::internal::ValidationError;
use crate::types::internal::snapshot::Snapshot;

/// Table name used for records that do not belong to a business row,
/// such as transaction boundary markers.
pub const SYSTEM_TABLE: &str = "SYSTEM";

/// Closed set of action kinds the audit log records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Insert,
    Update,
    Delete,
    Select,
    TransactionStart,
    TransactionComplete,
    TransactionError,
}

impl ActionKind {
    /// String representation used for database storage and filtering
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Select => "SELECT",
            Self::TransactionStart => "TRANSACTION_START",
            Self::TransactionComplete => "TRANSACTION_COMPLETE",
            Self::TransactionError => "TRANSACTION_ERROR",
        }
    }

    /// Whether this action changes a business row and therefore requires
    /// at least one snapshot
    pub fn is_mutation(&self) -> bool {
        matches!(self, Self::Insert | Self::Update | Self::Delete)
    }

    /// Whether this action is a transaction boundary marker
    pub fn is_transaction_marker(&self) -> bool {
        matches!(
            self,
            Self::TransactionStart | Self::TransactionComplete | Self::TransactionError
        )
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INSERT" => Ok(Self::Insert),
            "UPDATE" => Ok(Self::Update),
            "DELETE" => Ok(Self::Delete),
            "SELECT" => Ok(Self::Select),
            "TRANSACTION_START" => Ok(Self::TransactionStart),
            "TRANSACTION_COMPLETE" => Ok(Self::TransactionComplete),
            "TRANSACTION_ERROR" => Ok(Self::TransactionError),
            other => Err(ValidationError::UnknownAction(other.to_string())),
        }
    }
}

/// Audit event structure for building audit records before they are appended
///
/// Built by the recorder (or a `RecordBuilder`), consumed by the store,
/// which assigns the id and capture timestamp on insert.
#[derive(Debug, Clone)]
pub struct AuditEvent {
    pub action: ActionKind,
    pub table_name: String,
    pub record_key: String,
    pub old_values: Option<Snapshot>,
    pub new_values: Option<Snapshot>,
    pub changes: Option<Map<String, Value>>,
    pub context: HashMap<String, Value>,
    pub notes: Option<String>,
}

impl AuditEvent {
    /// Create a new audit event for the given action and business row
    pub fn new(action: ActionKind, table_name: impl Into<String>, record_key: impl Into<String>) -> Self {
        Self {
            action,
            table_name: table_name.into(),
            record_key: record_key.into(),
            old_values: None,
            new_values: None,
            changes: None,
            context: HashMap::new(),
            notes: None,
        }
    }
}

/// Format an instant the way the audit log stores it
///
/// Fixed-width RFC 3339 UTC with microsecond precision, so lexicographic
/// comparison on the stored column equals chronological comparison.
pub fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Capture timestamp for a record being appended now
pub fn now_timestamp() -> String {
    format_timestamp(Utc::now())
}
