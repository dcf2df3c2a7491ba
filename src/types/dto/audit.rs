use poem_openapi::Object;
use serde_json::Value;

use crate::services::ListPage;
use crate::types::db::audit_record;
use crate::types::internal::query::PageInfo;
use crate::types::internal::stats::Statistics;

/// One audit record as served to the viewer
///
/// The JSON-bearing columns are parsed back into structured values; a
/// value that fails to parse is passed through as a raw string rather
/// than failing the whole response.
#[derive(Object, Debug)]
pub struct AuditRecordDto {
    /// Store-assigned identifier; the sole source of temporal ordering
    pub id: i64,

    /// Capture instant, RFC 3339 UTC
    pub timestamp: String,

    /// Action kind (INSERT, UPDATE, DELETE, ...)
    pub action: String,

    /// Business table the record belongs to
    pub table_name: String,

    /// Natural key of the affected row, as text
    pub record_key: String,

    /// Field-level diff for UPDATE actions
    pub changes: Option<Value>,

    /// Row snapshot before the operation
    pub old_values: Option<Value>,

    /// Row snapshot after the operation
    pub new_values: Option<Value>,

    /// Request metadata captured alongside the mutation
    pub context: Option<Value>,

    /// Free-text annotation
    pub notes: Option<String>,
}

impl From<audit_record::Model> for AuditRecordDto {
    fn from(model: audit_record::Model) -> Self {
        Self {
            id: model.id,
            timestamp: model.timestamp,
            action: model.action,
            table_name: model.table_name,
            record_key: model.record_key,
            changes: parse_json_column(model.changes),
            old_values: parse_json_column(model.old_values),
            new_values: parse_json_column(model.new_values),
            context: parse_json_column(model.context),
            notes: model.notes,
        }
    }
}

fn parse_json_column(raw: Option<String>) -> Option<Value> {
    raw.map(|text| serde_json::from_str(&text).unwrap_or(Value::String(text)))
}

/// Pagination metadata computed server-side
#[derive(Object, Debug)]
pub struct PaginationDto {
    pub current_page: u64,
    pub total_pages: u64,
    pub has_prev: bool,
    pub has_next: bool,
    pub total_count: u64,
}

impl From<PageInfo> for PaginationDto {
    fn from(info: PageInfo) -> Self {
        Self {
            current_page: info.current_page,
            total_pages: info.total_pages,
            has_prev: info.has_prev,
            has_next: info.has_next,
            total_count: info.total_count,
        }
    }
}

/// Response model for the filtered log listing
#[derive(Object, Debug)]
pub struct AuditLogPage {
    pub records: Vec<AuditRecordDto>,
    pub pagination: PaginationDto,
}

impl From<ListPage> for AuditLogPage {
    fn from(page: ListPage) -> Self {
        Self {
            records: page.records.into_iter().map(Into::into).collect(),
            pagination: page.pagination.into(),
        }
    }
}

/// Response model for a single row's history
#[derive(Object, Debug)]
pub struct RecordHistory {
    pub table_name: String,
    pub record_key: String,
    pub history: Vec<AuditRecordDto>,
}

/// Per-action count in the statistics breakdown
#[derive(Object, Debug)]
pub struct ActionCountDto {
    pub action: String,
    pub count: u64,
}

/// Per-table activity in the statistics breakdown
#[derive(Object, Debug)]
pub struct TableActivityDto {
    pub table_name: String,
    pub count: u64,
    pub last_activity: Option<String>,
}

/// Response model for the statistics endpoint
#[derive(Object, Debug)]
pub struct StatisticsResponse {
    pub total_count: u64,
    pub tables_tracked: u64,
    pub records_affected: u64,
    pub first_activity: Option<String>,
    pub last_activity: Option<String>,
    pub last_day_count: u64,
    pub actions: Vec<ActionCountDto>,
    pub tables: Vec<TableActivityDto>,
}

impl From<Statistics> for StatisticsResponse {
    fn from(stats: Statistics) -> Self {
        Self {
            total_count: stats.total_count,
            tables_tracked: stats.tables_tracked,
            records_affected: stats.records_affected,
            first_activity: stats.first_activity,
            last_activity: stats.last_activity,
            last_day_count: stats.last_day_count,
            actions: stats
                .actions
                .into_iter()
                .map(|a| ActionCountDto {
                    action: a.action,
                    count: a.count,
                })
                .collect(),
            tables: stats
                .tables
                .into_iter()
                .map(|t| TableActivityDto {
                    table_name: t.table_name,
                    count: t.count,
                    last_activity: t.last_activity,
                })
                .collect(),
        }
    }
}

/// Distinct filter values present in the log
#[derive(Object, Debug)]
pub struct FilterOptions {
    pub tables: Vec<String>,
    pub actions: Vec<String>,
}

/// Request body for the maintenance reset endpoint
#[derive(Object, Debug)]
pub struct ResetRequest {
    /// Copy the store file aside before clearing
    pub backup: Option<bool>,
}

/// Response model for the maintenance reset endpoint
#[derive(Object, Debug)]
pub struct ResetResponse {
    /// Records removed from the log
    pub removed: u64,

    /// Where the prior store was copied, when a backup was written
    pub backup_path: Option<String>,
}
