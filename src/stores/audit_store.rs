use chrono::{Duration, Utc};
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait, Order,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

use crate::errors::internal::AuditError;
use crate::errors::InternalError;
use crate::types::db::audit_record::{self, Column, Entity as AuditLog};
use crate::types::internal::audit::{format_timestamp, now_timestamp, AuditEvent};
use crate::types::internal::query::{LogQuery, SortOrder};

/// Repository for the append-only audit log
///
/// The only write paths are [`append`](Self::append) and the operator
/// [`reset`](Self::reset); no method updates or deletes an individual
/// record.
pub struct AuditStore {
    db: DatabaseConnection,
}

impl AuditStore {
    /// Create a new AuditStore with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Append one audit event to the log
    ///
    /// Serializes the snapshots and context to JSON, stamps the capture
    /// timestamp, and inserts the row. The store assigns the id via the
    /// table's autoincrement, so concurrent writers receive strictly
    /// increasing, non-colliding ids.
    ///
    /// # Errors
    ///
    /// Returns `InternalError::Audit` if serialization or the insert
    /// fails. Callers on the write path (the recorder) catch and swallow
    /// this; it must never propagate into a business operation.
    pub async fn append(&self, event: AuditEvent) -> Result<audit_record::Model, InternalError> {
        let old_values = match &event.old_values {
            Some(snapshot) => Some(snapshot.to_json().map_err(|e| {
                AuditError::WriteFailed(format!("Failed to serialize old values: {}", e))
            })?),
            None => None,
        };

        let new_values = match &event.new_values {
            Some(snapshot) => Some(snapshot.to_json().map_err(|e| {
                AuditError::WriteFailed(format!("Failed to serialize new values: {}", e))
            })?),
            None => None,
        };

        let changes = match &event.changes {
            Some(changes) => Some(serde_json::to_string(changes).map_err(|e| {
                AuditError::WriteFailed(format!("Failed to serialize changes: {}", e))
            })?),
            None => None,
        };

        let context = if event.context.is_empty() {
            None
        } else {
            Some(serde_json::to_string(&event.context).map_err(|e| {
                AuditError::WriteFailed(format!("Failed to serialize context: {}", e))
            })?)
        };

        let row = audit_record::ActiveModel {
            id: sea_orm::ActiveValue::NotSet, // Let auto-increment handle this
            timestamp: Set(now_timestamp()),
            action: Set(event.action.to_string()),
            table_name: Set(event.table_name),
            record_key: Set(event.record_key),
            changes: Set(changes),
            old_values: Set(old_values),
            new_values: Set(new_values),
            context: Set(context),
            notes: Set(event.notes),
        };

        row.insert(&self.db)
            .await
            .map_err(|e| AuditError::WriteFailed(e.to_string()).into())
    }

    /// One page of records matching the filter, plus the pre-pagination
    /// match count
    pub async fn find_page(
        &self,
        query: &LogQuery,
    ) -> Result<(Vec<audit_record::Model>, u64), InternalError> {
        let condition = Self::filter_condition(query);

        let total = AuditLog::find()
            .filter(condition.clone())
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("count_audit_log", e))?;

        let order = match query.order {
            SortOrder::NewestFirst => Order::Desc,
            SortOrder::OldestFirst => Order::Asc,
        };

        let records = AuditLog::find()
            .filter(condition)
            .order_by(Column::Id, order)
            .offset(query.offset())
            .limit(query.page_size)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_audit_log", e))?;

        Ok((records, total))
    }

    /// Complete history of one business row, oldest first
    pub async fn history_for(
        &self,
        table_name: &str,
        record_key: &str,
    ) -> Result<Vec<audit_record::Model>, InternalError> {
        AuditLog::find()
            .filter(Column::TableName.eq(table_name))
            .filter(Column::RecordKey.eq(record_key))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("record_history", e))
    }

    /// The newest records in the log
    pub async fn recent(&self, limit: u64) -> Result<Vec<audit_record::Model>, InternalError> {
        AuditLog::find()
            .order_by_desc(Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("recent_audit_log", e))
    }

    /// Count of records matching the filter
    pub async fn count(&self, query: &LogQuery) -> Result<u64, InternalError> {
        AuditLog::find()
            .filter(Self::filter_condition(query))
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("count_audit_log", e))
    }

    /// Count of matching records captured within the last day
    pub async fn count_last_day(&self, query: &LogQuery) -> Result<u64, InternalError> {
        let cutoff = format_timestamp(Utc::now() - Duration::days(1));

        AuditLog::find()
            .filter(Self::filter_condition(query))
            .filter(Column::Timestamp.gte(cutoff))
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("count_recent_activity", e))
    }

    /// Matching record counts grouped by action
    pub async fn count_by_action(
        &self,
        query: &LogQuery,
    ) -> Result<Vec<(String, i64)>, InternalError> {
        AuditLog::find()
            .select_only()
            .column(Column::Action)
            .column_as(Column::Id.count(), "count")
            .filter(Self::filter_condition(query))
            .group_by(Column::Action)
            .into_tuple::<(String, i64)>()
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("count_by_action", e))
    }

    /// Matching record counts and last activity grouped by table
    pub async fn count_by_table(
        &self,
        query: &LogQuery,
    ) -> Result<Vec<(String, i64, Option<String>)>, InternalError> {
        AuditLog::find()
            .select_only()
            .column(Column::TableName)
            .column_as(Column::Id.count(), "count")
            .column_as(Column::Timestamp.max(), "last_activity")
            .filter(Self::filter_condition(query))
            .group_by(Column::TableName)
            .into_tuple::<(String, i64, Option<String>)>()
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("count_by_table", e))
    }

    /// Earliest and latest capture timestamps in the matching set
    pub async fn timestamp_range(
        &self,
        query: &LogQuery,
    ) -> Result<(Option<String>, Option<String>), InternalError> {
        let row: Option<(Option<String>, Option<String>)> = AuditLog::find()
            .select_only()
            .column_as(Column::Timestamp.min(), "first_activity")
            .column_as(Column::Timestamp.max(), "last_activity")
            .filter(Self::filter_condition(query))
            .into_tuple()
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("timestamp_range", e))?;

        Ok(row.unwrap_or((None, None)))
    }

    /// Number of distinct business rows in the matching set
    pub async fn distinct_record_count(&self, query: &LogQuery) -> Result<u64, InternalError> {
        AuditLog::find()
            .select_only()
            .column(Column::TableName)
            .column(Column::RecordKey)
            .distinct()
            .filter(Self::filter_condition(query))
            .count(&self.db)
            .await
            .map_err(|e| InternalError::database("distinct_record_count", e))
    }

    /// Distinct table names present in the log, for filter dropdowns
    pub async fn distinct_tables(&self) -> Result<Vec<String>, InternalError> {
        AuditLog::find()
            .select_only()
            .column(Column::TableName)
            .distinct()
            .order_by_asc(Column::TableName)
            .into_tuple::<String>()
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("distinct_tables", e))
    }

    /// Distinct action kinds present in the log, for filter dropdowns
    pub async fn distinct_actions(&self) -> Result<Vec<String>, InternalError> {
        AuditLog::find()
            .select_only()
            .column(Column::Action)
            .distinct()
            .order_by_asc(Column::Action)
            .into_tuple::<String>()
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("distinct_actions", e))
    }

    /// Clear the entire log and restart the id sequence
    ///
    /// This is the only deletion path and it is all-or-nothing: there is
    /// no per-record removal. Returns the number of records removed.
    pub async fn reset(&self) -> Result<u64, InternalError> {
        let result = AuditLog::delete_many()
            .exec(&self.db)
            .await
            .map_err(|e| InternalError::database("clear_audit_log", e))?;

        // sqlite_sequence only exists once the first insert has happened
        if let Err(e) = self
            .db
            .execute_unprepared("DELETE FROM sqlite_sequence WHERE name = 'audit_log'")
            .await
        {
            tracing::debug!("Autoincrement sequence reset skipped: {}", e);
        }

        self.db
            .execute_unprepared("VACUUM")
            .await
            .map_err(|e| InternalError::database("vacuum_audit_log", e))?;

        Ok(result.rows_affected)
    }

    /// Build the conjunctive filter condition for a query
    ///
    /// Every present field becomes an AND predicate. A table name that
    /// never occurs in the log is not an error; it matches zero rows.
    fn filter_condition(query: &LogQuery) -> Condition {
        let mut condition = Condition::all();

        if let Some(table_name) = &query.table_name {
            condition = condition.add(Column::TableName.eq(table_name.clone()));
        }

        if let Some(action) = query.action {
            condition = condition.add(Column::Action.eq(action.as_str()));
        }

        if let Some(record_key) = &query.record_key {
            condition = condition.add(Column::RecordKey.eq(record_key.clone()));
        }

        if let Some(from) = query.from {
            condition = condition.add(Column::Timestamp.gte(format_timestamp(from)));
        }

        if let Some(to) = query.to {
            condition = condition.add(Column::Timestamp.lte(format_timestamp(to)));
        }

        if let Some(needle) = &query.search {
            condition = condition.add(
                Condition::any()
                    .add(Column::OldValues.contains(needle.clone()))
                    .add(Column::NewValues.contains(needle.clone())),
            );
        }

        condition
    }
}

impl std::fmt::Debug for AuditStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditStore")
            .field("db", &"<connection>")
            .finish()
    }
}
