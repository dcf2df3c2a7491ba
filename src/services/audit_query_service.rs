use std::sync::Arc;

use crate::errors::InternalError;
use crate::stores::AuditStore;
use crate::types::db::audit_record;
use crate::types::internal::query::{LogQuery, PageInfo, MAX_PAGE_SIZE};
use crate::types::internal::stats::{ActionCount, Statistics, TableActivity};

/// One page of a filtered listing, with server-computed pagination
#[derive(Debug)]
pub struct ListPage {
    pub records: Vec<audit_record::Model>,
    pub pagination: PageInfo,
}

/// Read side of the audit subsystem
///
/// A pure query path over the append-only store: filtered listings,
/// per-record history, and aggregate statistics. Holds no state of its
/// own.
pub struct AuditQueryService {
    store: Arc<AuditStore>,
}

impl AuditQueryService {
    /// Create a new AuditQueryService over the given store
    pub fn new(store: Arc<AuditStore>) -> Self {
        Self { store }
    }

    /// Filtered, paginated listing
    ///
    /// Results are newest-first unless the query says otherwise. A page
    /// past the end of the match set yields an empty record list with
    /// intact pagination metadata, not an error.
    ///
    /// # Errors
    ///
    /// `InternalError::Validation` for a malformed query;
    /// `InternalError::Database` when the store cannot be read.
    pub async fn list(&self, query: &LogQuery) -> Result<ListPage, InternalError> {
        query.validate()?;

        let (records, total_count) = self.store.find_page(query).await?;

        Ok(ListPage {
            records,
            pagination: PageInfo::compute(total_count, query.page, query.page_size),
        })
    }

    /// Complete history of one business row, oldest first
    ///
    /// Reconstructs the row's lifeline: creation, each update, and the
    /// eventual delete if any. A key that was never audited yields an
    /// empty history.
    pub async fn history_for(
        &self,
        table_name: &str,
        record_key: &str,
    ) -> Result<Vec<audit_record::Model>, InternalError> {
        self.store.history_for(table_name, record_key).await
    }

    /// Aggregate statistics over the filtered set
    pub async fn statistics(&self, query: &LogQuery) -> Result<Statistics, InternalError> {
        query.validate()?;

        let total_count = self.store.count(query).await?;

        let mut actions: Vec<ActionCount> = self
            .store
            .count_by_action(query)
            .await?
            .into_iter()
            .map(|(action, count)| ActionCount {
                action,
                count: count as u64,
            })
            .collect();
        actions.sort_by(|a, b| b.count.cmp(&a.count));

        let mut tables: Vec<TableActivity> = self
            .store
            .count_by_table(query)
            .await?
            .into_iter()
            .map(|(table_name, count, last_activity)| TableActivity {
                table_name,
                count: count as u64,
                last_activity,
            })
            .collect();
        tables.sort_by(|a, b| b.count.cmp(&a.count));

        let (first_activity, last_activity) = self.store.timestamp_range(query).await?;
        let records_affected = self.store.distinct_record_count(query).await?;
        let last_day_count = self.store.count_last_day(query).await?;
        let tables_tracked = tables.len() as u64;

        Ok(Statistics {
            total_count,
            tables_tracked,
            records_affected,
            first_activity,
            last_activity,
            last_day_count,
            actions,
            tables,
        })
    }

    /// The newest records, for the dashboard feed
    ///
    /// The limit is clamped to the listing maximum rather than rejected.
    pub async fn recent(&self, limit: u64) -> Result<Vec<audit_record::Model>, InternalError> {
        let limit = limit.clamp(1, MAX_PAGE_SIZE);
        self.store.recent(limit).await
    }

    /// Distinct table names and action kinds present in the log, for
    /// the viewer's filter dropdowns
    pub async fn filter_options(&self) -> Result<(Vec<String>, Vec<String>), InternalError> {
        let tables = self.store.distinct_tables().await?;
        let actions = self.store.distinct_actions().await?;
        Ok((tables, actions))
    }
}
