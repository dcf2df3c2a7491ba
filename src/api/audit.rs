use std::sync::Arc;

use poem_openapi::{
    param::{Path, Query},
    payload::Json,
    OpenApi, Tags,
};

use crate::errors::api::AuditApiError;
use crate::errors::InternalError;
use crate::services::{AuditQueryService, MaintenanceService};
use crate::types::dto::audit::{
    AuditLogPage, AuditRecordDto, FilterOptions, RecordHistory, ResetRequest, ResetResponse,
    StatisticsResponse,
};
use crate::types::internal::query::{LogQuery, LogQueryParams};

/// Audit viewer API endpoints
pub struct AuditApi {
    query_service: Arc<AuditQueryService>,
    maintenance_service: Arc<MaintenanceService>,
}

impl AuditApi {
    /// Create a new AuditApi over the query and maintenance services
    pub fn new(
        query_service: Arc<AuditQueryService>,
        maintenance_service: Arc<MaintenanceService>,
    ) -> Self {
        Self {
            query_service,
            maintenance_service,
        }
    }
}

/// API tags for audit endpoints
#[derive(Tags)]
enum AuditTags {
    /// Audit log queries
    Audit,
    /// Operator maintenance
    Maintenance,
}

#[OpenApi]
impl AuditApi {
    /// List audit records
    ///
    /// Applies every present filter conjunctively and returns one page of
    /// records, newest first, with server-computed pagination metadata.
    #[oai(path = "/audit/logs", method = "get", tag = "AuditTags::Audit")]
    #[allow(clippy::too_many_arguments)]
    async fn list_logs(
        &self,
        table: Query<Option<String>>,
        action: Query<Option<String>>,
        record_id: Query<Option<String>>,
        date_from: Query<Option<String>>,
        date_to: Query<Option<String>>,
        search: Query<Option<String>>,
        page: Query<Option<i64>>,
        per_page: Query<Option<i64>>,
        order: Query<Option<String>>,
    ) -> Result<Json<AuditLogPage>, AuditApiError> {
        let query = LogQuery::from_params(LogQueryParams {
            table_name: table.0,
            action: action.0,
            record_key: record_id.0,
            date_from: date_from.0,
            date_to: date_to.0,
            search: search.0,
            page: page.0,
            page_size: per_page.0,
            order: order.0,
        })
        .map_err(InternalError::from)?;

        let listing = self.query_service.list(&query).await?;
        Ok(Json(listing.into()))
    }

    /// Complete history for a business row
    ///
    /// Returns every record for the `(table_name, record_key)` pair,
    /// oldest first, reconstructing the row's lifeline.
    #[oai(
        path = "/audit/records/:table_name/:record_key",
        method = "get",
        tag = "AuditTags::Audit"
    )]
    async fn record_history(
        &self,
        table_name: Path<String>,
        record_key: Path<String>,
    ) -> Result<Json<RecordHistory>, AuditApiError> {
        let history = self
            .query_service
            .history_for(&table_name.0, &record_key.0)
            .await?;

        Ok(Json(RecordHistory {
            table_name: table_name.0,
            record_key: record_key.0,
            history: history.into_iter().map(Into::into).collect(),
        }))
    }

    /// Aggregate statistics
    ///
    /// Counts grouped by action and by table over the filtered set, plus
    /// the observed timestamp range, for the dashboard.
    #[oai(path = "/audit/statistics", method = "get", tag = "AuditTags::Audit")]
    async fn statistics(
        &self,
        table: Query<Option<String>>,
        action: Query<Option<String>>,
        record_id: Query<Option<String>>,
        date_from: Query<Option<String>>,
        date_to: Query<Option<String>>,
        search: Query<Option<String>>,
    ) -> Result<Json<StatisticsResponse>, AuditApiError> {
        let query = LogQuery::from_params(LogQueryParams {
            table_name: table.0,
            action: action.0,
            record_key: record_id.0,
            date_from: date_from.0,
            date_to: date_to.0,
            search: search.0,
            ..LogQueryParams::default()
        })
        .map_err(InternalError::from)?;

        let stats = self.query_service.statistics(&query).await?;
        Ok(Json(stats.into()))
    }

    /// Most recent records
    ///
    /// Newest records for the dashboard feed; the limit is clamped to
    /// the listing maximum.
    #[oai(path = "/audit/recent/:limit", method = "get", tag = "AuditTags::Audit")]
    async fn recent(&self, limit: Path<u64>) -> Result<Json<Vec<AuditRecordDto>>, AuditApiError> {
        let records = self.query_service.recent(limit.0).await?;
        Ok(Json(records.into_iter().map(Into::into).collect()))
    }

    /// Distinct filter values
    ///
    /// Table names and action kinds present in the log, for the viewer's
    /// filter dropdowns.
    #[oai(path = "/audit/filters", method = "get", tag = "AuditTags::Audit")]
    async fn filter_options(&self) -> Result<Json<FilterOptions>, AuditApiError> {
        let (tables, actions) = self.query_service.filter_options().await?;
        Ok(Json(FilterOptions { tables, actions }))
    }

    /// Reset the audit log
    ///
    /// Operator maintenance: clears the entire log, optionally copying
    /// the store file aside first. Returns the number of records removed.
    #[oai(
        path = "/audit/maintenance/reset",
        method = "post",
        tag = "AuditTags::Maintenance"
    )]
    async fn reset(&self, body: Json<ResetRequest>) -> Result<Json<ResetResponse>, AuditApiError> {
        let backup = body.0.backup.unwrap_or(false);
        let outcome = self.maintenance_service.reset(backup).await?;

        Ok(Json(ResetResponse {
            removed: outcome.removed,
            backup_path: outcome
                .backup_path
                .map(|path| path.display().to_string()),
        }))
    }
}
