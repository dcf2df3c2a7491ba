use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::audit::builder::RecordBuilder;
use crate::audit::changes;
use crate::errors::internal::AuditError;
use crate::errors::InternalError;
use crate::stores::AuditStore;
use crate::types::db::audit_record;
use crate::types::internal::audit::{ActionKind, AuditEvent, SYSTEM_TABLE};
use crate::types::internal::context::RequestContext;
use crate::types::internal::snapshot::Snapshot;

/// Write side of the audit subsystem
///
/// Appends exactly one immutable record per observed mutation. The
/// recorder does not read business tables itself; callers hand it the
/// snapshots they captured around the write, so the record reflects the
/// exact values committed.
///
/// The cardinal rule on this path: an audit-side fault never reaches the
/// business caller. Every public method catches store and serialization
/// failures, reports them on the local log channel, and returns `None`.
#[derive(Clone)]
pub struct AuditRecorder {
    store: Arc<AuditStore>,
}

impl AuditRecorder {
    /// Create a new AuditRecorder writing to the given store
    pub fn new(store: Arc<AuditStore>) -> Self {
        Self { store }
    }

    /// Create a RecordBuilder for custom audit events
    pub fn builder(
        &self,
        action: ActionKind,
        table_name: impl Into<String>,
        record_key: impl Into<String>,
    ) -> RecordBuilder {
        RecordBuilder::new(self.store.clone(), action, table_name, record_key)
    }

    /// Record a business-row mutation
    ///
    /// `old_values` is the row as read just before the write (None for
    /// INSERT), `new_values` the row as written (None for DELETE). For
    /// UPDATE the field-level diff is computed and stored alongside the
    /// snapshots.
    ///
    /// Returns the appended record, or `None` when the write was
    /// swallowed per the failure policy.
    pub async fn record_mutation(
        &self,
        ctx: &RequestContext,
        action: ActionKind,
        table_name: &str,
        record_key: &str,
        old_values: Option<Snapshot>,
        new_values: Option<Snapshot>,
    ) -> Option<audit_record::Model> {
        if action.is_mutation() && old_values.is_none() && new_values.is_none() {
            let err = AuditError::MissingSnapshot {
                action: action.to_string(),
                table_name: table_name.to_string(),
                record_key: record_key.to_string(),
            };
            tracing::error!("Dropping audit event: {}", err);
            return None;
        }

        let mut event = AuditEvent::new(action, table_name, record_key);
        event.old_values = old_values;
        event.new_values = new_values;
        event.context = ctx.to_metadata();
        changes::apply_changes(&mut event);

        self.append_swallowing(event).await
    }

    /// Record a standalone transaction boundary marker
    ///
    /// Markers live under the SYSTEM table with a generated transaction
    /// key and carry no row snapshots. Callers that want paired
    /// start/finish markers should prefer [`begin_transaction`](Self::begin_transaction).
    pub async fn record_transaction_boundary(
        &self,
        ctx: &RequestContext,
        kind: ActionKind,
        description: &str,
    ) -> Option<audit_record::Model> {
        if !kind.is_transaction_marker() {
            tracing::error!("Refusing to record {} as a transaction boundary", kind);
            return None;
        }

        let transaction_id = new_transaction_id(Utc::now());
        let event = marker_event(kind, &transaction_id, ctx, description, None, None);
        self.append_swallowing(event).await
    }

    /// Open a transaction-level audit bracket
    ///
    /// Writes a TRANSACTION_START marker and returns a guard whose
    /// [`complete`](TransactionGuard::complete) and
    /// [`fail`](TransactionGuard::fail) methods write the closing marker
    /// with the elapsed duration.
    pub async fn begin_transaction(
        &self,
        ctx: &RequestContext,
        description: &str,
    ) -> TransactionGuard {
        let started_at = Utc::now();
        let transaction_id = new_transaction_id(started_at);

        let event = marker_event(
            ActionKind::TransactionStart,
            &transaction_id,
            ctx,
            description,
            None,
            None,
        );
        self.append_swallowing(event).await;

        TransactionGuard {
            recorder: self.clone(),
            ctx: ctx.clone(),
            transaction_id,
            description: description.to_string(),
            started_at,
        }
    }

    /// Append with the write-side failure policy applied
    async fn append_swallowing(&self, event: AuditEvent) -> Option<audit_record::Model> {
        let action = event.action;
        let table_name = event.table_name.clone();
        let record_key = event.record_key.clone();

        match self.store.append(event).await {
            Ok(record) => {
                tracing::info!("Audit logged: {} on {}#{}", action, table_name, record_key);
                Some(record)
            }
            Err(err) => {
                tracing::error!(
                    "Failed to log audit action {} on {}#{}: {}",
                    action,
                    table_name,
                    record_key,
                    err
                );
                None
            }
        }
    }

    /// Append without the swallow policy, for callers that need to
    /// observe audit failures (tests, maintenance tooling)
    pub async fn try_append(&self, event: AuditEvent) -> Result<audit_record::Model, InternalError> {
        self.store.append(event).await
    }
}

/// Open transaction-level audit bracket
///
/// Consumed by `complete` or `fail`; dropping the guard without calling
/// either leaves the transaction without a closing marker, which readers
/// must tolerate (markers are not assumed to come in pairs).
pub struct TransactionGuard {
    recorder: AuditRecorder,
    ctx: RequestContext,
    transaction_id: String,
    description: String,
    started_at: DateTime<Utc>,
}

impl TransactionGuard {
    pub fn transaction_id(&self) -> &str {
        &self.transaction_id
    }

    /// Write the TRANSACTION_COMPLETE marker
    pub async fn complete(self) -> Option<audit_record::Model> {
        self.finish(ActionKind::TransactionComplete, None).await
    }

    /// Write the TRANSACTION_ERROR marker with the failure reason
    pub async fn fail(self, error: &str) -> Option<audit_record::Model> {
        self.finish(ActionKind::TransactionError, Some(error.to_string()))
            .await
    }

    async fn finish(self, kind: ActionKind, error: Option<String>) -> Option<audit_record::Model> {
        let duration_seconds = (Utc::now() - self.started_at).num_milliseconds() as f64 / 1000.0;

        let event = marker_event(
            kind,
            &self.transaction_id,
            &self.ctx,
            &self.description,
            Some(duration_seconds),
            error,
        );
        self.recorder.append_swallowing(event).await
    }
}

fn new_transaction_id(started_at: DateTime<Utc>) -> String {
    format!("TXN_{}", started_at.format("%Y%m%d_%H%M%S_%f"))
}

fn marker_event(
    kind: ActionKind,
    transaction_id: &str,
    ctx: &RequestContext,
    description: &str,
    duration_seconds: Option<f64>,
    error: Option<String>,
) -> AuditEvent {
    let mut event = AuditEvent::new(kind, SYSTEM_TABLE, transaction_id);
    event.context = ctx.to_metadata();
    event
        .context
        .insert("description".to_string(), json!(description));

    if let Some(duration) = duration_seconds {
        event
            .context
            .insert("duration_seconds".to_string(), json!(duration));
    }
    if let Some(error) = error {
        event.context.insert("error".to_string(), json!(error));
    }

    event
}
