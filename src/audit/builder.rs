use std::sync::Arc;

use serde::Serialize;

use crate::audit::changes;
use crate::errors::InternalError;
use crate::stores::AuditStore;
use crate::types::db::audit_record;
use crate::types::internal::audit::{ActionKind, AuditEvent};
use crate::types::internal::context::RequestContext;
use crate::types::internal::snapshot::Snapshot;

/// Builder for custom audit events
///
/// Fluent construction for callers that need more than the recorder's
/// fixed-shape methods: annotations, extra context fields, or snapshots
/// assembled incrementally.
///
/// # Example
/// ```no_run
/// use ledgertrail_backend::audit::AuditRecorder;
/// use ledgertrail_backend::types::internal::{ActionKind, RequestContext, Snapshot};
///
/// async fn example(recorder: &AuditRecorder, ctx: &RequestContext) {
///     recorder
///         .builder(ActionKind::Delete, "Invoices", "250089")
///         .with_context(ctx)
///         .old_values(Snapshot::new().with("payment_status", "paid"))
///         .note("removed during year-end cleanup")
///         .write()
///         .await;
/// }
/// ```
pub struct RecordBuilder {
    store: Arc<AuditStore>,
    event: AuditEvent,
}

impl RecordBuilder {
    /// Create a new RecordBuilder for the given action and business row
    pub fn new(
        store: Arc<AuditStore>,
        action: ActionKind,
        table_name: impl Into<String>,
        record_key: impl Into<String>,
    ) -> Self {
        Self {
            store,
            event: AuditEvent::new(action, table_name, record_key),
        }
    }

    /// Populate the context metadata from a RequestContext
    pub fn with_context(mut self, ctx: &RequestContext) -> Self {
        self.event.context = ctx.to_metadata();
        self
    }

    /// Set the row snapshot taken before the operation
    pub fn old_values(mut self, snapshot: Snapshot) -> Self {
        self.event.old_values = Some(snapshot);
        self
    }

    /// Set the row snapshot taken after the operation
    pub fn new_values(mut self, snapshot: Snapshot) -> Self {
        self.event.new_values = Some(snapshot);
        self
    }

    /// Attach a free-text annotation
    pub fn note(mut self, text: impl Into<String>) -> Self {
        self.event.notes = Some(text.into());
        self
    }

    /// Add an arbitrary field to the context metadata
    ///
    /// A value that fails to serialize is skipped rather than failing
    /// the build.
    pub fn add_context_field(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.event.context.insert(key.into(), json_value);
        }
        self
    }

    /// Build the audit event without writing it
    pub fn build(mut self) -> AuditEvent {
        changes::apply_changes(&mut self.event);
        self.event
    }

    /// Append the event, surfacing any failure to the caller
    pub async fn try_write(self) -> Result<audit_record::Model, InternalError> {
        let store = self.store.clone();
        let event = self.build();
        store.append(event).await
    }

    /// Append the event under the write-side failure policy: a failure
    /// is logged locally and swallowed
    pub async fn write(self) -> Option<audit_record::Model> {
        let action = self.event.action;
        let table_name = self.event.table_name.clone();
        let record_key = self.event.record_key.clone();

        match self.try_write().await {
            Ok(record) => Some(record),
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
}
