use serde_json::{json, Map, Value};

use crate::types::internal::audit::{ActionKind, AuditEvent};
use crate::types::internal::snapshot::Snapshot;

/// Field-level diff between two row snapshots
///
/// Returns `{column: {"old": before, "new": after}}` for every column
/// whose value differs, including columns present on only one side
/// (the missing side appears as null).
pub fn calculate_changes(old_values: &Snapshot, new_values: &Snapshot) -> Map<String, Value> {
    let mut changes = Map::new();
    let null = Value::Null;

    let mut columns: Vec<&String> = old_values.columns().chain(new_values.columns()).collect();
    columns.sort();
    columns.dedup();

    for column in columns {
        let old = old_values.get_or(column, &null);
        let new = new_values.get_or(column, &null);

        if old != new {
            changes.insert(column.clone(), json!({ "old": old, "new": new }));
        }
    }

    changes
}

/// Fill in the changes field of an UPDATE event when both snapshots are
/// present and no diff was supplied explicitly
pub fn apply_changes(event: &mut AuditEvent) {
    if event.action != ActionKind::Update || event.changes.is_some() {
        return;
    }

    if let (Some(old), Some(new)) = (&event.old_values, &event.new_values) {
        let changes = calculate_changes(old, new);
        if !changes.is_empty() {
            event.changes = Some(changes);
        }
    }
}
