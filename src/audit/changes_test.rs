use serde_json::json;

use crate::audit::changes::{apply_changes, calculate_changes};
use crate::types::internal::audit::{ActionKind, AuditEvent};
use crate::types::internal::snapshot::Snapshot;

#[test]
fn diff_reports_only_columns_that_changed() {
    let old = Snapshot::new()
        .with("Excl", 100.0)
        .with("BTW", 21.0)
        .with("payment_status", "pending");
    let new = Snapshot::new()
        .with("Excl", 100.0)
        .with("BTW", 21.0)
        .with("payment_status", "paid");

    let changes = calculate_changes(&old, &new);

    assert_eq!(changes.len(), 1);
    assert_eq!(
        changes.get("payment_status"),
        Some(&json!({"old": "pending", "new": "paid"}))
    );
}

#[test]
fn diff_covers_columns_present_on_one_side_only() {
    let old = Snapshot::new().with("amount", 50);
    let new = Snapshot::new().with("amount", 50).with("description", "rent");

    let changes = calculate_changes(&old, &new);

    assert_eq!(changes.len(), 1);
    assert_eq!(
        changes.get("description"),
        Some(&json!({"old": null, "new": "rent"}))
    );
}

#[test]
fn identical_snapshots_produce_no_changes() {
    let snapshot = Snapshot::new().with("amount", 50);
    assert!(calculate_changes(&snapshot, &snapshot).is_empty());
}

#[test]
fn apply_changes_fills_update_events_only() {
    let mut update = AuditEvent::new(ActionKind::Update, "Invoices", "250089");
    update.old_values = Some(Snapshot::new().with("payment_status", "pending"));
    update.new_values = Some(Snapshot::new().with("payment_status", "paid"));
    apply_changes(&mut update);
    assert!(update.changes.is_some());

    let mut insert = AuditEvent::new(ActionKind::Insert, "Invoices", "250090");
    insert.new_values = Some(Snapshot::new().with("payment_status", "pending"));
    apply_changes(&mut insert);
    assert!(insert.changes.is_none());
}

#[test]
fn apply_changes_keeps_an_explicit_diff() {
    let mut event = AuditEvent::new(ActionKind::Update, "Invoices", "250089");
    event.old_values = Some(Snapshot::new().with("payment_status", "pending"));
    event.new_values = Some(Snapshot::new().with("payment_status", "paid"));

    let mut supplied = serde_json::Map::new();
    supplied.insert("payment_status".to_string(), json!({"old": "x", "new": "y"}));
    event.changes = Some(supplied.clone());

    apply_changes(&mut event);
    assert_eq!(event.changes, Some(supplied));
}
