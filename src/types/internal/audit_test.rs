use serde_json::{json, Value};

use crate::types::internal::audit::ActionKind;
use crate::types::internal::snapshot::Snapshot;

#[test]
fn action_kind_round_trips_through_storage_form() {
    let kinds = [
        ActionKind::Insert,
        ActionKind::Update,
        ActionKind::Delete,
        ActionKind::Select,
        ActionKind::TransactionStart,
        ActionKind::TransactionComplete,
        ActionKind::TransactionError,
    ];

    for kind in kinds {
        let parsed: ActionKind = kind.as_str().parse().expect("storage form should parse");
        assert_eq!(parsed, kind);
    }
}

#[test]
fn unknown_action_kind_is_rejected() {
    assert!("TRUNCATE".parse::<ActionKind>().is_err());
    assert!("insert".parse::<ActionKind>().is_err());
}

#[test]
fn mutation_actions_require_snapshots_markers_do_not() {
    assert!(ActionKind::Insert.is_mutation());
    assert!(ActionKind::Update.is_mutation());
    assert!(ActionKind::Delete.is_mutation());
    assert!(!ActionKind::Select.is_mutation());
    assert!(!ActionKind::TransactionStart.is_mutation());

    assert!(ActionKind::TransactionError.is_transaction_marker());
    assert!(!ActionKind::Delete.is_transaction_marker());
}

#[test]
fn snapshot_lookup_is_safe_for_missing_columns() {
    let snapshot = Snapshot::new()
        .with("Excl", 100.0)
        .with("payment_status", "pending");

    assert_eq!(snapshot.get("payment_status"), Some(&json!("pending")));
    assert_eq!(snapshot.get("no_such_column"), None);
    assert_eq!(
        snapshot.get_or("no_such_column", &Value::Null),
        &Value::Null
    );
}

#[test]
fn snapshot_passes_through_arbitrary_json_values() {
    let snapshot = Snapshot::from(json!({
        "Excl": 100.0,
        "BTW": 21.0,
        "tags": ["q1", "urgent"],
        "meta": {"source": "import"},
        "cleared": null
    }));

    assert_eq!(snapshot.len(), 5);
    assert_eq!(snapshot.get("tags"), Some(&json!(["q1", "urgent"])));
    assert_eq!(snapshot.get("cleared"), Some(&Value::Null));
}

#[test]
fn non_object_value_is_wrapped_not_rejected() {
    let snapshot = Snapshot::from(json!(42));
    assert_eq!(snapshot.get("value"), Some(&json!(42)));
}
