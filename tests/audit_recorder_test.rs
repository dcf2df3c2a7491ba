mod common;

use common::{create_failing_audit_store, invoice_snapshot, setup_audit_stack};

use ledgertrail_backend::audit::AuditRecorder;
use ledgertrail_backend::types::internal::{ActionKind, RequestContext, Snapshot, SYSTEM_TABLE};

#[tokio::test]
async fn record_mutation_appends_exactly_one_record() {
    let (recorder, query_service) = setup_audit_stack().await;
    let ctx = RequestContext::for_system("invoice_create");

    let record = recorder
        .record_mutation(
            &ctx,
            ActionKind::Insert,
            "Invoices",
            "250089",
            None,
            Some(invoice_snapshot("pending")),
        )
        .await
        .expect("append should succeed");

    assert!(record.id >= 1);
    assert_eq!(record.action, "INSERT");
    assert_eq!(record.table_name, "Invoices");
    assert_eq!(record.record_key, "250089");
    assert!(record.old_values.is_none());
    assert!(record.new_values.is_some());

    let context: serde_json::Value =
        serde_json::from_str(record.context.as_deref().unwrap()).unwrap();
    assert_eq!(context["actor"], "system:invoice_create");

    let history = query_service.history_for("Invoices", "250089").await.unwrap();
    assert_eq!(history.len(), 1);
}

#[tokio::test]
async fn sequential_records_get_strictly_increasing_ids() {
    let (recorder, _) = setup_audit_stack().await;
    let ctx = RequestContext::for_system("withdraw_import");

    let mut previous_id = 0;
    for n in 0..5 {
        let record = recorder
            .record_mutation(
                &ctx,
                ActionKind::Insert,
                "Withdraw",
                &format!("W-{}", n),
                None,
                Some(Snapshot::new().with("Amount", n)),
            )
            .await
            .expect("append should succeed");

        assert!(record.id > previous_id);
        previous_id = record.id;
    }
}

#[tokio::test]
async fn update_carries_a_field_level_diff() {
    let (recorder, _) = setup_audit_stack().await;
    let ctx = RequestContext::for_system("invoice_update");

    let record = recorder
        .record_mutation(
            &ctx,
            ActionKind::Update,
            "Invoices",
            "250089",
            Some(invoice_snapshot("pending")),
            Some(invoice_snapshot("paid")),
        )
        .await
        .expect("append should succeed");

    let changes: serde_json::Value =
        serde_json::from_str(record.changes.as_deref().expect("update should carry changes"))
            .unwrap();

    assert_eq!(changes["payment_status"]["old"], "pending");
    assert_eq!(changes["payment_status"]["new"], "paid");
    // Unchanged columns do not appear in the diff
    assert!(changes.get("Excl").is_none());
}

#[tokio::test]
async fn mutation_without_any_snapshot_is_dropped() {
    let (recorder, query_service) = setup_audit_stack().await;
    let ctx = RequestContext::for_system("invoice_delete");

    let record = recorder
        .record_mutation(&ctx, ActionKind::Delete, "Invoices", "250089", None, None)
        .await;

    assert!(record.is_none());

    let history = query_service.history_for("Invoices", "250089").await.unwrap();
    assert!(history.is_empty());
}

#[tokio::test]
async fn store_failure_never_escapes_the_recorder() {
    // Schema was never migrated, so every append fails at the store
    let recorder = AuditRecorder::new(create_failing_audit_store().await);
    let ctx = RequestContext::for_system("invoice_create");

    let record = recorder
        .record_mutation(
            &ctx,
            ActionKind::Insert,
            "Invoices",
            "250089",
            None,
            Some(invoice_snapshot("pending")),
        )
        .await;

    // The call returns normally; the business operation it was invoked
    // from is unaffected
    assert!(record.is_none());

    let marker = recorder
        .record_transaction_boundary(&ctx, ActionKind::TransactionStart, "bulk import")
        .await;
    assert!(marker.is_none());
}

#[tokio::test]
async fn existing_records_survive_later_writes_unchanged() {
    let (recorder, query_service) = setup_audit_stack().await;
    let ctx = RequestContext::for_system("invoice_create");

    let first = recorder
        .record_mutation(
            &ctx,
            ActionKind::Insert,
            "Invoices",
            "250089",
            None,
            Some(invoice_snapshot("pending")),
        )
        .await
        .unwrap();

    recorder
        .record_mutation(
            &ctx,
            ActionKind::Update,
            "Invoices",
            "250089",
            Some(invoice_snapshot("pending")),
            Some(invoice_snapshot("paid")),
        )
        .await
        .unwrap();

    let history = query_service.history_for("Invoices", "250089").await.unwrap();
    assert_eq!(history.len(), 2);
    // The first record reads back exactly as it was appended
    assert_eq!(history[0], first);
}

#[tokio::test]
async fn transaction_guard_writes_paired_markers() {
    let (recorder, query_service) = setup_audit_stack().await;
    let ctx = RequestContext::for_system("quarterly_rollover");

    let guard = recorder.begin_transaction(&ctx, "quarterly rollover").await;
    let transaction_id = guard.transaction_id().to_string();
    let closing = guard.complete().await.expect("marker should be written");

    assert_eq!(closing.action, "TRANSACTION_COMPLETE");
    assert_eq!(closing.table_name, SYSTEM_TABLE);
    assert_eq!(closing.record_key, transaction_id);

    let context: serde_json::Value =
        serde_json::from_str(closing.context.as_deref().unwrap()).unwrap();
    assert_eq!(context["description"], "quarterly rollover");
    assert!(context["duration_seconds"].is_number());

    let markers = query_service
        .history_for(SYSTEM_TABLE, &transaction_id)
        .await
        .unwrap();
    assert_eq!(markers.len(), 2);
    assert_eq!(markers[0].action, "TRANSACTION_START");
    assert_eq!(markers[1].action, "TRANSACTION_COMPLETE");
    // Markers carry no row snapshots
    assert!(markers.iter().all(|m| m.old_values.is_none() && m.new_values.is_none()));
}

#[tokio::test]
async fn failed_transaction_records_the_error() {
    let (recorder, _) = setup_audit_stack().await;
    let ctx = RequestContext::for_system("excel_import");

    let guard = recorder.begin_transaction(&ctx, "excel import").await;
    let closing = guard.fail("sheet missing required column").await.unwrap();

    assert_eq!(closing.action, "TRANSACTION_ERROR");

    let context: serde_json::Value =
        serde_json::from_str(closing.context.as_deref().unwrap()).unwrap();
    assert_eq!(context["error"], "sheet missing required column");
}

#[tokio::test]
async fn boundary_recording_rejects_non_marker_kinds() {
    let (recorder, query_service) = setup_audit_stack().await;
    let ctx = RequestContext::for_system("misuse");

    let record = recorder
        .record_transaction_boundary(&ctx, ActionKind::Insert, "not a marker")
        .await;

    assert!(record.is_none());
    assert!(query_service.recent(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn builder_composes_custom_events() {
    let (recorder, _) = setup_audit_stack().await;
    let ctx = RequestContext::for_cli("debt_cleanup");

    let record = recorder
        .builder(ActionKind::Delete, "DebtRegister", "D-17")
        .with_context(&ctx)
        .old_values(Snapshot::new().with("Amount", 250.0).with("Kind", "BTW"))
        .note("removed during year-end cleanup")
        .add_context_field("batch", 3)
        .try_write()
        .await
        .expect("append should succeed");

    assert_eq!(record.action, "DELETE");
    assert_eq!(record.notes.as_deref(), Some("removed during year-end cleanup"));

    let context: serde_json::Value =
        serde_json::from_str(record.context.as_deref().unwrap()).unwrap();
    assert_eq!(context["actor"], "cli:debt_cleanup");
    assert_eq!(context["batch"], 3);
}
