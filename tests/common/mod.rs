// Common test utilities for integration tests
// Not every test binary uses every helper
#![allow(dead_code)]

use std::sync::Arc;

use migration::{AuditMigrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

use ledgertrail_backend::audit::AuditRecorder;
use ledgertrail_backend::services::AuditQueryService;
use ledgertrail_backend::stores::AuditStore;
use ledgertrail_backend::types::internal::Snapshot;

/// Creates a test audit database with migrations applied
pub async fn setup_test_audit_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create audit database");

    AuditMigrator::up(&db, None)
        .await
        .expect("Failed to run audit migrations");

    db
}

/// Creates a test audit store
pub async fn create_test_audit_store() -> Arc<AuditStore> {
    Arc::new(AuditStore::new(setup_test_audit_db().await))
}

/// Creates a recorder and query service sharing one store
pub async fn setup_audit_stack() -> (AuditRecorder, AuditQueryService) {
    let store = create_test_audit_store().await;
    let recorder = AuditRecorder::new(store.clone());
    let query_service = AuditQueryService::new(store);
    (recorder, query_service)
}

/// Store over a connection whose schema was never migrated
///
/// Every write against it fails, which is exactly what the write
/// isolation tests need.
pub async fn create_failing_audit_store() -> Arc<AuditStore> {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create database");

    Arc::new(AuditStore::new(db))
}

/// Invoice row snapshot used across scenarios
pub fn invoice_snapshot(payment_status: &str) -> Snapshot {
    Snapshot::new()
        .with("Excl", 100.0)
        .with("BTW", 21.0)
        .with("Incl", 121.0)
        .with("payment_status", payment_status)
}
