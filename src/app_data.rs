use std::path::PathBuf;
use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::audit::AuditRecorder;
use crate::services::{AuditQueryService, MaintenanceService};
use crate::stores::AuditStore;

/// Centralized application data following the main-owned stores pattern
///
/// All dependencies are created once in main.rs and shared from here.
/// The store is the single injected collaborator behind both the
/// recorder and the query service; nothing holds it through a global.
pub struct AppData {
    pub db: DatabaseConnection,
    pub audit_store: Arc<AuditStore>,
    pub recorder: AuditRecorder,
    pub query_service: Arc<AuditQueryService>,
    pub maintenance_service: Arc<MaintenanceService>,
}

impl AppData {
    /// Initialize all application data
    ///
    /// The database connection should be migrated before calling this.
    /// `db_file` is the SQLite file behind the store when it is
    /// file-backed, used by maintenance backups.
    pub fn init(db: DatabaseConnection, db_file: Option<PathBuf>) -> Self {
        tracing::debug!("Creating stores...");
        let audit_store = Arc::new(AuditStore::new(db.clone()));

        let recorder = AuditRecorder::new(audit_store.clone());
        let query_service = Arc::new(AuditQueryService::new(audit_store.clone()));
        let maintenance_service = Arc::new(MaintenanceService::new(audit_store.clone(), db_file));
        tracing::debug!("Stores created");

        Self {
            db,
            audit_store,
            recorder,
            query_service,
            maintenance_service,
        }
    }
}
