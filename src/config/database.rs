use migration::{AuditMigrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

use crate::errors::InternalError;

/// Connect to the audit database
///
/// Does NOT run migrations - call migrate_audit_database() separately.
pub async fn connect_audit_database(database_url: &str) -> Result<DatabaseConnection, InternalError> {
    let db = Database::connect(database_url)
        .await
        .map_err(|e| InternalError::database("connect_audit_database", e))?;

    tracing::debug!("Connected to audit database: {}", database_url);

    Ok(db)
}

/// Run all pending migrations on the audit database
pub async fn migrate_audit_database(db: &DatabaseConnection) -> Result<(), InternalError> {
    AuditMigrator::up(db, None)
        .await
        .map_err(|e| InternalError::database("run_audit_migrations", e))?;

    tracing::debug!("Audit database migrations completed");

    Ok(())
}
