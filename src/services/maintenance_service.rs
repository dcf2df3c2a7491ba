use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;

use crate::errors::InternalError;
use crate::stores::AuditStore;

/// Result of a full log reset
#[derive(Debug)]
pub struct ResetOutcome {
    /// Records removed from the log
    pub removed: u64,
    /// Where the prior store was copied, when a backup was requested
    /// and the store is file-backed
    pub backup_path: Option<PathBuf>,
}

/// Operator-invoked maintenance over the audit store
///
/// The reset is the single sanctioned deletion path: it clears the
/// entire log in one action and restarts the id sequence. `db_file` is
/// the SQLite file behind the store, when there is one; an in-memory
/// store cannot be backed up and a backup request against it is a no-op.
pub struct MaintenanceService {
    store: Arc<AuditStore>,
    db_file: Option<PathBuf>,
}

impl MaintenanceService {
    /// Create a new MaintenanceService
    pub fn new(store: Arc<AuditStore>, db_file: Option<PathBuf>) -> Self {
        Self { store, db_file }
    }

    /// Clear the entire log, optionally snapshotting the store file first
    ///
    /// Returns the number of records removed and the backup location, if
    /// one was written.
    pub async fn reset(&self, backup: bool) -> Result<ResetOutcome, InternalError> {
        let backup_path = if backup { self.backup_store()? } else { None };

        let removed = self.store.reset().await?;
        tracing::info!("Audit log cleared: {} records removed", removed);

        Ok(ResetOutcome {
            removed,
            backup_path,
        })
    }

    /// Copy the store file to a timestamped sibling
    fn backup_store(&self) -> Result<Option<PathBuf>, InternalError> {
        let Some(source) = &self.db_file else {
            tracing::warn!("Backup requested but the audit store is not file-backed");
            return Ok(None);
        };

        if !source.exists() {
            tracing::warn!("Backup skipped: {} does not exist yet", source.display());
            return Ok(None);
        }

        let destination = backup_destination(source, Utc::now());
        std::fs::copy(source, &destination).map_err(|e| InternalError::io("backup_audit_store", e))?;

        tracing::info!("Audit store backed up to {}", destination.display());
        Ok(Some(destination))
    }
}

fn backup_destination(source: &Path, at: chrono::DateTime<Utc>) -> PathBuf {
    let stamp = at.format("%Y%m%d_%H%M%S");
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "audit".to_string());

    source.with_file_name(format!("{}_backup_{}.db", stem, stamp))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backup_destination_keeps_directory_and_stem() {
        let at = chrono::DateTime::parse_from_rfc3339("2026-03-01T10:20:30Z")
            .unwrap()
            .with_timezone(&Utc);

        let dest = backup_destination(Path::new("/data/audit_tracker.db"), at);
        assert_eq!(
            dest,
            PathBuf::from("/data/audit_tracker_backup_20260301_102030.db")
        );
    }
}
