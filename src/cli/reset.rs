// Audit log maintenance commands
// Mirrors the maintenance HTTP endpoint for operators working on the host

use std::io::{self, Write};

use crate::services::{AuditQueryService, MaintenanceService};
use crate::types::internal::query::LogQuery;

/// Print current audit log statistics
pub async fn show_statistics(
    query_service: &AuditQueryService,
) -> Result<(), Box<dyn std::error::Error>> {
    let stats = query_service.statistics(&LogQuery::new()).await?;

    println!("📊 AUDIT LOG STATISTICS");
    println!("{}", "=".repeat(30));
    println!("Total records: {}", stats.total_count);

    if let (Some(first), Some(last)) = (&stats.first_activity, &stats.last_activity) {
        println!("Date range: {} to {}", first, last);
    }

    if !stats.actions.is_empty() {
        println!();
        println!("Actions:");
        for entry in &stats.actions {
            println!("   {}: {}", entry.action, entry.count);
        }
    }

    if !stats.tables.is_empty() {
        println!();
        println!("Tables:");
        for entry in &stats.tables {
            println!("   {}: {}", entry.table_name, entry.count);
        }
    }

    Ok(())
}

/// Clear the audit log after confirmation
///
/// With `backup` the store file is copied aside first; `force` skips the
/// confirmation prompt for scripted use.
pub async fn reset_log(
    query_service: &AuditQueryService,
    maintenance_service: &MaintenanceService,
    backup: bool,
    force: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let stats = query_service.statistics(&LogQuery::new()).await?;

    if stats.total_count == 0 {
        println!("✅ No audit logs to clear - the log is already empty");
        return Ok(());
    }

    println!(
        "⚠️  WARNING: This will permanently delete all {} audit records!",
        stats.total_count
    );
    println!("   This action cannot be undone.");

    if !force && !confirm()? {
        println!("❌ Operation cancelled");
        return Ok(());
    }

    let outcome = maintenance_service.reset(backup).await?;

    if let Some(path) = &outcome.backup_path {
        println!("💾 Backup created: {}", path.display());
    }
    println!("✅ Audit log cleared: {} records removed", outcome.removed);
    println!("   New records will start from a fresh id sequence");

    Ok(())
}

fn confirm() -> io::Result<bool> {
    print!("   Are you sure you want to clear all audit logs? (yes/no): ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;

    Ok(matches!(line.trim().to_lowercase().as_str(), "yes" | "y"))
}
