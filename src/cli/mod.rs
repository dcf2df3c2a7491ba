// CLI module for operator maintenance of the audit log

pub mod reset;

use clap::{Parser, Subcommand};

use crate::app_data::AppData;

/// Ledgertrail CLI for audit log maintenance
#[derive(Parser)]
#[command(name = "ledgertrail")]
#[command(about = "Audit trail backend for the bookkeeping suite", long_about = None)]
pub struct Cli {
    /// With no subcommand, the viewer backend server is started
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show audit log statistics
    Stats,

    /// Clear the entire audit log
    Reset {
        /// Copy the store file aside before clearing
        #[arg(long)]
        backup: bool,

        /// Skip the confirmation prompt
        #[arg(long)]
        force: bool,
    },
}

/// Execute CLI command
///
/// Routes the parsed CLI command to the appropriate handler function.
pub async fn execute_command(
    command: Commands,
    app_data: &AppData,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Stats => {
            reset::show_statistics(&app_data.query_service).await?;
        }
        Commands::Reset { backup, force } => {
            reset::reset_log(
                &app_data.query_service,
                &app_data.maintenance_service,
                backup,
                force,
            )
            .await?;
        }
    }

    Ok(())
}
