mod database;
mod logging;
mod settings;

pub use database::{connect_audit_database, migrate_audit_database};
pub use logging::{init_logging, LoggingError};
pub use settings::AppSettings;
