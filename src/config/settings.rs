use std::env;
use std::path::PathBuf;

const DEFAULT_DATABASE_FILE: &str = "audit_tracker.db";
const DEFAULT_PORT: u16 = 5001;

/// Infrastructure settings loaded from the environment at process start
#[derive(Debug, Clone)]
pub struct AppSettings {
    pub audit_database_url: String,
    pub server_host: String,
    pub server_port: u16,
}

impl AppSettings {
    /// Load settings from environment variables, with defaults suitable
    /// for a single-host deployment
    pub fn from_env() -> Self {
        let audit_database_url = env::var("AUDIT_DATABASE_URL")
            .unwrap_or_else(|_| format!("sqlite://{}?mode=rwc", DEFAULT_DATABASE_FILE));

        let server_host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let server_port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Self {
            audit_database_url,
            server_host,
            server_port,
        }
    }

    /// The SQLite file behind the store, when the URL is file-backed
    ///
    /// An in-memory store has no file and cannot be backed up.
    pub fn database_file(&self) -> Option<PathBuf> {
        let raw = self.audit_database_url.strip_prefix("sqlite://")?;
        let path = raw.split('?').next().unwrap_or(raw);

        if path.is_empty() || path == ":memory:" {
            return None;
        }

        Some(PathBuf::from(path))
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_file_strips_scheme_and_options() {
        let settings = AppSettings {
            audit_database_url: "sqlite://data/audit_tracker.db?mode=rwc".to_string(),
            server_host: "127.0.0.1".to_string(),
            server_port: 5001,
        };

        assert_eq!(
            settings.database_file(),
            Some(PathBuf::from("data/audit_tracker.db"))
        );
    }

    #[test]
    fn in_memory_store_has_no_file() {
        let settings = AppSettings {
            audit_database_url: "sqlite://:memory:".to_string(),
            server_host: "127.0.0.1".to_string(),
            server_port: 5001,
        };

        assert_eq!(settings.database_file(), None);
    }
}
