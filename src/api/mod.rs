// API layer - HTTP endpoints exposed to the audit viewer
pub mod audit;
pub mod health;

pub use audit::AuditApi;
pub use health::HealthApi;
