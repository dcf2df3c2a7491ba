// Services layer - Read path and maintenance operations
pub mod audit_query_service;
pub mod maintenance_service;

pub use audit_query_service::{AuditQueryService, ListPage};
pub use maintenance_service::{MaintenanceService, ResetOutcome};
