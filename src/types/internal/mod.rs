// Internal types shared across the recorder, store, and service layers
pub mod audit;
pub mod context;
pub mod query;
pub mod snapshot;
pub mod stats;

pub use audit::{ActionKind, AuditEvent, SYSTEM_TABLE};
pub use context::RequestContext;
pub use query::{LogQuery, LogQueryParams, PageInfo, SortOrder};
pub use snapshot::Snapshot;
pub use stats::{ActionCount, Statistics, TableActivity};

#[cfg(test)]
mod audit_test;

#[cfg(test)]
mod query_test;
