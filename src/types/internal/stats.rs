/// Aggregate view over a filtered slice of the audit log
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Statistics {
    /// Records matching the filter
    pub total_count: u64,
    /// Distinct business tables observed
    pub tables_tracked: u64,
    /// Distinct business rows touched
    pub records_affected: u64,
    /// Earliest capture timestamp observed, if any
    pub first_activity: Option<String>,
    /// Latest capture timestamp observed, if any
    pub last_activity: Option<String>,
    /// Records captured in the last 24 hours
    pub last_day_count: u64,
    /// Per-action breakdown, highest count first
    pub actions: Vec<ActionCount>,
    /// Per-table breakdown, highest count first
    pub tables: Vec<TableActivity>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionCount {
    pub action: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableActivity {
    pub table_name: String,
    pub count: u64,
    pub last_activity: Option<String>,
}
