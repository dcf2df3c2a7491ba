use chrono::{DateTime, NaiveDate, Utc};

use crate::errors::internal::ValidationError;
use crate::types::internal::audit::ActionKind;

pub const DEFAULT_PAGE_SIZE: u64 = 50;
pub const MAX_PAGE_SIZE: u64 = 500;

/// Result ordering for log listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Descending id (the default view)
    #[default]
    NewestFirst,
    /// Ascending id (history reconstruction)
    OldestFirst,
}

/// Transient description of a caller's requested view over the log
///
/// Every present field is applied as a conjunctive predicate; an absent
/// field imposes no constraint. Construct via [`LogQuery::from_params`]
/// for wire input, or the builder methods for programmatic use.
#[derive(Debug, Clone)]
pub struct LogQuery {
    pub table_name: Option<String>,
    pub action: Option<ActionKind>,
    pub record_key: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub search: Option<String>,
    /// 1-based page number
    pub page: u64,
    pub page_size: u64,
    pub order: SortOrder,
}

impl Default for LogQuery {
    fn default() -> Self {
        Self {
            table_name: None,
            action: None,
            record_key: None,
            from: None,
            to: None,
            search: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            order: SortOrder::NewestFirst,
        }
    }
}

/// Raw, unvalidated query input as it arrives from the wire
#[derive(Debug, Clone, Default)]
pub struct LogQueryParams {
    pub table_name: Option<String>,
    pub action: Option<String>,
    pub record_key: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub order: Option<String>,
}

impl LogQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate raw wire parameters into a usable query
    ///
    /// Empty strings are treated as absent (HTML filter forms submit
    /// blank fields). An unknown table name is not rejected here; it
    /// simply matches zero records downstream.
    pub fn from_params(params: LogQueryParams) -> Result<Self, ValidationError> {
        let page = match params.page {
            None => 1,
            Some(p) if p >= 1 => p as u64,
            Some(p) => return Err(ValidationError::InvalidPage(p)),
        };

        let page_size = match params.page_size {
            None => DEFAULT_PAGE_SIZE,
            Some(s) if s >= 1 && s as u64 <= MAX_PAGE_SIZE => s as u64,
            Some(s) => {
                return Err(ValidationError::InvalidPageSize {
                    got: s,
                    max: MAX_PAGE_SIZE,
                })
            }
        };

        let action = match non_empty(params.action) {
            Some(raw) => Some(raw.parse::<ActionKind>()?),
            None => None,
        };

        let from = non_empty(params.date_from)
            .map(|raw| parse_date_bound(&raw, DayBound::Start))
            .transpose()?;
        let to = non_empty(params.date_to)
            .map(|raw| parse_date_bound(&raw, DayBound::End))
            .transpose()?;

        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err(ValidationError::InvalidDateRange {
                    from: from.to_rfc3339(),
                    to: to.to_rfc3339(),
                });
            }
        }

        let order = match non_empty(params.order).as_deref() {
            None | Some("desc") => SortOrder::NewestFirst,
            Some("asc") => SortOrder::OldestFirst,
            Some(other) => return Err(ValidationError::InvalidSortOrder(other.to_string())),
        };

        Ok(Self {
            table_name: non_empty(params.table_name),
            action,
            record_key: non_empty(params.record_key),
            from,
            to,
            search: non_empty(params.search),
            page,
            page_size,
            order,
        })
    }

    /// Re-check the invariants `from_params` establishes
    ///
    /// Guards the service layer against programmatically built queries
    /// that skipped wire-input validation.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.page < 1 {
            return Err(ValidationError::InvalidPage(self.page as i64));
        }

        if self.page_size < 1 || self.page_size > MAX_PAGE_SIZE {
            return Err(ValidationError::InvalidPageSize {
                got: self.page_size as i64,
                max: MAX_PAGE_SIZE,
            });
        }

        if let (Some(from), Some(to)) = (self.from, self.to) {
            if from > to {
                return Err(ValidationError::InvalidDateRange {
                    from: from.to_rfc3339(),
                    to: to.to_rfc3339(),
                });
            }
        }

        Ok(())
    }

    pub fn for_table(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = Some(table_name.into());
        self
    }

    pub fn for_action(mut self, action: ActionKind) -> Self {
        self.action = Some(action);
        self
    }

    pub fn for_record(mut self, record_key: impl Into<String>) -> Self {
        self.record_key = Some(record_key.into());
        self
    }

    pub fn between(mut self, from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        self.from = Some(from);
        self.to = Some(to);
        self
    }

    pub fn containing(mut self, needle: impl Into<String>) -> Self {
        self.search = Some(needle.into());
        self
    }

    pub fn at_page(mut self, page: u64, page_size: u64) -> Self {
        self.page = page;
        self.page_size = page_size;
        self
    }

    pub fn oldest_first(mut self) -> Self {
        self.order = SortOrder::OldestFirst;
        self
    }

    /// Row offset of the first record on the requested page
    pub fn offset(&self) -> u64 {
        (self.page - 1) * self.page_size
    }
}

/// Server-computed pagination metadata
///
/// All pagination arithmetic happens here; the presentation layer
/// receives only final integers and booleans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub current_page: u64,
    pub total_pages: u64,
    pub has_prev: bool,
    pub has_next: bool,
    pub total_count: u64,
}

impl PageInfo {
    /// Compute pagination bounds for a filtered count
    ///
    /// `page_size` must already be validated to be at least 1. An empty
    /// result set still has one (empty) page.
    pub fn compute(total_count: u64, page: u64, page_size: u64) -> Self {
        let total_pages = std::cmp::max(1, total_count.div_ceil(page_size));
        Self {
            current_page: page,
            total_pages,
            has_prev: page > 1,
            has_next: page < total_pages,
            total_count,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

enum DayBound {
    Start,
    End,
}

/// Parse a filter date bound: a full RFC 3339 instant, or a plain
/// YYYY-MM-DD date expanded to the day's start or end.
fn parse_date_bound(raw: &str, bound: DayBound) -> Result<DateTime<Utc>, ValidationError> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(instant.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(raw.to_string()))?;

    let time = match bound {
        DayBound::Start => date.and_hms_opt(0, 0, 0),
        DayBound::End => date.and_hms_micro_opt(23, 59, 59, 999_999),
    };

    time.map(|naive| naive.and_utc())
        .ok_or_else(|| ValidationError::InvalidDate(raw.to_string()))
}
