use crate::errors::internal::ValidationError;
use crate::types::internal::audit::ActionKind;
use crate::types::internal::query::{
    LogQuery, LogQueryParams, PageInfo, SortOrder, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};

#[test]
fn defaults_apply_when_params_are_absent() {
    let query = LogQuery::from_params(LogQueryParams::default()).unwrap();

    assert_eq!(query.page, 1);
    assert_eq!(query.page_size, DEFAULT_PAGE_SIZE);
    assert_eq!(query.order, SortOrder::NewestFirst);
    assert!(query.table_name.is_none());
    assert!(query.action.is_none());
    assert!(query.from.is_none());
    assert!(query.to.is_none());
}

#[test]
fn blank_strings_are_treated_as_absent() {
    let query = LogQuery::from_params(LogQueryParams {
        table_name: Some("".to_string()),
        action: Some("  ".to_string()),
        search: Some("".to_string()),
        ..LogQueryParams::default()
    })
    .unwrap();

    assert!(query.table_name.is_none());
    assert!(query.action.is_none());
    assert!(query.search.is_none());
}

#[test]
fn non_positive_page_size_is_rejected() {
    let err = LogQuery::from_params(LogQueryParams {
        page_size: Some(0),
        ..LogQueryParams::default()
    })
    .unwrap_err();

    assert_eq!(
        err,
        ValidationError::InvalidPageSize {
            got: 0,
            max: MAX_PAGE_SIZE
        }
    );

    assert!(LogQuery::from_params(LogQueryParams {
        page_size: Some(-5),
        ..LogQueryParams::default()
    })
    .is_err());
}

#[test]
fn oversized_page_size_is_rejected() {
    let err = LogQuery::from_params(LogQueryParams {
        page_size: Some(MAX_PAGE_SIZE as i64 + 1),
        ..LogQueryParams::default()
    })
    .unwrap_err();

    assert!(matches!(err, ValidationError::InvalidPageSize { .. }));
}

#[test]
fn zero_page_is_rejected() {
    let err = LogQuery::from_params(LogQueryParams {
        page: Some(0),
        ..LogQueryParams::default()
    })
    .unwrap_err();

    assert_eq!(err, ValidationError::InvalidPage(0));
}

#[test]
fn unknown_action_is_rejected() {
    let err = LogQuery::from_params(LogQueryParams {
        action: Some("MERGE".to_string()),
        ..LogQueryParams::default()
    })
    .unwrap_err();

    assert_eq!(err, ValidationError::UnknownAction("MERGE".to_string()));
}

#[test]
fn known_action_parses() {
    let query = LogQuery::from_params(LogQueryParams {
        action: Some("UPDATE".to_string()),
        ..LogQueryParams::default()
    })
    .unwrap();

    assert_eq!(query.action, Some(ActionKind::Update));
}

#[test]
fn plain_dates_expand_to_day_bounds() {
    let query = LogQuery::from_params(LogQueryParams {
        date_from: Some("2026-03-01".to_string()),
        date_to: Some("2026-03-01".to_string()),
        ..LogQueryParams::default()
    })
    .unwrap();

    let from = query.from.unwrap();
    let to = query.to.unwrap();

    assert_eq!(from.to_rfc3339(), "2026-03-01T00:00:00+00:00");
    assert!(to > from);
    assert_eq!(to.date_naive(), from.date_naive());
}

#[test]
fn rfc3339_bounds_are_accepted() {
    let query = LogQuery::from_params(LogQueryParams {
        date_from: Some("2026-03-01T10:00:00Z".to_string()),
        ..LogQueryParams::default()
    })
    .unwrap();

    assert_eq!(query.from.unwrap().to_rfc3339(), "2026-03-01T10:00:00+00:00");
}

#[test]
fn malformed_date_is_rejected() {
    let err = LogQuery::from_params(LogQueryParams {
        date_from: Some("March 1st".to_string()),
        ..LogQueryParams::default()
    })
    .unwrap_err();

    assert_eq!(err, ValidationError::InvalidDate("March 1st".to_string()));
}

#[test]
fn inverted_date_range_is_rejected() {
    let err = LogQuery::from_params(LogQueryParams {
        date_from: Some("2026-03-02".to_string()),
        date_to: Some("2026-03-01".to_string()),
        ..LogQueryParams::default()
    })
    .unwrap_err();

    assert!(matches!(err, ValidationError::InvalidDateRange { .. }));
}

#[test]
fn unknown_sort_order_is_rejected() {
    let err = LogQuery::from_params(LogQueryParams {
        order: Some("sideways".to_string()),
        ..LogQueryParams::default()
    })
    .unwrap_err();

    assert_eq!(err, ValidationError::InvalidSortOrder("sideways".to_string()));
}

#[test]
fn page_info_math_holds_for_boundary_counts() {
    // Empty match set still has one page
    let info = PageInfo::compute(0, 1, 50);
    assert_eq!(info.total_pages, 1);
    assert!(!info.has_prev);
    assert!(!info.has_next);

    // Exact multiple of the page size
    let info = PageInfo::compute(100, 1, 50);
    assert_eq!(info.total_pages, 2);
    assert!(info.has_next);

    // One over the multiple adds a page
    let info = PageInfo::compute(101, 3, 50);
    assert_eq!(info.total_pages, 3);
    assert!(info.has_prev);
    assert!(!info.has_next);

    // A page past the end still reports consistent flags
    let info = PageInfo::compute(10, 5, 50);
    assert_eq!(info.total_pages, 1);
    assert!(info.has_prev);
    assert!(!info.has_next);
}

#[test]
fn offset_is_derived_from_page_and_size() {
    let query = LogQuery::new().at_page(3, 25);
    assert_eq!(query.offset(), 50);
}

#[test]
fn programmatic_query_validation_catches_bad_pages() {
    assert!(LogQuery::new().at_page(0, 50).validate().is_err());
    assert!(LogQuery::new().at_page(1, 0).validate().is_err());
    assert!(LogQuery::new().at_page(1, MAX_PAGE_SIZE + 1).validate().is_err());
    assert!(LogQuery::new().at_page(7, MAX_PAGE_SIZE).validate().is_ok());
}
