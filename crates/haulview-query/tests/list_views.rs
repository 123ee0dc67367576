//! List-view scenarios end to end: derived records, JSON rows, list state.

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use haulview_macros::Queryable;
use haulview_query::{
    locale_cmp, Boundary, DateRange, Dir, ListState, Op, Query, Queryable as _, Sort, Timestamp,
    ViewConfig,
};
use serde_json::json;

#[derive(Debug, Clone, Queryable)]
struct Customer {
    #[query(String)]
    name: String,
}

#[derive(Debug, Clone, Queryable)]
struct Activity {
    #[query(String)]
    title: String,

    #[query(String, rename = "type")]
    kind: String,

    #[query(Timestamp)]
    date: DateTime<Utc>,

    #[query(String, optional)]
    owner: Option<String>,

    #[query(nested)]
    customer: Customer,

    #[query(skip)]
    #[allow(dead_code)]
    internal_note: String,
}

fn activity(title: &str, kind: &str, date: DateTime<Utc>) -> Activity {
    Activity {
        title: title.to_string(),
        kind: kind.to_string(),
        date,
        owner: None,
        customer: Customer {
            name: "Acme".to_string(),
        },
        internal_note: String::new(),
    }
}

fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

fn titles(items: &[&Activity]) -> Vec<String> {
    items.iter().map(|a| a.title.clone()).collect()
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn delivery_filter_sorted_by_date() {
    let records = vec![
        activity("Delivery A", "delivery", utc(2024, 1, 10, 0, 0)),
        activity("Call B", "call", utc(2024, 1, 5, 0, 0)),
    ];

    let page = Query::new()
        .search("", [Activity::TITLE])
        .select(Activity::TYPE, "delivery")
        .order_desc(Activity::DATE)
        .paginate(1, 20)
        .unwrap()
        .execute_at(&records, Activity::accessor, &utc(2024, 1, 20, 12, 0));

    assert_eq!(titles(&page.items), ["Delivery A"]);
    assert_eq!(page.total_items, 1);
    assert_eq!(page.total_pages, 1);
    assert_eq!(page.page_number, 1);
}

#[test]
fn today_covers_the_whole_local_day_only() {
    // Viewer three hours behind UTC.
    let tz = FixedOffset::west_opt(3 * 3600).unwrap();
    let now = tz.with_ymd_and_hms(2024, 3, 13, 10, 0, 0).unwrap();
    let late_tonight = tz.with_ymd_and_hms(2024, 3, 13, 23, 59, 0).unwrap();
    let after_midnight = tz.with_ymd_and_hms(2024, 3, 14, 0, 30, 0).unwrap();
    let records = vec![
        activity("late tonight", "call", late_tonight.with_timezone(&Utc)),
        activity("after midnight", "call", after_midnight.with_timezone(&Utc)),
    ];

    let calendar = Query::new()
        .date_range(Activity::DATE, DateRange::Today)
        .filter_at(&records, &Activity::accessor, &now);
    assert_eq!(titles(&calendar), ["late tonight"]);

    let open_ended = Query::new()
        .date_range_with(Activity::DATE, DateRange::Today, Boundary::OpenEnded)
        .filter_at(&records, &Activity::accessor, &now);
    assert_eq!(titles(&open_ended), ["late tonight", "after midnight"]);
}

#[test]
fn empty_records_give_an_empty_first_page() {
    let records: Vec<Activity> = Vec::new();
    let page = Query::new()
        .search("anything", [Activity::TITLE])
        .select(Activity::TYPE, "call")
        .date_range(Activity::DATE, DateRange::LastMonth)
        .order_asc(Activity::TITLE)
        .paginate(4, 10)
        .unwrap()
        .execute_at(&records, Activity::accessor, &utc(2024, 3, 13, 10, 0));

    assert!(page.items.is_empty());
    assert_eq!(page.total_items, 0);
    assert_eq!(page.total_pages, 0);
    assert_eq!(page.page_number, 1);
}

#[test]
fn forty_five_records_split_twenty_twenty_five() {
    let records: Vec<Activity> = (0..45)
        .map(|i| activity(&format!("Call {i:02}"), "call", utc(2024, 1, 1, 0, i)))
        .collect();
    let now = utc(2024, 1, 20, 0, 0);

    let sizes: Vec<usize> = (1..=3)
        .map(|n| {
            let page = Query::new()
                .order_asc(Activity::DATE)
                .paginate(n, 20)
                .unwrap()
                .execute_at(&records, Activity::accessor, &now);
            assert_eq!(page.total_pages, 3);
            assert_eq!(page.total_items, 45);
            page.items.len()
        })
        .collect();
    assert_eq!(sizes, [20, 20, 5]);
}

#[test]
fn missing_values_fail_filters_and_sort_last() {
    let mut records = vec![
        activity("Ana's call", "call", utc(2024, 1, 3, 0, 0)),
        activity("Unassigned", "call", utc(2024, 1, 2, 0, 0)),
        activity("Bruno's call", "call", utc(2024, 1, 1, 0, 0)),
    ];
    records[0].owner = Some("Ana".into());
    records[2].owner = Some("Bruno".into());

    let now = utc(2024, 1, 20, 0, 0);
    let not_ana = Query::new()
        .and_ne("owner", "Ana")
        .filter_at(&records, &Activity::accessor, &now);
    assert_eq!(titles(&not_ana), ["Bruno's call"]);

    for dir in [Dir::Asc, Dir::Desc] {
        let sorted = Query::new()
            .order_by("owner", dir)
            .filter_at(&records, &Activity::accessor, &now);
        assert_eq!(sorted.last().map(|a| a.title.as_str()), Some("Unassigned"));
    }
}

#[test]
fn or_and_not_groups() {
    let records = vec![
        activity("Delivery A", "delivery", utc(2024, 1, 10, 0, 0)),
        activity("Call B", "call", utc(2024, 1, 5, 0, 0)),
        activity("Email C", "email", utc(2024, 1, 6, 0, 0)),
        activity("Call D (cancelled)", "call", utc(2024, 1, 7, 0, 0)),
    ];

    let results = Query::new()
        .or_eq(Activity::TYPE, "call")
        .or_eq(Activity::TYPE, "delivery")
        .not(Activity::TITLE, Op::Contains, "cancelled")
        .order_asc(Activity::TITLE)
        .filter_at(&records, &Activity::accessor, &utc(2024, 1, 20, 0, 0));

    assert_eq!(titles(&results), ["Call B", "Delivery A"]);
}

#[test]
fn nested_customer_search() {
    let mut records = vec![
        activity("Quote", "email", utc(2024, 1, 10, 0, 0)),
        activity("Visit", "meeting", utc(2024, 1, 11, 0, 0)),
    ];
    records[1].customer.name = "Rhône Cargo".into();

    let results = Query::new()
        .search("RHÔNE", [Activity::TITLE, "customer.name"])
        .filter_at(&records, &Activity::accessor, &utc(2024, 1, 20, 0, 0));
    assert_eq!(titles(&results), ["Visit"]);
}

#[test]
fn locale_order_folds_accents_and_case() {
    let names = ["fatima", "Émile", "dmitri", "Chloé", "bruno"];
    let records: Vec<Activity> = names
        .iter()
        .map(|n| activity(n, "call", utc(2024, 1, 1, 0, 0)))
        .collect();

    let sorted = Query::new()
        .order_asc(Activity::TITLE)
        .filter_at(&records, &Activity::accessor, &utc(2024, 1, 2, 0, 0));
    assert_eq!(titles(&sorted), ["bruno", "Chloé", "dmitri", "Émile", "fatima"]);
}

// ============================================================================
// Untyped JSON rows
// ============================================================================

#[test]
fn json_rows_with_string_dates() {
    let rows = vec![
        json!({"id": 1, "invoice": "INV-1", "customer": {"name": "Porto Freight"}, "amount": 120.5, "issued": "2024-02-20"}),
        json!({"id": 2, "invoice": "INV-2", "customer": {"name": "Kanto Express"}, "amount": 80, "issued": "2024-03-02T10:00:00Z"}),
        json!({"id": 3, "invoice": "INV-3", "customer": {"name": "Porto Freight"}, "amount": 300, "issued": "not a date"}),
        json!({"id": 4, "invoice": "INV-4", "customer": null, "amount": null, "issued": "2024-03-05"}),
    ];
    let now = utc(2024, 3, 13, 12, 0);

    let this_month = Query::new()
        .date_range("issued", DateRange::ThisMonth)
        .order_desc("amount")
        .filter_at(&rows, &serde_json::Value::accessor, &now);
    let ids: Vec<i64> = this_month.iter().filter_map(|r| r["id"].as_i64()).collect();
    // null amount sorts last even descending; the malformed date is dropped
    assert_eq!(ids, [2, 4]);

    let porto = Query::new()
        .search("porto", ["customer.name"])
        .and_gte("amount", 100)
        .filter_at(&rows, &serde_json::Value::accessor, &now);
    let ids: Vec<i64> = porto.iter().filter_map(|r| r["id"].as_i64()).collect();
    assert_eq!(ids, [1, 3]);
}

#[test]
fn mixed_reference_column_sorts_numbers_before_codes() {
    // Same reference column typed three ways, as spreadsheet imports do.
    let mut seed: u64 = 1;
    let rows: Vec<serde_json::Value> = (0..200)
        .map(|id| {
            seed = seed
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            let n = (seed >> 33) % 50;
            let reference = match (seed >> 20) % 3 {
                0 => json!(format!("code-{n}")),
                1 => json!(n),
                _ => json!(n.to_string()),
            };
            json!({"id": id, "ref": reference})
        })
        .collect();
    let now = utc(2024, 3, 13, 12, 0);

    for dir in [Dir::Asc, Dir::Desc] {
        let sorted = Query::new()
            .order_by("ref", dir)
            .filter_at(&rows, &serde_json::Value::accessor, &now);
        assert_eq!(sorted.len(), 200);
    }

    let asc = Query::new()
        .order_asc("ref")
        .filter_at(&rows, &serde_json::Value::accessor, &now);
    let codes_from = asc
        .iter()
        .position(|r| r["ref"].as_str().is_some_and(|s| s.starts_with("code-")))
        .unwrap_or(asc.len());

    let numbers: Vec<u64> = asc[..codes_from]
        .iter()
        .map(|r| match &r["ref"] {
            serde_json::Value::String(s) => s.parse().unwrap(),
            other => other.as_u64().unwrap(),
        })
        .collect();
    assert!(numbers.windows(2).all(|w| w[0] <= w[1]));

    let codes: Vec<&str> = asc[codes_from..]
        .iter()
        .map(|r| r["ref"].as_str().unwrap())
        .collect();
    assert!(codes.iter().all(|c| c.starts_with("code-")));
    assert!(codes.windows(2).all(|w| locale_cmp(w[0], w[1]).is_le()));
    assert_eq!(numbers.len() + codes.len(), 200);
}

// ============================================================================
// List state
// ============================================================================

fn activities_view() -> ViewConfig {
    ViewConfig::new("activities")
        .search_fields([Activity::TITLE, "customer.name"])
        .control("type", Activity::TYPE)
        .date_field(Activity::DATE)
        .default_sort(Sort::desc(Activity::DATE))
        .page_size(2)
}

#[test]
fn list_state_drives_the_query() {
    let records: Vec<Activity> = (1..=5)
        .map(|d| activity(&format!("Delivery {d}"), "delivery", utc(2024, 1, d, 9, 0)))
        .chain([activity("Call", "call", utc(2024, 1, 9, 9, 0))])
        .collect();
    let config = activities_view();
    let now = utc(2024, 1, 20, 0, 0);

    let mut state = ListState::new();
    state.set_filter("type", "delivery");
    state.set_page(3);
    let page = state
        .query(&config)
        .unwrap()
        .execute_at(&records, Activity::accessor, &now);
    assert_eq!(page.page_number, 3);
    assert_eq!(titles(&page.items), ["Delivery 1"]);

    // a new sort column goes back to page 1, ascending
    state.toggle_sort(Activity::TITLE);
    assert_eq!(state.page(), 1);
    let page = state
        .query(&config)
        .unwrap()
        .execute_at(&records, Activity::accessor, &now);
    assert_eq!(titles(&page.items), ["Delivery 1", "Delivery 2"]);

    state.set_filter("type", "all");
    assert!(!state.has_active_filters());
    let page = state
        .query(&config)
        .unwrap()
        .execute_at(&records, Activity::accessor, &now);
    assert_eq!(page.total_items, 6);
}

#[test]
fn custom_range_through_list_state() {
    let records = vec![
        activity("first", "call", utc(2024, 1, 1, 0, 0)),
        activity("end of range", "call", utc(2024, 1, 31, 23, 59)),
        activity("next month", "call", utc(2024, 2, 1, 0, 0)),
    ];
    let mut state = ListState::new();
    state.set_date_range(Some(
        DateRange::custom(
            chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            chrono::NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        )
        .unwrap(),
    ));

    let page = state
        .query(&activities_view().page_size(10))
        .unwrap()
        .execute_at(&records, Activity::accessor, &utc(2024, 3, 1, 0, 0));
    assert_eq!(titles(&page.items), ["end of range", "first"]);
}

#[test]
fn derived_accessor_values() {
    let mut a = activity("Delivery A", "delivery", utc(2024, 1, 10, 0, 0));
    assert_eq!(
        a.field_value("date").as_timestamp(),
        Some(Timestamp::from(utc(2024, 1, 10, 0, 0)))
    );
    assert!(a.field_value("owner").is_none());
    assert!(a.field_value("internal_note").is_none());
    a.owner = Some("Ana".into());
    assert_eq!(a.field_value("owner").as_str(), Some("Ana"));
    assert_eq!(a.field_value("customer.name").as_str(), Some("Acme"));
}
