//! Query builder and executor.
//!
//! A [`Query`] is the full declarative description of one list request:
//! search term, field filters, date range, sort keys and page. Executing it
//! runs the stages in a fixed order:
//!
//! ```text
//! text search -> field filters -> date range -> sort -> paginate
//! ```
//!
//! so `total_items` is always the post-filter, pre-pagination count.

use chrono::{DateTime, Local, TimeZone};
use regex::Regex;

use crate::date_range::{Boundary, DateRange, TimeWindow};
use crate::error::Result;
use crate::filter::{ClauseValue, Filter};
use crate::op::Op;
use crate::page::{Page, PageRequest};
use crate::search::Search;
use crate::sort::{compare_by_sorts, Dir, Sort};
use crate::value::Value;

/// Date-range constraint on one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFilter {
    pub field: String,
    pub range: DateRange,
    pub boundary: Boundary,
}

/// A search, filter, sort and page request over a record collection.
///
/// Filters come in three groups with fixed combination logic:
///
/// ```text
/// match = (all AND filters pass)
///       ∧ (at least one OR filter passes, or there are none)
///       ∧ (no NOT filter passes)
/// ```
///
/// # Example
///
/// ```
/// use haulview_query::{Query, Value};
///
/// struct Task {
///     title: String,
///     status: String,
/// }
///
/// fn accessor<'a>(task: &'a Task, field: &str) -> Value<'a> {
///     match field {
///         "title" => Value::String(&task.title),
///         "status" => Value::String(&task.status),
///         _ => Value::None,
///     }
/// }
///
/// let tasks = vec![
///     Task { title: "Call depot".into(), status: "open".into() },
///     Task { title: "Send invoice".into(), status: "done".into() },
///     Task { title: "Call driver".into(), status: "open".into() },
/// ];
///
/// let page = Query::new()
///     .search("call", ["title"])
///     .select("status", "open")
///     .order_desc("title")
///     .paginate(1, 10)?
///     .execute(&tasks, accessor);
///
/// assert_eq!(page.total_items, 2);
/// assert_eq!(page.items[0].title, "Call driver");
/// # Ok::<(), haulview_query::QueryError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Query {
    search: Option<Search>,
    and_filters: Vec<Filter>,
    or_filters: Vec<Filter>,
    not_filters: Vec<Filter>,
    date_filter: Option<DateFilter>,
    sorts: Vec<Sort>,
    page: Option<PageRequest>,
}

impl Query {
    /// Creates an empty query, which matches everything.
    pub fn new() -> Self {
        Query::default()
    }

    // ========================================================================
    // Search
    // ========================================================================

    /// Case-insensitive substring search across `fields`. A blank term is a
    /// no-op.
    pub fn search<I, S>(mut self, term: &str, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let search = Search::new(term, fields);
        self.search = (!search.is_blank()).then_some(search);
        self
    }

    // ========================================================================
    // Filters
    // ========================================================================

    /// Adds a prepared filter to the AND group.
    pub fn filter_by(mut self, filter: Filter) -> Self {
        self.and_filters.push(filter);
        self
    }

    /// Adds an AND filter.
    pub fn and(self, field: &str, op: Op, value: impl Into<ClauseValue>) -> Self {
        self.filter_by(Filter::new(field, op, value))
    }

    /// Adds an OR filter.
    pub fn or(mut self, field: &str, op: Op, value: impl Into<ClauseValue>) -> Self {
        self.or_filters.push(Filter::new(field, op, value));
        self
    }

    /// Adds a NOT filter.
    pub fn not(mut self, field: &str, op: Op, value: impl Into<ClauseValue>) -> Self {
        self.not_filters.push(Filter::new(field, op, value));
        self
    }

    /// Dropdown-style equality filter; `"all"` or a blank selection adds
    /// nothing.
    pub fn select(self, field: &str, selection: &str) -> Self {
        match Filter::selection(field, selection) {
            Some(filter) => self.filter_by(filter),
            None => self,
        }
    }

    pub fn and_eq(self, field: &str, value: impl Into<ClauseValue>) -> Self {
        self.and(field, Op::Eq, value)
    }

    pub fn and_ne(self, field: &str, value: impl Into<ClauseValue>) -> Self {
        self.and(field, Op::Ne, value)
    }

    pub fn and_gte(self, field: &str, value: impl Into<ClauseValue>) -> Self {
        self.and(field, Op::Gte, value)
    }

    pub fn and_lte(self, field: &str, value: impl Into<ClauseValue>) -> Self {
        self.and(field, Op::Lte, value)
    }

    pub fn and_contains(self, field: &str, value: &str) -> Self {
        self.and(field, Op::Contains, value)
    }

    /// Adds an AND set-membership filter (strings or enum discriminants).
    pub fn and_in(self, field: &str, values: impl Into<ClauseValue>) -> Self {
        self.and(field, Op::In, values)
    }

    /// Adds an AND regex filter. Fails if the pattern does not compile.
    pub fn and_regex(self, field: &str, pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern)?;
        Ok(self.and(field, Op::Regex, regex))
    }

    pub fn or_eq(self, field: &str, value: impl Into<ClauseValue>) -> Self {
        self.or(field, Op::Eq, value)
    }

    pub fn or_contains(self, field: &str, value: &str) -> Self {
        self.or(field, Op::Contains, value)
    }

    pub fn not_eq(self, field: &str, value: impl Into<ClauseValue>) -> Self {
        self.not(field, Op::Eq, value)
    }

    pub fn not_in(self, field: &str, values: impl Into<ClauseValue>) -> Self {
        self.not(field, Op::In, values)
    }

    // ========================================================================
    // Date range
    // ========================================================================

    /// Restricts `field` to a date-range preset with calendar boundaries.
    pub fn date_range(self, field: &str, range: DateRange) -> Self {
        self.date_range_with(field, range, Boundary::default())
    }

    /// Restricts `field` to a date-range preset with an explicit boundary.
    pub fn date_range_with(mut self, field: &str, range: DateRange, boundary: Boundary) -> Self {
        self.date_filter = Some(DateFilter {
            field: field.to_string(),
            range,
            boundary,
        });
        self
    }

    // ========================================================================
    // Sorting and paging
    // ========================================================================

    /// Adds a sort key. Earlier keys take precedence.
    pub fn order_by(mut self, field: &str, dir: Dir) -> Self {
        self.sorts.push(Sort::new(field, dir));
        self
    }

    pub fn order_asc(self, field: &str) -> Self {
        self.order_by(field, Dir::Asc)
    }

    pub fn order_desc(self, field: &str) -> Self {
        self.order_by(field, Dir::Desc)
    }

    /// Requests page `page` (1-indexed) of `size` items.
    pub fn paginate(self, page: usize, size: usize) -> Result<Self> {
        Ok(self.page(PageRequest::new(page, size)?))
    }

    pub fn page(mut self, request: PageRequest) -> Self {
        self.page = Some(request);
        self
    }

    /// Finalizes the query.
    pub fn build(self) -> Self {
        self
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    pub fn search_clause(&self) -> Option<&Search> {
        self.search.as_ref()
    }

    pub fn and_filters(&self) -> &[Filter] {
        &self.and_filters
    }

    pub fn or_filters(&self) -> &[Filter] {
        &self.or_filters
    }

    pub fn not_filters(&self) -> &[Filter] {
        &self.not_filters
    }

    pub fn date_filter(&self) -> Option<&DateFilter> {
        self.date_filter.as_ref()
    }

    pub fn sorts(&self) -> &[Sort] {
        &self.sorts
    }

    pub fn page_request(&self) -> Option<PageRequest> {
        self.page
    }

    /// Returns `true` if nothing narrows the result (sorting and paging
    /// aside).
    pub fn is_empty(&self) -> bool {
        self.search.is_none()
            && self.and_filters.is_empty()
            && self.or_filters.is_empty()
            && self.not_filters.is_empty()
            && self.date_filter.is_none()
    }

    // ========================================================================
    // Execution
    // ========================================================================

    /// Runs the query with date ranges resolved against the local clock.
    pub fn execute<'a, T, F>(&self, items: &'a [T], accessor: F) -> Page<&'a T>
    where
        for<'b> F: Fn(&'b T, &str) -> Value<'b>,
    {
        self.execute_at(items, accessor, &Local::now())
    }

    /// Runs the query with date ranges resolved against `now`.
    pub fn execute_at<'a, T, F, Tz>(&self, items: &'a [T], accessor: F, now: &DateTime<Tz>) -> Page<&'a T>
    where
        for<'b> F: Fn(&'b T, &str) -> Value<'b>,
        Tz: TimeZone,
    {
        let results = self.filter_at(items, &accessor, now);
        let page = Page::paginate(results, self.page);
        tracing::debug!(
            page = page.page_number,
            total_pages = page.total_pages,
            returned = page.items.len(),
            "paginated"
        );
        page
    }

    /// All matching records, sorted, without pagination.
    pub fn filter<'a, T, F>(&self, items: &'a [T], accessor: F) -> Vec<&'a T>
    where
        for<'b> F: Fn(&'b T, &str) -> Value<'b>,
    {
        self.filter_at(items, &accessor, &Local::now())
    }

    /// All matching records, sorted, with date ranges resolved against `now`.
    pub fn filter_at<'a, T, F, Tz>(&self, items: &'a [T], accessor: &F, now: &DateTime<Tz>) -> Vec<&'a T>
    where
        for<'b> F: Fn(&'b T, &str) -> Value<'b>,
        Tz: TimeZone,
    {
        let mut results: Vec<&'a T> = match &self.search {
            Some(search) => items
                .iter()
                .filter(|item| search.matches(*item, accessor))
                .collect(),
            None => items.iter().collect(),
        };
        let after_search = results.len();

        results.retain(|item| self.passes_filters(*item, accessor));
        let after_filters = results.len();

        if let Some(date_filter) = &self.date_filter {
            let window = date_filter.range.resolve(now, date_filter.boundary);
            results.retain(|item| in_window(*item, accessor, &date_filter.field, &window));
        }

        if !self.sorts.is_empty() {
            results.sort_by(|a, b| compare_by_sorts(*a, *b, &self.sorts, accessor));
        }

        tracing::debug!(
            total = items.len(),
            after_search,
            after_filters,
            matched = results.len(),
            "filtered records"
        );
        results
    }

    /// Counts matching records (date ranges against the local clock).
    pub fn count<T, F>(&self, items: &[T], accessor: F) -> usize
    where
        for<'b> F: Fn(&'b T, &str) -> Value<'b>,
    {
        let window = self.window_at(&Local::now());
        items
            .iter()
            .filter(|item| self.matches_in(*item, &accessor, window.as_ref()))
            .count()
    }

    /// Tests one record (date ranges against the local clock).
    pub fn matches<T, F>(&self, item: &T, accessor: F) -> bool
    where
        for<'b> F: Fn(&'b T, &str) -> Value<'b>,
    {
        self.matches_at(item, accessor, &Local::now())
    }

    /// Tests one record with date ranges resolved against `now`.
    pub fn matches_at<T, F, Tz>(&self, item: &T, accessor: F, now: &DateTime<Tz>) -> bool
    where
        for<'b> F: Fn(&'b T, &str) -> Value<'b>,
        Tz: TimeZone,
    {
        let window = self.window_at(now);
        self.matches_in(item, &accessor, window.as_ref())
    }

    fn window_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Option<(String, TimeWindow)> {
        self.date_filter
            .as_ref()
            .map(|df| (df.field.clone(), df.range.resolve(now, df.boundary)))
    }

    fn matches_in<T, F>(&self, item: &T, accessor: &F, window: Option<&(String, TimeWindow)>) -> bool
    where
        for<'b> F: Fn(&'b T, &str) -> Value<'b>,
    {
        if let Some(search) = &self.search {
            if !search.matches(item, accessor) {
                return false;
            }
        }
        if !self.passes_filters(item, accessor) {
            return false;
        }
        match window {
            Some((field, window)) => in_window(item, accessor, field, window),
            None => true,
        }
    }

    fn passes_filters<T, F>(&self, item: &T, accessor: &F) -> bool
    where
        for<'b> F: Fn(&'b T, &str) -> Value<'b>,
    {
        let passes = |filter: &Filter| filter.matches(&accessor(item, &filter.field));

        self.and_filters.iter().all(passes)
            && (self.or_filters.is_empty() || self.or_filters.iter().any(passes))
            && !self.not_filters.iter().any(passes)
    }
}

fn in_window<T, F>(item: &T, accessor: &F, field: &str, window: &TimeWindow) -> bool
where
    for<'b> F: Fn(&'b T, &str) -> Value<'b>,
{
    accessor(item, field)
        .coerce_timestamp()
        .is_some_and(|ts| window.contains(ts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Number, Timestamp};
    use chrono::Utc;

    #[derive(Debug, Clone, PartialEq)]
    struct Invoice {
        number: String,
        customer: String,
        status: String,
        amount: i64,
        issued: Option<Timestamp>,
    }

    fn accessor<'a>(invoice: &'a Invoice, field: &str) -> Value<'a> {
        match field {
            "number" => Value::String(&invoice.number),
            "customer" => Value::String(&invoice.customer),
            "status" => Value::String(&invoice.status),
            "amount" => Value::Number(Number::I64(invoice.amount)),
            "issued" => invoice.issued.map_or(Value::None, Value::Timestamp),
            _ => Value::None,
        }
    }

    fn at(y: i32, m: u32, d: u32) -> Option<Timestamp> {
        Some(Timestamp::from(Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()))
    }

    fn invoice(number: &str, customer: &str, status: &str, amount: i64, issued: Option<Timestamp>) -> Invoice {
        Invoice {
            number: number.to_string(),
            customer: customer.to_string(),
            status: status.to_string(),
            amount,
            issued,
        }
    }

    fn sample_invoices() -> Vec<Invoice> {
        vec![
            invoice("INV-001", "Acme Freight", "paid", 1200, at(2024, 3, 2)),
            invoice("INV-002", "Borealis Logistics", "pending", 800, at(2024, 3, 11)),
            invoice("INV-003", "Acme Freight", "overdue", 450, at(2024, 2, 14)),
            invoice("INV-004", "Cobalt Couriers", "pending", 3100, at(2024, 3, 13)),
            invoice("INV-005", "Delta Haulage", "paid", 90, None),
        ]
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 13, 18, 0, 0).unwrap()
    }

    fn numbers(items: &[&Invoice]) -> Vec<String> {
        items.iter().map(|i| i.number.clone()).collect()
    }

    #[test]
    fn empty_query_matches_all() {
        let invoices = sample_invoices();
        let page = Query::new().execute_at(&invoices, accessor, &now());
        assert_eq!(page.total_items, 5);
        assert_eq!(page.total_pages, 1);
        assert!(Query::new().is_empty());
    }

    #[test]
    fn search_ors_across_fields() {
        let invoices = sample_invoices();
        let page = Query::new()
            .search("acme", ["number", "customer"])
            .execute_at(&invoices, accessor, &now());
        assert_eq!(numbers(&page.items), vec!["INV-001", "INV-003"]);

        let page = Query::new()
            .search("inv-004", ["number", "customer"])
            .execute_at(&invoices, accessor, &now());
        assert_eq!(numbers(&page.items), vec!["INV-004"]);
    }

    #[test]
    fn blank_search_is_dropped() {
        let query = Query::new().search("  ", ["number"]);
        assert!(query.search_clause().is_none());
        assert!(query.is_empty());
    }

    #[test]
    fn select_all_adds_no_filter() {
        let query = Query::new().select("status", "all");
        assert!(query.and_filters().is_empty());

        let invoices = sample_invoices();
        let page = Query::new()
            .select("status", "pending")
            .execute_at(&invoices, accessor, &now());
        assert_eq!(numbers(&page.items), vec!["INV-002", "INV-004"]);
    }

    #[test]
    fn and_or_not_groups() {
        let invoices = sample_invoices();
        let results = Query::new()
            .and_gte("amount", 100i64)
            .or_eq("status", "pending")
            .or_eq("status", "overdue")
            .not_eq("customer", "Cobalt Couriers")
            .filter_at(&invoices, &accessor, &now());
        assert_eq!(numbers(&results), vec!["INV-002", "INV-003"]);
    }

    #[test]
    fn date_range_excludes_missing_dates() {
        let invoices = sample_invoices();
        let page = Query::new()
            .date_range("issued", DateRange::ThisMonth)
            .execute_at(&invoices, accessor, &now());
        assert_eq!(numbers(&page.items), vec!["INV-001", "INV-002", "INV-004"]);

        let page = Query::new()
            .date_range("issued", DateRange::LastMonth)
            .execute_at(&invoices, accessor, &now());
        assert_eq!(numbers(&page.items), vec!["INV-003"]);
    }

    #[test]
    fn sort_by_number_and_string() {
        let invoices = sample_invoices();
        let results = Query::new()
            .order_desc("amount")
            .filter_at(&invoices, &accessor, &now());
        assert_eq!(results[0].number, "INV-004");
        assert_eq!(results[4].number, "INV-005");

        let results = Query::new()
            .order_asc("customer")
            .order_desc("number")
            .filter_at(&invoices, &accessor, &now());
        assert_eq!(
            numbers(&results),
            vec!["INV-003", "INV-001", "INV-002", "INV-004", "INV-005"]
        );
    }

    #[test]
    fn missing_sort_values_go_last_both_ways() {
        let invoices = sample_invoices();
        for dir in [Dir::Asc, Dir::Desc] {
            let results = Query::new()
                .order_by("issued", dir)
                .filter_at(&invoices, &accessor, &now());
            assert_eq!(results[4].number, "INV-005");
        }
    }

    #[test]
    fn regex_filter_and_error() {
        let invoices = sample_invoices();
        let results = Query::new()
            .and_regex("number", r"^INV-00[12]$")
            .unwrap()
            .filter_at(&invoices, &accessor, &now());
        assert_eq!(results.len(), 2);

        assert!(Query::new().and_regex("number", "(").is_err());
    }

    #[test]
    fn pagination_metadata() {
        let invoices = sample_invoices();
        let page = Query::new()
            .order_asc("number")
            .paginate(2, 2)
            .unwrap()
            .execute_at(&invoices, accessor, &now());
        assert_eq!(numbers(&page.items), vec!["INV-003", "INV-004"]);
        assert_eq!(page.total_items, 5);
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn count_and_matches_agree_with_filter() {
        let invoices = sample_invoices();
        let query = Query::new().and_in("status", vec!["paid", "overdue"]);
        assert_eq!(query.count(&invoices, accessor), 3);
        assert!(query.matches(&invoices[0], accessor));
        assert!(!query.matches(&invoices[1], accessor));
    }

    #[test]
    fn introspection() {
        let query = Query::new()
            .search("a", ["number"])
            .and_eq("status", "paid")
            .or_eq("customer", "x")
            .not_in("status", vec!["void"])
            .date_range("issued", DateRange::Today)
            .order_asc("number")
            .paginate(3, 10)
            .unwrap()
            .build();

        assert_eq!(query.search_clause().map(Search::term), Some("a"));
        assert_eq!(query.and_filters().len(), 1);
        assert_eq!(query.or_filters().len(), 1);
        assert_eq!(query.not_filters().len(), 1);
        assert_eq!(query.date_filter().map(|d| d.range), Some(DateRange::Today));
        assert_eq!(query.sorts(), &[Sort::asc("number")]);
        assert_eq!(query.page_request().map(|p| p.page()), Some(3));
        assert!(!query.is_empty());
    }
}
