//! haulview-query - search, filter, sort and paginate in-memory records.
//!
//! Every list screen of the dashboard (activities, invoices, transactions,
//! tasks, deliveries) does the same thing to an in-memory collection: narrow
//! it with a search box, a few dropdown filters and a date-range picker, sort
//! it by a clicked column, and show one page. This crate is that logic, once.
//!
//! # Quick Start
//!
//! ```rust
//! use haulview_query::{DateRange, Query, Timestamp, Value};
//! use chrono::{TimeZone, Utc};
//!
//! struct Activity {
//!     title: String,
//!     kind: String,
//!     date: Timestamp,
//! }
//!
//! fn accessor<'a>(activity: &'a Activity, field: &str) -> Value<'a> {
//!     match field {
//!         "title" => Value::String(&activity.title),
//!         "type" => Value::String(&activity.kind),
//!         "date" => Value::Timestamp(activity.date),
//!         _ => Value::None,
//!     }
//! }
//!
//! let day = |d| Timestamp::from(Utc.with_ymd_and_hms(2024, 1, d, 9, 0, 0).unwrap());
//! let activities = vec![
//!     Activity { title: "Delivery A".into(), kind: "delivery".into(), date: day(10) },
//!     Activity { title: "Call B".into(), kind: "call".into(), date: day(5) },
//! ];
//!
//! let now = Utc.with_ymd_and_hms(2024, 1, 20, 12, 0, 0).unwrap();
//! let page = Query::new()
//!     .search("", ["title"])
//!     .select("type", "delivery")
//!     .date_range("date", DateRange::ThisMonth)
//!     .order_desc("date")
//!     .paginate(1, 20)?
//!     .execute_at(&activities, accessor, &now);
//!
//! assert_eq!(page.total_items, 1);
//! assert_eq!(page.items[0].title, "Delivery A");
//! # Ok::<(), haulview_query::QueryError>(())
//! ```
//!
//! # Stages
//!
//! ```text
//! text search -> field filters -> date range -> sort -> paginate
//! ```
//!
//! - **Search**: case-insensitive substring, OR'd across the listed fields.
//! - **Filters**: AND group, OR group, NOT group (see [`Query`]).
//! - **Date range**: presets resolved in the caller's time zone (see
//!   [`DateRange`]).
//! - **Sort**: type-aware, missing values last, stable.
//! - **Page**: 1-indexed, clamped to the last page.
//!
//! Records that lack a field, or hold something unusable in it, simply fail
//! the stage that looks at that field. Execution never fails.
//!
//! # Record types
//!
//! Any type works given an accessor `for<'a> Fn(&'a T, &str) -> Value<'a>`.
//! Types implementing [`Queryable`] (by hand or with
//! `#[derive(Queryable)]` from `haulview-macros`) can pass
//! `T::accessor`. `serde_json::Value` rows implement it with dotted paths.

mod date_range;
mod error;
mod filter;
mod op;
mod page;
mod query;
mod record;
mod search;
mod sort;
mod traits;
mod value;
mod view;

pub use date_range::{Boundary, DateRange, TimeWindow, WindowEnd};
pub use error::{QueryError, Result};
pub use filter::{is_unconstrained, ClauseValue, Filter, Predicate, Test, ALL};
pub use op::Op;
pub use page::{Page, PageRequest};
pub use query::{DateFilter, Query};
pub use record::{json_value, resolve_path};
pub use search::Search;
pub use sort::{compare_by_sorts, compare_values, locale_cmp, Dir, Sort};
pub use traits::{QueryEnum, QueryTimestamp, Queryable};
pub use value::{Number, Timestamp, Value};
pub use view::{FilterControl, ListState, ViewConfig, DEFAULT_PAGE_SIZE};
