//! Error types for the query crate.

use thiserror::Error;

/// Errors that can occur when building a query.
///
/// Executing a query never fails: malformed records are excluded from the
/// result instead of aborting it.
#[derive(Debug, Error)]
pub enum QueryError {
    /// Invalid regular expression pattern.
    #[error("invalid regex pattern: {0}")]
    InvalidRegex(#[from] regex::Error),

    /// A page must hold at least one item.
    #[error("page size must be at least 1")]
    ZeroPageSize,

    /// Custom date range whose end date precedes its start date.
    #[error("custom date range ends ({end}) before it starts ({start})")]
    InvertedDateRange {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },

    /// Date range preset name not recognised.
    #[error("unknown date range '{0}', expected one of: today, yesterday, this-week, this-month, last-month, custom")]
    UnknownDateRange(String),

    /// Sort direction name not recognised.
    #[error("unknown sort direction '{0}', expected asc or desc")]
    UnknownDirection(String),

    /// List state selects a filter control the view does not define.
    #[error("view '{view}' has no filter control named '{control}'")]
    UnknownControl { view: String, control: String },

    /// List state sorts by a column the view does not offer.
    #[error("view '{view}' cannot sort by '{field}'")]
    UnknownSortField { view: String, field: String },

    /// Date range requested on a view without a date field.
    #[error("view '{0}' has no date field to filter on")]
    NoDateField(String),
}

/// Result type for query operations.
pub type Result<T> = std::result::Result<T, QueryError>;
