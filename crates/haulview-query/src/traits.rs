//! Traits for record types.
//!
//! [`Queryable`] is what `#[derive(Queryable)]` from `haulview-macros`
//! implements. The two helper traits convert enum and date fields into
//! [`Value`] variants.

use chrono::{DateTime, NaiveDate, TimeZone};

use crate::value::{Timestamp, Value};

/// A record type whose fields can be searched, filtered and sorted.
///
/// # Manual implementation
///
/// ```
/// use haulview_query::{Number, Queryable, Value};
///
/// struct Contact {
///     name: String,
///     company: Option<String>,
///     deals: u32,
/// }
///
/// impl Queryable for Contact {
///     fn field_value(&self, field: &str) -> Value<'_> {
///         match field {
///             "name" => Value::String(&self.name),
///             "company" => self.company.as_deref().map_or(Value::None, Value::String),
///             "deals" => Value::Number(Number::from(self.deals)),
///             _ => Value::None,
///         }
///     }
/// }
/// ```
pub trait Queryable {
    /// Resolves a field path (e.g. `customer.name`) to a value.
    ///
    /// Unknown, missing or malformed fields must resolve to [`Value::None`]
    /// rather than panic; the engine then leaves the record out of any
    /// search or filter on that field.
    fn field_value(&self, field: &str) -> Value<'_>;

    /// Accessor function in the shape [`Query`](crate::Query) methods take.
    fn accessor<'a>(item: &'a Self, field: &str) -> Value<'a>
    where
        Self: Sized,
    {
        item.field_value(field)
    }
}

impl<T: Queryable + ?Sized> Queryable for &T {
    fn field_value(&self, field: &str) -> Value<'_> {
        (**self).field_value(field)
    }
}

impl<T: Queryable + ?Sized> Queryable for Box<T> {
    fn field_value(&self, field: &str) -> Value<'_> {
        (**self).field_value(field)
    }
}

/// Maps an enum variant to a stable discriminant for `#[query(Enum)]` fields.
///
/// Use explicit values rather than declaration order so stored filters keep
/// their meaning when variants are added.
pub trait QueryEnum {
    fn discriminant(&self) -> u32;
}

/// Converts a date-like field to a [`Timestamp`] for `#[query(Timestamp)]`.
pub trait QueryTimestamp {
    fn to_timestamp(&self) -> Timestamp;
}

/// Milliseconds since the Unix epoch.
impl QueryTimestamp for i64 {
    fn to_timestamp(&self) -> Timestamp {
        Timestamp::from_millis(*self)
    }
}

impl QueryTimestamp for Timestamp {
    fn to_timestamp(&self) -> Timestamp {
        *self
    }
}

impl<Tz: TimeZone> QueryTimestamp for DateTime<Tz> {
    fn to_timestamp(&self) -> Timestamp {
        Timestamp::from_datetime(self)
    }
}

/// Midnight UTC of the date, the same instant a bare `YYYY-MM-DD` string in
/// a JSON row resolves to. West of UTC this is still the previous evening
/// locally; use [`Timestamp::start_of_day`] in a manual accessor when the
/// date should follow the viewer's calendar.
impl QueryTimestamp for NaiveDate {
    fn to_timestamp(&self) -> Timestamp {
        let midnight = self.and_time(chrono::NaiveTime::MIN);
        Timestamp(midnight.and_utc().timestamp_millis())
    }
}
