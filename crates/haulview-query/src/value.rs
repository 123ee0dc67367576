//! Field values as the engine sees them.
//!
//! A [`Value`] is what a record's accessor hands back for a field name. It
//! borrows strings from the record, so resolving a field never allocates.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Runtime value of a record field, borrowed from the record.
///
/// # Example
///
/// ```
/// use haulview_query::{Number, Value};
///
/// struct Invoice {
///     number: String,
///     amount_cents: u64,
/// }
///
/// fn accessor<'a>(invoice: &'a Invoice, field: &str) -> Value<'a> {
///     match field {
///         "number" => Value::String(&invoice.number),
///         "amount" => Value::Number(Number::U64(invoice.amount_cents)),
///         _ => Value::None,
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value<'a> {
    /// Text borrowed from the record: names, statuses, references.
    String(&'a str),
    /// Amounts, weights, counts.
    Number(Number),
    /// Instant in time (milliseconds since Unix epoch).
    Timestamp(Timestamp),
    /// Discriminant from [`QueryEnum`](crate::QueryEnum); orders by value.
    Enum(u32),
    Bool(bool),
    /// Field missing, null, malformed or not queryable.
    None,
}

impl<'a> Value<'a> {
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<Timestamp> {
        match self {
            Value::Timestamp(t) => Some(*t),
            _ => None,
        }
    }

    /// Interprets the value as an instant.
    ///
    /// Timestamps pass through. Strings are parsed as RFC 3339, then as a
    /// naive `YYYY-MM-DDTHH:MM:SS` date-time, then as a bare `YYYY-MM-DD`
    /// date; naive forms are read as UTC. Everything else yields `None`.
    pub fn coerce_timestamp(&self) -> Option<Timestamp> {
        match self {
            Value::Timestamp(t) => Some(*t),
            Value::String(s) => Timestamp::parse(s),
            _ => None,
        }
    }

}

/// Numeric value that keeps integer precision where it can.
///
/// Comparisons are exact across variants: `u64::MAX` and `u64::MAX as f64`
/// are not equal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    I64(i64),
    U64(u64),
    F64(f64),
}

impl Number {
    fn is_nan(self) -> bool {
        matches!(self, Number::F64(f) if f.is_nan())
    }

    /// Numeric comparison for filters. `None` when NaN is involved.
    pub fn compare(self, other: Number) -> Option<Ordering> {
        if self.is_nan() || other.is_nan() {
            None
        } else {
            Some(self.total_cmp(other))
        }
    }

    /// Total order for sorting: exact numeric order, with `-0.0 == 0.0` and
    /// NaN after every other number.
    pub fn total_cmp(self, other: Number) -> Ordering {
        use Number::*;
        match (self, other) {
            (I64(a), I64(b)) => a.cmp(&b),
            (U64(a), U64(b)) => a.cmp(&b),
            (I64(a), U64(b)) => signed_vs_unsigned(a, b),
            (U64(a), I64(b)) => signed_vs_unsigned(b, a).reverse(),
            (F64(a), F64(b)) => float_cmp(a, b),
            (I64(i), F64(f)) => signed_vs_float(i, f),
            (F64(f), I64(i)) => signed_vs_float(i, f).reverse(),
            (U64(u), F64(f)) => unsigned_vs_float(u, f),
            (F64(f), U64(u)) => unsigned_vs_float(u, f).reverse(),
        }
    }
}

const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;
const TWO_POW_64: f64 = 18_446_744_073_709_551_616.0;

fn signed_vs_unsigned(a: i64, b: u64) -> Ordering {
    u64::try_from(a).map_or(Ordering::Less, |a| a.cmp(&b))
}

fn float_cmp(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// Compares the whole part exactly as an integer, then the fraction.
fn signed_vs_float(i: i64, f: f64) -> Ordering {
    if f.is_nan() || f >= TWO_POW_63 {
        return Ordering::Less;
    }
    if f < -TWO_POW_63 {
        return Ordering::Greater;
    }
    let whole = f.trunc();
    i.cmp(&(whole as i64)).then_with(|| float_cmp(0.0, f - whole))
}

fn unsigned_vs_float(u: u64, f: f64) -> Ordering {
    if f.is_nan() || f >= TWO_POW_64 {
        return Ordering::Less;
    }
    if f < 0.0 {
        return Ordering::Greater;
    }
    let whole = f.trunc();
    u.cmp(&(whole as u64)).then_with(|| float_cmp(0.0, f - whole))
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.compare(*other)
    }
}

macro_rules! number_from {
    ($variant:ident as $wide:ty: $($ty:ty),*) => {
        $(
            impl From<$ty> for Number {
                fn from(n: $ty) -> Self {
                    Number::$variant(n as $wide)
                }
            }
        )*
    };
}

number_from!(I64 as i64: i8, i16, i32, i64, isize);
number_from!(U64 as u64: u8, u16, u32, u64, usize);
number_from!(F64 as f64: f32, f64);

/// Instant represented as milliseconds since the Unix epoch.
///
/// Time zones only matter when a calendar window (today, this month, ...) is
/// resolved; once resolved, everything compares as plain milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn from_millis(millis: i64) -> Self {
        Timestamp(millis)
    }

    /// Converts a zoned date-time into a timestamp.
    pub fn from_datetime<Tz: TimeZone>(dt: &DateTime<Tz>) -> Self {
        Timestamp(dt.timestamp_millis())
    }

    /// Converts back to a UTC date-time, if the value is in chrono's range.
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.0)
    }

    /// Parses the textual date forms accepted by [`Value::coerce_timestamp`].
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(Timestamp::from_datetime(&dt));
        }
        for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(Timestamp(naive.and_utc().timestamp_millis()));
            }
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| Timestamp(naive.and_utc().timestamp_millis()))
    }
}

impl From<i64> for Timestamp {
    fn from(millis: i64) -> Self {
        Timestamp(millis)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Timestamp {
    fn from(dt: DateTime<Tz>) -> Self {
        Timestamp::from_datetime(&dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_getters_do_not_convert() {
        assert_eq!(Value::String("HV-1001").as_str(), Some("HV-1001"));
        assert_eq!(Value::Number(Number::I64(7)).as_str(), None);
        assert_eq!(
            Value::Timestamp(Timestamp(1000)).as_timestamp(),
            Some(Timestamp(1000))
        );
        assert_eq!(Value::String("2024-01-10").as_timestamp(), None);
        assert!(Value::None.is_none());
    }

    #[test]
    fn mixed_number_comparisons() {
        // beyond f64's exact integer range
        let big = u64::MAX - 1;
        assert_eq!(Number::U64(big).compare(Number::U64(big + 1)), Some(Ordering::Less));
        assert_eq!(Number::I64(-1).compare(Number::U64(0)), Some(Ordering::Less));
        assert_eq!(Number::U64(3).compare(Number::I64(2)), Some(Ordering::Greater));
        assert_eq!(Number::I64(250).compare(Number::F64(250.0)), Some(Ordering::Equal));
        assert!(Number::F64(f64::NAN).compare(Number::I64(1)).is_none());
    }

    #[test]
    fn integers_and_floats_compare_exactly() {
        // 2^53 + 1 has no f64 representation; the nearest float is 2^53
        let odd = (1i64 << 53) + 1;
        let float = Number::F64((1i64 << 53) as f64);
        assert_eq!(Number::I64(odd).total_cmp(float), Ordering::Greater);
        assert_eq!(float.total_cmp(Number::I64(odd)), Ordering::Less);
        assert_eq!(Number::U64(u64::MAX).total_cmp(Number::F64(u64::MAX as f64)), Ordering::Less);
        assert_eq!(Number::I64(i64::MIN).total_cmp(Number::F64(-1e19)), Ordering::Greater);

        assert_eq!(Number::I64(2).total_cmp(Number::F64(2.5)), Ordering::Less);
        assert_eq!(Number::I64(-2).total_cmp(Number::F64(-2.5)), Ordering::Greater);
        assert_eq!(Number::U64(0).total_cmp(Number::F64(-0.0)), Ordering::Equal);
        assert_eq!(Number::F64(-0.0).total_cmp(Number::F64(0.0)), Ordering::Equal);
    }

    #[test]
    fn nan_sorts_after_every_number() {
        let nan = Number::F64(f64::NAN);
        for n in [Number::I64(i64::MAX), Number::U64(u64::MAX), Number::F64(f64::INFINITY)] {
            assert_eq!(nan.total_cmp(n), Ordering::Greater);
            assert_eq!(n.total_cmp(nan), Ordering::Less);
        }
        assert_eq!(nan.total_cmp(nan), Ordering::Equal);
    }

    #[test]
    fn numbers_widen_by_signedness() {
        assert_eq!(Number::from(-3i8), Number::I64(-3));
        assert_eq!(Number::from(12u16), Number::U64(12));
        assert_eq!(Number::from(12.5f32), Number::F64(12.5));
        assert_eq!(Number::from(7usize), Number::U64(7));
    }

    #[test]
    fn timestamp_parse_forms() {
        // 2024-01-10T00:00:00Z
        let midnight = Timestamp(1_704_844_800_000);
        assert_eq!(Timestamp::parse("2024-01-10"), Some(midnight));
        assert_eq!(Timestamp::parse("2024-01-10T00:00:00Z"), Some(midnight));
        assert_eq!(Timestamp::parse("2024-01-10T00:00:00"), Some(midnight));
        assert_eq!(
            Timestamp::parse("2024-01-10T02:00:00+02:00"),
            Some(midnight)
        );
        assert_eq!(Timestamp::parse("last tuesday"), None);
        assert_eq!(Timestamp::parse(""), None);
    }

    #[test]
    fn coerce_timestamp_only_accepts_dates() {
        assert_eq!(
            Value::Timestamp(Timestamp(5)).coerce_timestamp(),
            Some(Timestamp(5))
        );
        assert!(Value::String("2024-02-30").coerce_timestamp().is_none());
        assert!(Value::Number(Number::I64(5)).coerce_timestamp().is_none());
        assert!(Value::None.coerce_timestamp().is_none());
    }

    #[test]
    fn timestamp_datetime_round_trip() {
        let dt = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let ts = Timestamp::from(dt);
        assert_eq!(ts.to_datetime(), Some(dt));
        assert_eq!(Timestamp::from_millis(ts.0), ts);
    }
}
