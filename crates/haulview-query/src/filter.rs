//! Field-level filters.
//!
//! A [`Filter`] is one inclusion rule: a field name, a test (an [`Op`] or an
//! arbitrary predicate) and the value to test against. A record whose field
//! resolves to [`Value::None`] never passes a filter, whatever the test.

use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::op::Op;
use crate::value::{Number, Timestamp, Value};

/// Selection value that means "no constraint" for a filter control.
pub const ALL: &str = "all";

/// Custom filter predicate: `(field value, filter value) -> passes`.
pub type Predicate = Arc<dyn Fn(&Value<'_>, &ClauseValue) -> bool + Send + Sync>;

/// How a filter decides whether a field value passes.
#[derive(Clone)]
pub enum Test {
    /// Built-in comparison operator.
    Op(Op),
    /// Caller-supplied predicate.
    Predicate(Predicate),
}

impl fmt::Debug for Test {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Test::Op(op) => write!(f, "Op({op})"),
            Test::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// A single field-level inclusion rule.
///
/// ```
/// use haulview_query::{Filter, Op, Value};
///
/// let filter = Filter::new("status", Op::Eq, "paid");
/// assert!(filter.matches(&Value::String("paid")));
/// assert!(!filter.matches(&Value::None));
///
/// // The "all" selection produces no filter at all.
/// assert!(Filter::selection("status", "all").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct Filter {
    /// Field path, e.g. `type` or `customer.name`.
    pub field: String,
    pub test: Test,
    pub value: ClauseValue,
}

impl Filter {
    /// Creates an operator filter.
    pub fn new(field: impl Into<String>, op: Op, value: impl Into<ClauseValue>) -> Self {
        Filter {
            field: field.into(),
            test: Test::Op(op),
            value: value.into(),
        }
    }

    /// Creates a filter backed by a custom predicate.
    pub fn predicate<P>(field: impl Into<String>, value: impl Into<ClauseValue>, predicate: P) -> Self
    where
        P: Fn(&Value<'_>, &ClauseValue) -> bool + Send + Sync + 'static,
    {
        Filter {
            field: field.into(),
            test: Test::Predicate(Arc::new(predicate)),
            value: value.into(),
        }
    }

    /// Equality filter from a dropdown selection.
    ///
    /// Returns `None` when the selection is blank or the [`ALL`] sentinel
    /// (compared case-insensitively), since those mean "no constraint".
    pub fn selection(field: impl Into<String>, selection: &str) -> Option<Self> {
        if is_unconstrained(selection) {
            return None;
        }
        Some(Filter::new(field, Op::Eq, selection))
    }

    /// Evaluates this filter against a resolved field value.
    pub fn matches(&self, field_value: &Value<'_>) -> bool {
        if field_value.is_none() {
            return false;
        }
        match &self.test {
            Test::Predicate(predicate) => predicate(field_value, &self.value),
            Test::Op(op) => match_op(*op, &self.value, field_value),
        }
    }
}

/// Returns `true` for selections that leave a control unconstrained.
pub fn is_unconstrained(selection: &str) -> bool {
    let selection = selection.trim();
    selection.is_empty() || selection.eq_ignore_ascii_case(ALL)
}

fn match_op(op: Op, clause: &ClauseValue, field: &Value<'_>) -> bool {
    match (clause, field) {
        (ClauseValue::String(pattern), Value::String(s)) => match_string(op, s, pattern),
        (ClauseValue::Regex(regex), Value::String(s)) => op == Op::Regex && regex.is_match(s),
        (ClauseValue::StringSet(set), Value::String(s)) => {
            op == Op::In && set.iter().any(|candidate| candidate == s)
        }
        (ClauseValue::Number(clause_num), Value::Number(field_num)) => field_num
            .compare(*clause_num)
            .is_some_and(|ordering| op.eval_ordering(ordering)),
        (ClauseValue::Timestamp(clause_ts), field) => field
            .coerce_timestamp()
            .is_some_and(|field_ts| op.eval_ordering(field_ts.cmp(clause_ts))),
        (ClauseValue::Enum(clause_disc), Value::Enum(field_disc)) => match op {
            Op::Eq => field_disc == clause_disc,
            Op::Ne => field_disc != clause_disc,
            _ => false,
        },
        (ClauseValue::EnumSet(set), Value::Enum(field_disc)) => {
            op == Op::In && set.contains(field_disc)
        }
        (ClauseValue::Bool(clause_bool), Value::Bool(field_bool)) => match op {
            Op::Eq => field_bool == clause_bool,
            Op::Ne => field_bool != clause_bool,
            _ => false,
        },
        _ => false,
    }
}

fn match_string(op: Op, field: &str, pattern: &str) -> bool {
    match op {
        Op::Eq => field == pattern,
        Op::Ne => field != pattern,
        Op::StartsWith => field.starts_with(pattern),
        Op::EndsWith => field.ends_with(pattern),
        Op::Contains => field.contains(pattern),
        Op::Gt | Op::Gte | Op::Lt | Op::Lte => op.eval_ordering(field.cmp(pattern)),
        _ => false,
    }
}

/// Owned value a filter compares against.
#[derive(Debug, Clone)]
pub enum ClauseValue {
    String(String),
    /// Set of strings (for `In`).
    StringSet(Vec<String>),
    Number(Number),
    Timestamp(Timestamp),
    /// Single enum discriminant.
    Enum(u32),
    /// Set of enum discriminants (for `In`).
    EnumSet(Vec<u32>),
    Bool(bool),
    /// Compiled regular expression.
    Regex(Regex),
}

impl ClauseValue {
    /// Extracts the string value, if this is a `String`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ClauseValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<String> for ClauseValue {
    fn from(s: String) -> Self {
        ClauseValue::String(s)
    }
}

impl From<&str> for ClauseValue {
    fn from(s: &str) -> Self {
        ClauseValue::String(s.to_string())
    }
}

impl From<Vec<String>> for ClauseValue {
    fn from(v: Vec<String>) -> Self {
        ClauseValue::StringSet(v)
    }
}

impl From<Vec<&str>> for ClauseValue {
    fn from(v: Vec<&str>) -> Self {
        ClauseValue::StringSet(v.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<u32>> for ClauseValue {
    fn from(v: Vec<u32>) -> Self {
        ClauseValue::EnumSet(v)
    }
}

impl From<Number> for ClauseValue {
    fn from(n: Number) -> Self {
        ClauseValue::Number(n)
    }
}

impl From<Timestamp> for ClauseValue {
    fn from(t: Timestamp) -> Self {
        ClauseValue::Timestamp(t)
    }
}

impl From<bool> for ClauseValue {
    fn from(b: bool) -> Self {
        ClauseValue::Bool(b)
    }
}

impl From<Regex> for ClauseValue {
    fn from(r: Regex) -> Self {
        ClauseValue::Regex(r)
    }
}

macro_rules! clause_number_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for ClauseValue {
                fn from(n: $ty) -> Self {
                    ClauseValue::Number(Number::from(n))
                }
            }
        )*
    };
}

clause_number_from!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);
