//! Filter operators.

use std::cmp::Ordering;
use std::fmt;

/// How a filter compares a record's field with the filter value.
///
/// Dropdown controls use `Eq`, multi-select controls `In`. The ordering
/// operators work on numbers and dates (amount at least X, due before Y) and
/// fall back to byte order for strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Eq,
    Ne,
    StartsWith,
    EndsWith,
    Contains,
    /// Field matches a compiled pattern.
    Regex,
    Gt,
    Gte,
    Lt,
    Lte,
    /// Field equals one of a set of strings or enum discriminants.
    In,
}

impl Op {
    /// Whether `ordering` (field compared to filter value) satisfies this
    /// operator. Operators that do not order, such as `Contains`, never do.
    pub fn eval_ordering(self, ordering: Ordering) -> bool {
        use Ordering::*;
        match self {
            Op::Eq => ordering == Equal,
            Op::Ne => ordering != Equal,
            Op::Gt => ordering == Greater,
            Op::Gte => matches!(ordering, Greater | Equal),
            Op::Lt => ordering == Less,
            Op::Lte => matches!(ordering, Less | Equal),
            Op::StartsWith | Op::EndsWith | Op::Contains | Op::Regex | Op::In => false,
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Op::Eq => "=",
            Op::Ne => "!=",
            Op::StartsWith => "starts with",
            Op::EndsWith => "ends with",
            Op::Contains => "contains",
            Op::Regex => "~",
            Op::Gt => ">",
            Op::Gte => ">=",
            Op::Lt => "<",
            Op::Lte => "<=",
            Op::In => "in",
        };
        f.write_str(symbol)
    }
}
