//! Sort keys and type-aware value comparison.
//!
//! Every present value falls into one class, and classes sort in this order:
//!
//! | Class | Members | Order within |
//! |-------|---------|--------------|
//! | date | timestamps, strings that parse as dates | epoch milliseconds |
//! | number | numbers, strings that parse as finite numbers | exact numeric, NaN last |
//! | text | every other string | accent- and case-folded, ties by code point |
//! | enum | enum discriminants | discriminant |
//! | bool | booleans | `false` first |
//!
//! A column that mixes `12`, `"7"` and `"code-3"` therefore sorts `"7"`,
//! `12`, `"code-3"`, and the comparison stays a total order however messy the
//! rows are. [`Value::None`] always sorts last, whatever the direction.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::QueryError;
use crate::value::{Number, Timestamp, Value};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dir {
    #[default]
    Asc,
    Desc,
}

impl Dir {
    /// The opposite direction.
    pub fn toggle(self) -> Dir {
        match self {
            Dir::Asc => Dir::Desc,
            Dir::Desc => Dir::Asc,
        }
    }

    /// Applies this direction to an ascending ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Asc => ordering,
            Dir::Desc => ordering.reverse(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "asc",
            Dir::Desc => "desc",
        }
    }
}

impl std::fmt::Display for Dir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dir {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Dir::Asc),
            "desc" | "descending" => Ok(Dir::Desc),
            _ => Err(QueryError::UnknownDirection(s.to_string())),
        }
    }
}

/// A sort key: field path plus direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub field: String,
    pub dir: Dir,
}

impl Sort {
    pub fn new(field: impl Into<String>, dir: Dir) -> Self {
        Sort {
            field: field.into(),
            dir,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Sort::new(field, Dir::Asc)
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Sort::new(field, Dir::Desc)
    }

    /// Compares two field values under this key. Missing values go last.
    pub fn compare(&self, a: &Value<'_>, b: &Value<'_>) -> Ordering {
        match (a.is_none(), b.is_none()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => self.dir.apply(compare_values(a, b)),
        }
    }
}

/// Ascending comparison of two values under the rules in the module docs.
pub fn compare_values(a: &Value<'_>, b: &Value<'_>) -> Ordering {
    match (SortKey::of(a), SortKey::of(b)) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => a.compare(&b),
    }
}

/// A present value placed in its sort class.
#[derive(Debug, Clone, Copy)]
enum SortKey<'a> {
    Date(Timestamp),
    Number(Number),
    Text(&'a str),
    Enum(u32),
    Bool(bool),
}

impl<'a> SortKey<'a> {
    fn of(value: &Value<'a>) -> Option<Self> {
        let key = match *value {
            Value::None => return None,
            Value::Timestamp(t) => SortKey::Date(t),
            Value::Number(n) => SortKey::Number(n),
            Value::Enum(d) => SortKey::Enum(d),
            Value::Bool(b) => SortKey::Bool(b),
            Value::String(s) => {
                if let Some(t) = Timestamp::parse(s) {
                    SortKey::Date(t)
                } else if let Some(n) = s.trim().parse::<f64>().ok().filter(|n| n.is_finite()) {
                    SortKey::Number(Number::F64(n))
                } else {
                    SortKey::Text(s)
                }
            }
        };
        Some(key)
    }

    fn class(&self) -> u8 {
        match self {
            SortKey::Date(_) => 0,
            SortKey::Number(_) => 1,
            SortKey::Text(_) => 2,
            SortKey::Enum(_) => 3,
            SortKey::Bool(_) => 4,
        }
    }

    fn compare(&self, other: &SortKey<'_>) -> Ordering {
        match (self, other) {
            (SortKey::Date(a), SortKey::Date(b)) => a.cmp(b),
            (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(*b),
            (SortKey::Text(a), SortKey::Text(b)) => locale_cmp(a, b),
            (SortKey::Enum(a), SortKey::Enum(b)) => a.cmp(b),
            (SortKey::Bool(a), SortKey::Bool(b)) => a.cmp(b),
            _ => self.class().cmp(&other.class()),
        }
    }
}

/// Locale-style string ordering: transliterate to ASCII, fold case, and fall
/// back to code-point order so distinct strings never tie.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}

fn collation_key(s: &str) -> String {
    deunicode::deunicode(s).to_lowercase()
}

/// Compares two records by a list of sort keys, primary key first.
pub fn compare_by_sorts<T, F>(a: &T, b: &T, sorts: &[Sort], accessor: &F) -> Ordering
where
    for<'a> F: Fn(&'a T, &str) -> Value<'a>,
{
    for sort in sorts {
        let ordering = sort.compare(&accessor(a, &sort.field), &accessor(b, &sort.field));
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dir_toggle_and_apply() {
        assert_eq!(Dir::Asc.toggle(), Dir::Desc);
        assert_eq!(Dir::Desc.toggle(), Dir::Asc);
        assert_eq!(Dir::Desc.apply(Ordering::Less), Ordering::Greater);
        assert_eq!(Dir::Asc.apply(Ordering::Less), Ordering::Less);
    }

    #[test]
    fn dir_parse() {
        assert_eq!("asc".parse::<Dir>().unwrap(), Dir::Asc);
        assert_eq!("DESC".parse::<Dir>().unwrap(), Dir::Desc);
        assert!(matches!(
            "sideways".parse::<Dir>(),
            Err(QueryError::UnknownDirection(_))
        ));
    }

    #[test]
    fn strings_compare_case_and_accent_insensitively() {
        assert_eq!(locale_cmp("apple", "Banana"), Ordering::Less);
        assert_eq!(locale_cmp("Émile", "Eric"), Ordering::Less);
        assert_eq!(locale_cmp("zebra", "Ängel"), Ordering::Greater);
        assert_ne!(locale_cmp("a", "A"), Ordering::Equal);
    }

    #[test]
    fn timestamps_and_numbers() {
        assert_eq!(
            compare_values(
                &Value::Timestamp(Timestamp(1)),
                &Value::Timestamp(Timestamp(2))
            ),
            Ordering::Less
        );
        assert_eq!(
            compare_values(
                &Value::Number(Number::I64(10)),
                &Value::Number(Number::F64(2.5))
            ),
            Ordering::Greater
        );
    }

    #[test]
    fn strings_join_the_class_they_parse_as() {
        assert_eq!(
            compare_values(&Value::String("12"), &Value::Number(Number::I64(3))),
            Ordering::Greater
        );
        assert_eq!(
            compare_values(&Value::String("9"), &Value::String("10")),
            Ordering::Less
        );
        assert_eq!(
            compare_values(
                &Value::String("2024-01-10"),
                &Value::Timestamp(Timestamp(0))
            ),
            Ordering::Greater
        );
        // non-finite spellings stay text
        assert_eq!(
            compare_values(&Value::String("NaN"), &Value::String("nano")),
            Ordering::Less
        );
    }

    #[test]
    fn classes_order_dates_numbers_text_enums_bools() {
        let ordered = [
            Value::String("1970-01-01"),
            Value::Timestamp(Timestamp(86_400_000)),
            Value::Number(Number::I64(-5)),
            Value::String("7"),
            Value::Number(Number::F64(f64::NAN)),
            Value::String("code-1"),
            Value::String("n/a"),
            Value::Enum(0),
            Value::Bool(false),
            Value::Bool(true),
            Value::None,
        ];
        for (i, a) in ordered.iter().enumerate() {
            for (j, b) in ordered.iter().enumerate() {
                assert_eq!(compare_values(a, b), i.cmp(&j), "{a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn uncomparable_pairs_no_longer_tie() {
        // "code-1" < "code-9" as text, so a number cannot equal both
        let low = Value::String("code-1");
        let high = Value::String("code-9");
        let five = Value::Number(Number::I64(5));
        assert_eq!(compare_values(&low, &high), Ordering::Less);
        assert_eq!(compare_values(&five, &low), Ordering::Less);
        assert_eq!(compare_values(&five, &high), Ordering::Less);
    }

    #[test]
    fn none_sorts_last_in_both_directions() {
        let some = Value::Number(Number::I64(1));
        for sort in [Sort::asc("x"), Sort::desc("x")] {
            assert_eq!(sort.compare(&Value::None, &some), Ordering::Greater);
            assert_eq!(sort.compare(&some, &Value::None), Ordering::Less);
            assert_eq!(sort.compare(&Value::None, &Value::None), Ordering::Equal);
        }
    }

    #[test]
    fn compare_by_multiple_sorts() {
        struct Stop {
            city: &'static str,
            sequence: i64,
        }

        fn accessor<'a>(stop: &'a Stop, field: &str) -> Value<'a> {
            match field {
                "city" => Value::String(stop.city),
                "sequence" => Value::Number(Number::I64(stop.sequence)),
                _ => Value::None,
            }
        }

        let a = Stop { city: "Lyon", sequence: 2 };
        let b = Stop { city: "Lyon", sequence: 1 };
        let c = Stop { city: "Arles", sequence: 9 };
        let sorts = [Sort::asc("city"), Sort::desc("sequence")];

        assert_eq!(compare_by_sorts(&a, &b, &sorts, &accessor), Ordering::Less);
        assert_eq!(compare_by_sorts(&c, &a, &sorts, &accessor), Ordering::Less);
    }
}
