//! Untyped JSON rows as records.
//!
//! Lets the engine run over `serde_json::Value` rows the way list screens hold
//! whatever the data source returned. Field paths are dotted (`customer.name`)
//! and array elements are addressed by index (`stops.0.city`).

use serde_json::Value as Json;

use crate::traits::Queryable;
use crate::value::{Number, Value};

/// Follows a dotted path through nested objects and arrays.
pub fn resolve_path<'a>(root: &'a Json, path: &str) -> Option<&'a Json> {
    if path.is_empty() {
        return None;
    }
    path.split('.').try_fold(root, |node, segment| match node {
        Json::Object(map) => map.get(segment),
        Json::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Converts a JSON leaf into a query value.
///
/// Objects, arrays and `null` have no comparable value and become
/// [`Value::None`]. Date strings stay strings; date filters and sorts coerce
/// them on demand.
pub fn json_value(json: &Json) -> Value<'_> {
    match json {
        Json::String(s) => Value::String(s),
        Json::Bool(b) => Value::Bool(*b),
        Json::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Number(Number::I64(i))
            } else if let Some(u) = n.as_u64() {
                Value::Number(Number::U64(u))
            } else {
                n.as_f64()
                    .map_or(Value::None, |f| Value::Number(Number::F64(f)))
            }
        }
        Json::Null | Json::Object(_) | Json::Array(_) => Value::None,
    }
}

impl Queryable for Json {
    fn field_value(&self, field: &str) -> Value<'_> {
        resolve_path(self, field).map_or(Value::None, json_value)
    }
}
