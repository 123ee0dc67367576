//! Derive macro for haulview-query.
//!
//! - [`Queryable`] - Generate a `Queryable` impl from struct field annotations
//!
//! See `haulview-query/tests/list_views.rs` for the derive used end to end.

mod queryable;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derives `haulview_query::Queryable` for a struct with named fields.
///
/// Each annotated field becomes a queryable field, and a
/// `SCREAMING_SNAKE_CASE` constant holding its query name is added to the
/// struct so call sites avoid stringly-typed field names.
///
/// # Field Attributes
///
/// | Attribute | Field type | Produces |
/// |-----------|------------|----------|
/// | `#[query(String)]` | `String`, `&str` | `Value::String` |
/// | `#[query(Number)]` | integers, floats | `Value::Number` |
/// | `#[query(Timestamp)]` | any `QueryTimestamp` | `Value::Timestamp` |
/// | `#[query(Enum)]` | any `QueryEnum` | `Value::Enum` |
/// | `#[query(Bool)]` | `bool` | `Value::Bool` |
/// | `#[query(nested)]` | any `Queryable` | `field.rest` lookups |
///
/// Modifiers:
///
/// - `optional`: the field is an `Option<T>` of the declared kind; `None`
///   becomes `Value::None`
/// - `rename = "name"`: query name differs from the field name
/// - `ty = "bool"`: spell the kind as a string
/// - `skip`: never expose the field
///
/// Fields without a `#[query]` attribute are not queryable.
///
/// # Example
///
/// ```ignore
/// use haulview_macros::Queryable;
/// use haulview_query::{Query, Timestamp};
///
/// #[derive(Queryable)]
/// struct Customer {
///     #[query(String)]
///     name: String,
/// }
///
/// #[derive(Queryable)]
/// struct Invoice {
///     #[query(String, rename = "invoiceNumber")]
///     number: String,
///
///     #[query(Number)]
///     amount: f64,
///
///     #[query(Timestamp, optional, rename = "dueDate")]
///     due: Option<Timestamp>,
///
///     #[query(nested)]
///     customer: Customer,
///
///     #[query(skip)]
///     internal_ref: String,
/// }
///
/// let page = Query::new()
///     .search("acme", ["customer.name", Invoice::INVOICE_NUMBER])
///     .order_desc(Invoice::AMOUNT)
///     .execute(&invoices, Invoice::accessor);
/// ```
#[proc_macro_derive(Queryable, attributes(query))]
pub fn queryable_derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    queryable::queryable_derive_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
