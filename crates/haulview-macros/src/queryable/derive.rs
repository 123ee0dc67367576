//! Implementation of the `#[derive(Queryable)]` macro.
//!
//! Generates a `Queryable` impl and field-name constants for type-safe query
//! building.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{spanned::Spanned, Data, DeriveInput, Error, Fields, Result};

use super::attrs::{parse_query_attrs, FieldKind};

pub fn queryable_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new(
                    input.span(),
                    "Queryable can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new(
                input.span(),
                "Queryable can only be derived for structs",
            ))
        }
    };

    let mut field_matches: Vec<TokenStream> = Vec::new();
    let mut nested_lookups: Vec<TokenStream> = Vec::new();
    let mut field_constants: Vec<TokenStream> = Vec::new();

    for field in fields.iter() {
        let field_name = field
            .ident
            .as_ref()
            .ok_or_else(|| Error::new(field.span(), "expected named field"))?;

        let attrs = parse_query_attrs(&field.attrs)?;
        if !attrs.is_exposed() {
            continue;
        }

        let query_name = attrs.rename.unwrap_or_else(|| field_name.to_string());
        let const_name = format_ident!("{}", to_screaming_snake_case(&query_name));
        field_constants.push(quote! {
            /// Field name constant for type-safe queries.
            pub const #const_name: &'static str = #query_name;
        });

        // `by_ref` borrows the field value, `by_val` copies it out.
        let (by_ref, by_val) = if attrs.optional {
            (quote! { v }, quote! { *v })
        } else {
            (quote! { &self.#field_name }, quote! { self.#field_name })
        };

        let wrap = |expr: TokenStream| {
            if attrs.optional {
                quote! {
                    match self.#field_name {
                        ::core::option::Option::Some(ref v) => #expr,
                        ::core::option::Option::None => ::haulview_query::Value::None,
                    }
                }
            } else {
                expr
            }
        };

        if attrs.nested {
            let prefix = format!("{}.", query_name);
            let lookup = wrap(quote! {
                ::haulview_query::Queryable::field_value(#by_ref, rest)
            });
            nested_lookups.push(quote! {
                if let ::core::option::Option::Some(rest) = field.strip_prefix(#prefix) {
                    return #lookup;
                }
            });
            continue;
        }

        let value_expr = match attrs.kind {
            Some(FieldKind::String) => quote! { ::haulview_query::Value::String(#by_ref) },
            Some(FieldKind::Number) => quote! {
                ::haulview_query::Value::Number(::haulview_query::Number::from(#by_val))
            },
            Some(FieldKind::Timestamp) => quote! {
                ::haulview_query::Value::Timestamp(
                    ::haulview_query::QueryTimestamp::to_timestamp(#by_ref)
                )
            },
            Some(FieldKind::Enum) => quote! {
                ::haulview_query::Value::Enum(
                    ::haulview_query::QueryEnum::discriminant(#by_ref)
                )
            },
            Some(FieldKind::Bool) => quote! { ::haulview_query::Value::Bool(#by_val) },
            None => continue,
        };
        let value_expr = wrap(value_expr);

        field_matches.push(quote! {
            #query_name => #value_expr,
        });
    }

    let expanded = quote! {
        impl #impl_generics #struct_name #ty_generics #where_clause {
            #(#field_constants)*
        }

        impl #impl_generics ::haulview_query::Queryable for #struct_name #ty_generics #where_clause {
            fn field_value(&self, field: &str) -> ::haulview_query::Value<'_> {
                match field {
                    #(#field_matches)*
                    _ => {
                        #(#nested_lookups)*
                        ::haulview_query::Value::None
                    }
                }
            }
        }
    };

    Ok(expanded)
}

/// Convert a field name to SCREAMING_SNAKE_CASE.
///
/// Dots from renamed nested paths become underscores.
fn to_screaming_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    let mut prev_was_lower = false;

    for c in s.chars() {
        if c.is_uppercase() {
            if prev_was_lower {
                result.push('_');
            }
            result.push(c);
            prev_was_lower = false;
        } else if c == '_' || c == '-' || c == '.' {
            result.push('_');
            prev_was_lower = false;
        } else {
            result.push(c.to_ascii_uppercase());
            prev_was_lower = true;
        }
    }

    result
}
