//! Attribute parsing for the Queryable derive macro.
//!
//! This module provides parsers for the `#[query(...)]` field attributes
//! used by the `Queryable` derive macro.

use proc_macro2::Span;
use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Attribute, Error, Ident, Lit, Meta, Result, Token,
};

/// How a field's value is exposed to queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// `#[query(String)]`
    String,
    /// `#[query(Number)]`
    Number,
    /// `#[query(Timestamp)]`
    Timestamp,
    /// `#[query(Enum)]`
    Enum,
    /// `#[query(Bool)]`
    Bool,
}

impl FieldKind {
    fn parse(name: &str, span: Span) -> Result<Self> {
        match name {
            "String" | "string" => Ok(FieldKind::String),
            "Number" | "number" => Ok(FieldKind::Number),
            "Timestamp" | "timestamp" => Ok(FieldKind::Timestamp),
            "Enum" | "enum" | "enumeration" => Ok(FieldKind::Enum),
            "Bool" | "bool" | "boolean" => Ok(FieldKind::Bool),
            other => Err(Error::new(
                span,
                format!(
                    "unknown query field kind: '{}'. Expected one of: String, Number, Timestamp, Enum, Bool",
                    other
                ),
            )),
        }
    }

    fn from_ident(ident: &Ident) -> Result<Self> {
        FieldKind::parse(&ident.to_string(), ident.span())
    }
}

/// Field-level attributes from `#[query(...)]`.
#[derive(Debug, Clone)]
pub struct QueryAttr {
    pub kind: Option<FieldKind>,
    pub skip: bool,
    /// Field is an `Option<T>`; `None` resolves to `Value::None`.
    pub optional: bool,
    /// Field type implements `Queryable`; `name.rest` lookups delegate to it.
    pub nested: bool,
    /// Custom field name for queries (default: field name).
    pub rename: Option<String>,
    pub span: Span,
}

impl Default for QueryAttr {
    fn default() -> Self {
        QueryAttr {
            kind: None,
            skip: false,
            optional: false,
            nested: false,
            rename: None,
            span: Span::call_site(),
        }
    }
}

impl QueryAttr {
    /// Whether the derive should generate an accessor arm for this field.
    pub fn is_exposed(&self) -> bool {
        !self.skip && (self.kind.is_some() || self.nested)
    }
}

fn string_literal(value: &syn::Expr, what: &str) -> Result<syn::LitStr> {
    match value {
        syn::Expr::Lit(syn::ExprLit {
            lit: Lit::Str(s), ..
        }) => Ok(s.clone()),
        other => Err(Error::new(
            other.span(),
            format!("{} must be a string literal", what),
        )),
    }
}

impl Parse for QueryAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = QueryAttr::default();

        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                Meta::Path(p) if p.is_ident("skip") => attr.skip = true,
                Meta::Path(p) if p.is_ident("optional") => attr.optional = true,
                Meta::Path(p) if p.is_ident("nested") => {
                    attr.nested = true;
                    attr.span = p.span();
                }
                Meta::Path(p) => {
                    let ident = p.get_ident().ok_or_else(|| {
                        Error::new(
                            p.span(),
                            "expected field kind (String, Number, Timestamp, Enum, Bool), nested, optional or skip",
                        )
                    })?;
                    attr.kind = Some(FieldKind::from_ident(ident)?);
                    attr.span = ident.span();
                }
                Meta::NameValue(nv) if nv.path.is_ident("rename") => {
                    attr.rename = Some(string_literal(&nv.value, "rename")?.value());
                }
                Meta::NameValue(nv) if nv.path.is_ident("ty") => {
                    // ty = "bool" for kinds that are keywords
                    let s = string_literal(&nv.value, "ty")?;
                    attr.kind = Some(FieldKind::parse(&s.value(), s.span())?);
                    attr.span = s.span();
                }
                Meta::NameValue(nv) => {
                    return Err(Error::new(
                        nv.path.span(),
                        "unknown attribute. Expected: rename or ty",
                    ));
                }
                Meta::List(list) => {
                    return Err(Error::new(
                        list.span(),
                        "unknown query attribute. Expected: String, Number, Timestamp, Enum, Bool, nested, optional, skip, rename = \"...\", or ty = \"...\"",
                    ));
                }
            }
        }

        if attr.nested && attr.kind.is_some() {
            return Err(Error::new(
                attr.span,
                "a nested field delegates to its own Queryable impl and cannot also declare a kind",
            ));
        }

        Ok(attr)
    }
}

/// Extract `#[query(...)]` attributes from a field's attributes.
pub fn parse_query_attrs(attrs: &[Attribute]) -> Result<QueryAttr> {
    for attr in attrs {
        if attr.path().is_ident("query") {
            return attr.parse_args::<QueryAttr>();
        }
    }
    Ok(QueryAttr::default())
}
