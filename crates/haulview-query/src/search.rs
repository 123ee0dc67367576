//! Free-text search across a set of text fields.

use crate::value::Value;

/// Case-insensitive substring search OR'd across text fields.
///
/// A blank term matches every record. Otherwise a record matches when at
/// least one listed field resolves to a string containing the term; fields
/// that are missing or not strings never match.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Search {
    needle: String,
    fields: Vec<String>,
}

impl Search {
    /// The term is trimmed and lowercased once, up front.
    pub fn new<I, S>(term: &str, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Search {
            needle: term.trim().to_lowercase(),
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.needle.is_empty()
    }

    /// The normalized search term.
    pub fn term(&self) -> &str {
        &self.needle
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn matches<T, F>(&self, item: &T, accessor: &F) -> bool
    where
        for<'a> F: Fn(&'a T, &str) -> Value<'a>,
    {
        if self.is_blank() {
            return true;
        }
        self.fields.iter().any(|field| match accessor(item, field) {
            Value::String(text) => text.to_lowercase().contains(&self.needle),
            _ => false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Activity {
        subject: &'static str,
        description: Option<&'static str>,
    }

    fn accessor<'a>(activity: &'a Activity, field: &str) -> Value<'a> {
        match field {
            "subject" => Value::String(activity.subject),
            "description" => activity.description.map_or(Value::None, Value::String),
            _ => Value::None,
        }
    }

    #[test]
    fn blank_term_matches_everything() {
        let activity = Activity {
            subject: "",
            description: None,
        };
        assert!(Search::new("", ["subject"]).matches(&activity, &accessor));
        assert!(Search::new("   ", ["subject"]).matches(&activity, &accessor));
        assert!(Search::new("", Vec::<String>::new()).matches(&activity, &accessor));
    }

    #[test]
    fn matches_any_field_case_insensitively() {
        let activity = Activity {
            subject: "Quarterly review",
            description: Some("Discuss the Lyon DEPOT contract"),
        };
        let fields = ["subject", "description"];

        assert!(Search::new("REVIEW", fields).matches(&activity, &accessor));
        assert!(Search::new("depot", fields).matches(&activity, &accessor));
        assert!(Search::new("  lyon ", fields).matches(&activity, &accessor));
        assert!(!Search::new("invoice", fields).matches(&activity, &accessor));
    }

    #[test]
    fn missing_fields_do_not_match() {
        let activity = Activity {
            subject: "Call",
            description: None,
        };
        let search = Search::new("contract", ["description", "unknown"]);
        assert!(!search.matches(&activity, &accessor));
    }

    #[test]
    fn term_without_fields_matches_nothing() {
        let activity = Activity {
            subject: "Call",
            description: None,
        };
        assert!(!Search::new("call", Vec::<String>::new()).matches(&activity, &accessor));
    }
}
