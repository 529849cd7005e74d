//! Value types carried by a `MatchDetail`.

use serde::{Deserialize, Serialize};
use time::Date;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// Tags how a bound value should be interpreted by downstream formatting
/// and joins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    Term,
    Entity,
    PosTerm,
    Date,
    Dependency,
}

/// The value carried by a `MatchDetail`: a string for `TERM`/`ENTITY`/
/// `POS_TERM`/`DEPENDENCY`, a date for `DATE`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchValue {
    Text(String),
    Date(#[serde(with = "iso_date")] Date),
}

impl MatchValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MatchValue::Text(s) => Some(s.as_str()),
            MatchValue::Date(_) => None,
        }
    }

    pub fn as_date(&self) -> Option<Date> {
        match self {
            MatchValue::Date(d) => Some(*d),
            MatchValue::Text(_) => None,
        }
    }
}

impl std::fmt::Display for MatchValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchValue::Text(s) => write!(f, "{s}"),
            MatchValue::Date(d) => write!(f, "{d}"),
        }
    }
}

/// Normalize a variable name to begin with exactly one `?` prefix.
///
/// This is the single place that performs this normalization; every
/// executor that binds a variable is expected to route the name through
/// here before attaching it to a `MatchDetail`.
pub fn normalize_variable_name(raw: &str) -> String {
    let trimmed = raw.trim_start_matches('?');
    format!("?{trimmed}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_bare_and_prefixed_names() {
        assert_eq!(normalize_variable_name("p"), "?p");
        assert_eq!(normalize_variable_name("?p"), "?p");
        assert_eq!(normalize_variable_name("??p"), "?p");
    }
}
