//! [`LikePattern`] definition.

use derive_more::Display;
use postgres_types::{FromSql, ToSql};

/// `ILIKE` pattern matching the given text anywhere in a value.
#[derive(Clone, Debug, Display, Eq, FromSql, PartialEq, ToSql)]
#[postgres(transparent)]
pub struct LikePattern(String);

impl LikePattern {
    /// Creates a new [`LikePattern`] matching the given `needle` literally.
    #[must_use]
    pub fn contains(needle: &str) -> Self {
        Self(format!(
            "%{}%",
            needle
                .replace('\\', r"\\")
                .replace('%', r"\%")
                .replace('_', r"\_"),
        ))
    }
}

#[cfg(test)]
mod spec {
    use super::LikePattern;

    #[test]
    fn escapes_wildcards() {
        assert_eq!(LikePattern::contains("doe").to_string(), "%doe%");
        assert_eq!(
            LikePattern::contains(r"50%_a\b").to_string(),
            r"%50\%\_a\\b%",
        );
    }
}
