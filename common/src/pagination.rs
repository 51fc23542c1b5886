//! Abstractions for offset pagination.

use std::str::FromStr;

use derive_more::{Display, Error};

use crate::query::{Description, Mode, Window};

/// Requested number of items on a page.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Limit {
    /// At most the given number of items.
    ///
    /// Negative numbers are representable only to be rejected by
    /// [`Arguments::new()`].
    Bounded(i64),

    /// All the matching items.
    Unbounded,
}

impl FromStr for Limit {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("unbounded") {
            Ok(Self::Unbounded)
        } else {
            s.parse()
                .map(Self::Bounded)
                .map_err(|_| "expected an integer or `unbounded`")
        }
    }
}

/// Validated pagination arguments.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Arguments {
    /// Maximum number of items, if any.
    limit: Option<u64>,

    /// Number of items to skip.
    offset: u64,
}

impl Arguments {
    /// Creates new [`Arguments`] out of the requested [`Limit`] and `offset`.
    ///
    /// # Errors
    ///
    /// If either the [`Limit`] or the `offset` is negative.
    pub fn new(count: Limit, offset: i64) -> Result<Self, ArgumentsError> {
        use ArgumentsError as E;

        let limit = match count {
            Limit::Bounded(n) => {
                Some(u64::try_from(n).map_err(|_| E::NegativeCount(n))?)
            }
            Limit::Unbounded => None,
        };
        let offset =
            u64::try_from(offset).map_err(|_| E::NegativeOffset(offset))?;

        Ok(Self { limit, offset })
    }

    /// Returns the [`Window`] described by these [`Arguments`].
    #[must_use]
    pub fn window(&self) -> Window {
        Window {
            limit: self.limit,
            offset: self.offset,
        }
    }

    /// Applies these [`Arguments`] to the provided page [`Description`].
    ///
    /// Ordering of the [`Description`] is left untouched.
    ///
    /// # Errors
    ///
    /// If the [`Description`] is count-only, or has no ordering to page over.
    pub fn apply(
        &self,
        mut description: Description,
    ) -> Result<Description, ApplyError> {
        if description.is_count_only() {
            return Err(ApplyError::CountOnly);
        }
        if description.ordering.is_empty() {
            return Err(ApplyError::Unordered);
        }
        description.mode = Mode::Page {
            window: Some(self.window()),
        };
        Ok(description)
    }
}

/// Error of creating [`Arguments`].
#[derive(Clone, Copy, Debug, Display, Eq, Error, PartialEq)]
pub enum ArgumentsError {
    /// Requested page size is negative.
    #[display("`count` must not be negative, got {_0}")]
    NegativeCount(#[error(not(source))] i64),

    /// Requested offset is negative.
    #[display("`offset` must not be negative, got {_0}")]
    NegativeOffset(#[error(not(source))] i64),
}

/// Error of [`Arguments::apply()`].
#[derive(Clone, Copy, Debug, Display, Eq, Error, PartialEq)]
pub enum ApplyError {
    /// Count-only [`Description`]s are never paged.
    #[display("count-only query cannot be paginated")]
    CountOnly,

    /// [`Description`] has no ordering, so its pages are not stable.
    #[display("query must be ordered before being paginated")]
    Unordered,
}

/// Order of sorting.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    strum::Display,
    strum::EnumString,
    Eq,
    Hash,
    PartialEq,
)]
pub enum Order {
    /// Ascending order.
    #[strum(serialize = "ASC", ascii_case_insensitive)]
    Ascending,

    /// Descending order.
    #[default]
    #[strum(serialize = "DESC", ascii_case_insensitive)]
    Descending,
}

impl Order {
    /// Returns SQL keyword representing this [`Order`].
    #[must_use]
    pub const fn sql(&self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

#[cfg(test)]
mod spec {
    use crate::query::{Description, Fragments, Predicate, Sort, Window};

    use super::{ApplyError, Arguments, ArgumentsError, Limit, Order};

    fn ordered() -> Description {
        Description::page(
            "users",
            Fragments {
                predicates: vec![Predicate::eq("disabled", false)],
                joins: vec![],
            },
            vec![Sort {
                column: "user_id".into(),
                order: Order::Descending,
            }],
        )
    }

    #[test]
    fn rejects_negative_values() {
        assert_eq!(
            Arguments::new(Limit::Bounded(-1), 0),
            Err(ArgumentsError::NegativeCount(-1)),
        );
        assert_eq!(
            Arguments::new(Limit::Bounded(10), -5),
            Err(ArgumentsError::NegativeOffset(-5)),
        );
        assert_eq!(
            Arguments::new(Limit::Unbounded, -1),
            Err(ArgumentsError::NegativeOffset(-1)),
        );
    }

    #[test]
    fn parses_limit() {
        assert_eq!("20".parse::<Limit>(), Ok(Limit::Bounded(20)));
        assert_eq!("-3".parse::<Limit>(), Ok(Limit::Bounded(-3)));
        assert_eq!("Unbounded".parse::<Limit>(), Ok(Limit::Unbounded));
        assert!("twenty".parse::<Limit>().is_err());
    }

    #[test]
    fn applies_window_keeping_ordering() {
        let args = Arguments::new(Limit::Bounded(10), 30).unwrap();
        let desc = ordered();

        let paged = args.apply(desc.clone()).unwrap();

        assert_eq!(
            paged.window(),
            Some(Window {
                limit: Some(10),
                offset: 30,
            }),
        );
        assert_eq!(paged.ordering, desc.ordering);
        assert_eq!(paged.fragments, desc.fragments);
    }

    #[test]
    fn unbounded_has_no_limit() {
        let args = Arguments::new(Limit::Unbounded, 0).unwrap();

        let paged = args.apply(ordered()).unwrap();

        assert_eq!(paged.window().and_then(|w| w.limit), None);
    }

    #[test]
    fn refuses_count_only_and_unordered() {
        let args = Arguments::new(Limit::Bounded(1), 0).unwrap();

        assert_eq!(
            args.apply(Description::count_only("users", Fragments::default())),
            Err(ApplyError::CountOnly),
        );
        assert_eq!(
            args.apply(Description::page(
                "users",
                Fragments::default(),
                vec![],
            )),
            Err(ApplyError::Unordered),
        );
    }

    #[test]
    fn parses_order() {
        assert_eq!("ASC".parse::<Order>(), Ok(Order::Ascending));
        assert_eq!("desc".parse::<Order>(), Ok(Order::Descending));
        assert!("UP".parse::<Order>().is_err());
        assert_eq!(Order::default(), Order::Descending);
    }
}
