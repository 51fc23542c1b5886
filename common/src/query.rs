//! Engine-agnostic query [`Description`].
//!
//! A [`Description`] is what a query builder produces and what a storage
//! engine executes. Filtering lives in [`Fragments`], which are shared
//! verbatim between a [`Mode::Page`] description and a [`Mode::CountOnly`]
//! one, so that a total count always covers the same candidate set as the
//! page it accompanies.

use std::borrow::Cow;

use derive_more::From;

use crate::{pagination::Order, DateTime};

/// Name of a column or a relation.
pub type Ident = Cow<'static, str>;

/// Value bound into a [`Predicate`], or read from a row.
#[derive(Clone, Debug, From, PartialEq)]
pub enum Value {
    /// Absence of a value.
    #[from(ignore)]
    Null,

    /// Boolean value.
    Bool(bool),

    /// Integer value.
    Int(i64),

    /// Set of integers, used with [`Operator::In`].
    IntSet(Vec<i64>),

    /// Text value.
    Text(String),

    /// Date and time value.
    DateTime(DateTime),
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

/// Comparison operator of a [`Predicate::Compare`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Operator {
    /// Column equals the value. [`Value::Null`] matches absent values only.
    Eq,

    /// Column is one of the values of a [`Value::IntSet`].
    In,

    /// Column contains the [`Value::Text`] as a case-insensitive substring.
    Contains,
}

/// Condition on a single row.
#[derive(Clone, Debug, PartialEq)]
pub enum Predicate {
    /// Compares a column against a bound value.
    Compare {
        /// Column being compared.
        column: Ident,

        /// [`Operator`] of the comparison.
        operator: Operator,

        /// Bound value.
        value: Value,
    },

    /// Holds if any of the inner [`Predicate`]s holds.
    ///
    /// Empty disjunction never holds.
    Any(Vec<Predicate>),
}

impl Predicate {
    /// Creates an [`Operator::Eq`] [`Predicate`].
    #[must_use]
    pub fn eq(column: impl Into<Ident>, value: impl Into<Value>) -> Self {
        Self::Compare {
            column: column.into(),
            operator: Operator::Eq,
            value: value.into(),
        }
    }

    /// Creates an [`Operator::In`] [`Predicate`].
    #[must_use]
    pub fn one_of(
        column: impl Into<Ident>,
        values: impl IntoIterator<Item = i64>,
    ) -> Self {
        Self::Compare {
            column: column.into(),
            operator: Operator::In,
            value: Value::IntSet(values.into_iter().collect()),
        }
    }

    /// Creates an [`Operator::Contains`] [`Predicate`].
    #[must_use]
    pub fn contains(
        column: impl Into<Ident>,
        needle: impl Into<String>,
    ) -> Self {
        Self::Compare {
            column: column.into(),
            operator: Operator::Contains,
            value: Value::Text(needle.into()),
        }
    }
}

/// "Exists in related set" fragment.
///
/// Holds for an outer row if the `relation` contains at least one row whose
/// `inner` column equals the `outer` column of that row, and which satisfies
/// all the [`Join::predicates`] and nested [`Join::joins`].
#[derive(Clone, Debug, PartialEq)]
pub struct Join {
    /// Related relation.
    pub relation: Ident,

    /// Column of the outer row.
    pub outer: Ident,

    /// Column of the related row matched against [`Join::outer`].
    pub inner: Ident,

    /// [`Predicate`]s on the related row.
    pub predicates: Vec<Predicate>,

    /// [`Join`]s nested under the related row.
    pub joins: Vec<Join>,
}

impl Join {
    /// Creates a new [`Join`] of the `relation` on `outer = inner`.
    #[must_use]
    pub fn new(
        relation: impl Into<Ident>,
        outer: impl Into<Ident>,
        inner: impl Into<Ident>,
    ) -> Self {
        Self {
            relation: relation.into(),
            outer: outer.into(),
            inner: inner.into(),
            predicates: Vec::new(),
            joins: Vec::new(),
        }
    }

    /// Adds the provided [`Predicate`] on the related row.
    #[must_use]
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Nests the provided [`Join`] under the related row.
    #[must_use]
    pub fn join(mut self, join: Join) -> Self {
        self.joins.push(join);
        self
    }
}

/// Filtering part of a [`Description`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Fragments {
    /// [`Predicate`]s on the rows of the main relation.
    pub predicates: Vec<Predicate>,

    /// [`Join`]s the rows of the main relation must satisfy.
    pub joins: Vec<Join>,
}

impl Fragments {
    /// Adds the provided [`Predicate`].
    pub fn filter(&mut self, predicate: Predicate) -> &mut Self {
        self.predicates.push(predicate);
        self
    }

    /// Adds the provided [`Join`].
    pub fn join(&mut self, join: Join) -> &mut Self {
        self.joins.push(join);
        self
    }

    /// Indicates whether these [`Fragments`] constrain nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty() && self.joins.is_empty()
    }
}

/// Sort key of a [`Description`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Sort {
    /// Column to sort by.
    pub column: Ident,

    /// [`Order`] of sorting.
    pub order: Order,
}

/// Page bounds of a [`Mode::Page`] [`Description`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Window {
    /// Maximum number of rows, if any.
    pub limit: Option<u64>,

    /// Number of rows to skip.
    pub offset: u64,
}

/// Mode of a [`Description`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Mode {
    /// Rows are fetched, optionally bounded by a [`Window`].
    Page {
        /// [`Window`] of the page, if applied.
        window: Option<Window>,
    },

    /// Only the number of matching rows is computed.
    CountOnly,
}

/// Abstract, executable query over a single main relation.
#[derive(Clone, Debug, PartialEq)]
pub struct Description {
    /// Main relation rows are selected from.
    pub relation: Ident,

    /// Filtering [`Fragments`].
    pub fragments: Fragments,

    /// Sort keys, most significant first. Always empty in
    /// [`Mode::CountOnly`].
    pub ordering: Vec<Sort>,

    /// [`Mode`] of this [`Description`].
    pub mode: Mode,
}

impl Description {
    /// Creates a new unbounded [`Mode::Page`] [`Description`].
    #[must_use]
    pub fn page(
        relation: impl Into<Ident>,
        fragments: Fragments,
        ordering: Vec<Sort>,
    ) -> Self {
        Self {
            relation: relation.into(),
            fragments,
            ordering,
            mode: Mode::Page { window: None },
        }
    }

    /// Creates a new [`Mode::CountOnly`] [`Description`].
    #[must_use]
    pub fn count_only(
        relation: impl Into<Ident>,
        fragments: Fragments,
    ) -> Self {
        Self {
            relation: relation.into(),
            fragments,
            ordering: Vec::new(),
            mode: Mode::CountOnly,
        }
    }

    /// Returns the [`Window`] of this [`Description`], if any.
    #[must_use]
    pub fn window(&self) -> Option<Window> {
        match self.mode {
            Mode::Page { window } => window,
            Mode::CountOnly => None,
        }
    }

    /// Indicates whether this [`Description`] is [`Mode::CountOnly`].
    #[must_use]
    pub fn is_count_only(&self) -> bool {
        matches!(self.mode, Mode::CountOnly)
    }
}
