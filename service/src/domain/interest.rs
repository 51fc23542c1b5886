//! [`Interest`] definitions.

use derive_more::{Display, From, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};

/// Research interest a [`User`] tagged themselves with.
///
/// [`User`]: crate::domain::User
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Interest {
    /// ID of this [`Interest`].
    pub id: Id,

    /// Label of this [`Interest`].
    pub label: String,
}

/// ID of an [`Interest`].
#[derive(Clone, Copy, Debug, Display, Eq, From, Hash, Into, PartialEq)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(i64);
