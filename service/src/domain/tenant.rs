//! [`Tenant`] definitions.

use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};

/// Scope (journal, press, server) users are listed and resolved within.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Tenant {
    /// ID of this [`Tenant`].
    pub id: Id,

    /// URL [`Path`] of this [`Tenant`].
    pub path: Path,
}

/// ID of a [`Tenant`].
#[derive(
    Clone, Copy, Debug, Display, Eq, From, FromStr, Hash, Into, PartialEq,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(i64);

/// URL path segment identifying a [`Tenant`].
#[derive(AsRef, Clone, Debug, Display, Eq, From, PartialEq)]
#[as_ref(str, String)]
#[from(&str, String)]
pub struct Path(String);
