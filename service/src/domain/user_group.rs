//! [`UserGroup`] definitions.

use std::collections::BTreeMap;

use derive_more::{Display, From, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};

use crate::domain::{role, tenant};

/// Group of [`User`]s sharing a role within a [`Tenant`].
///
/// [`Tenant`]: crate::domain::Tenant
/// [`User`]: crate::domain::User
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UserGroup {
    /// ID of this [`UserGroup`].
    pub id: Id,

    /// ID of the [`Tenant`] this [`UserGroup`] belongs to.
    ///
    /// [`Tenant`]: crate::domain::Tenant
    pub tenant_id: tenant::Id,

    /// ID of the role granted by this [`UserGroup`].
    pub role_id: role::Id,

    /// Name of this [`UserGroup`].
    pub name: LocalizedText,

    /// Abbreviated name of this [`UserGroup`].
    pub abbrev: LocalizedText,

    /// Indicator whether the name of this [`UserGroup`] is shown next to its
    /// members.
    pub show_title: bool,

    /// Indicator whether users may join this [`UserGroup`] on their own.
    pub permit_self_registration: bool,

    /// Indicator whether members of this [`UserGroup`] may only recommend
    /// editorial decisions.
    pub recommend_only: bool,
}

/// ID of a [`UserGroup`].
#[derive(Clone, Copy, Debug, Display, Eq, From, Hash, Into, PartialEq)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(i64);

/// Text translated into several locales, keyed by locale code.
#[derive(Clone, Debug, Default, Deserialize, Eq, From, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LocalizedText(BTreeMap<String, String>);

impl LocalizedText {
    /// Returns the translation into the given `locale`, if any.
    #[must_use]
    pub fn get(&self, locale: &str) -> Option<&str> {
        self.0.get(locale).map(String::as_str)
    }
}

impl<L, T> FromIterator<(L, T)> for LocalizedText
where
    L: Into<String>,
    T: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (L, T)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(l, t)| (l.into(), t.into())).collect())
    }
}

impl From<&LocalizedText> for serde_json::Value {
    fn from(text: &LocalizedText) -> Self {
        Self::Object(
            text.0
                .iter()
                .map(|(l, t)| (l.clone(), Self::String(t.clone())))
                .collect(),
        )
    }
}
