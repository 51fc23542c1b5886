//! Role definitions.

use std::str::FromStr;

use derive_more::{Display, From, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};

/// ID of a role a [`UserGroup`] grants.
///
/// Well-known roles are provided as associated constants, but any integer is
/// accepted, as roles are defined by the storage.
///
/// [`UserGroup`]: crate::domain::UserGroup
#[derive(
    Clone, Copy, Debug, Display, Eq, From, Hash, Into, Ord, PartialEq, PartialOrd,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(i64);

impl Id {
    /// Administrator of the whole site.
    pub const SITE_ADMIN: Self = Self(0x0000_0001);

    /// Manager of a [`Tenant`].
    ///
    /// [`Tenant`]: crate::domain::Tenant
    pub const MANAGER: Self = Self(0x0000_0010);

    /// Section editor.
    pub const SUB_EDITOR: Self = Self(0x0000_0011);

    /// Reviewer of submissions.
    pub const REVIEWER: Self = Self(0x0000_1000);

    /// Assistant in the editorial workflow.
    pub const ASSISTANT: Self = Self(0x0000_1001);

    /// Author of submissions.
    pub const AUTHOR: Self = Self(0x0001_0000);

    /// Reader.
    pub const READER: Self = Self(0x0010_0000);

    /// Manager of subscriptions.
    pub const SUBSCRIPTION_MANAGER: Self = Self(0x0020_0000);

    /// Named roles recognized by [`Id::from_str()`].
    const NAMED: [(&'static str, Self); 8] = [
        ("siteAdmin", Self::SITE_ADMIN),
        ("manager", Self::MANAGER),
        ("subEditor", Self::SUB_EDITOR),
        ("reviewer", Self::REVIEWER),
        ("assistant", Self::ASSISTANT),
        ("author", Self::AUTHOR),
        ("reader", Self::READER),
        ("subscriptionManager", Self::SUBSCRIPTION_MANAGER),
    ];
}

impl FromStr for Id {
    type Err = &'static str;

    /// Parses either a role name (like `author`) or its integer ID.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::NAMED
            .iter()
            .find_map(|(name, id)| name.eq_ignore_ascii_case(s).then_some(*id))
            .map_or_else(
                || s.parse().map(Self).map_err(|_| "invalid role"),
                Ok,
            )
    }
}

#[cfg(test)]
mod spec {
    use super::Id;

    #[test]
    fn parses_names_and_numbers() {
        assert_eq!("author".parse::<Id>(), Ok(Id::AUTHOR));
        assert_eq!("SubEditor".parse::<Id>(), Ok(Id::SUB_EDITOR));
        assert_eq!("4".parse::<Id>(), Ok(Id::from(4)));
        assert!("editor-in-chief".parse::<Id>().is_err());
    }
}
