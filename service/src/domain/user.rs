//! [`User`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};

/// Registered user of a site.
///
/// Group memberships and interests of a [`User`] are stored separately and
/// are never loaded together with it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct User {
    /// ID of this [`User`].
    pub id: Id,

    /// [`UserName`] of this [`User`].
    pub user_name: UserName,

    /// Salutation (like "Dr.") of this [`User`].
    pub salutation: Option<String>,

    /// First name of this [`User`].
    pub first_name: String,

    /// Middle name of this [`User`].
    pub middle_name: Option<String>,

    /// Last name of this [`User`].
    pub last_name: String,

    /// Name suffix (like "Jr.") of this [`User`].
    pub suffix: Option<String>,

    /// Initials of this [`User`].
    pub initials: Option<String>,

    /// Institutional affiliation of this [`User`].
    pub affiliation: Option<String>,

    /// Country code of this [`User`].
    pub country: Option<String>,

    /// Personal URL of this [`User`].
    pub url: Option<String>,

    /// [`Email`] of this [`User`].
    pub email: Email,

    /// ORCID iD of this [`User`].
    pub orcid: Option<String>,

    /// Biography of this [`User`].
    pub biography: Option<String>,

    /// Email signature of this [`User`].
    pub signature: Option<String>,

    /// ID of the external authentication source of this [`User`].
    pub auth_id: Option<i64>,

    /// Identifier of this [`User`] in the external authentication source.
    pub auth_string: Option<String>,

    /// Gender of this [`User`].
    pub gender: Option<String>,

    /// Phone number of this [`User`].
    pub phone: Option<String>,

    /// Mailing address of this [`User`].
    pub mailing_address: Option<String>,

    /// Billing address of this [`User`].
    pub billing_address: Option<String>,

    /// Private editorial notes about this [`User`].
    pub gossip: Option<String>,

    /// Indicator whether this [`User`] is disabled.
    pub disabled: bool,

    /// Reason this [`User`] was disabled for.
    pub disabled_reason: Option<String>,

    /// [`DateTime`] when this [`User`] registered.
    pub date_registered: RegistrationDateTime,

    /// [`DateTime`] when this [`User`] validated their [`Email`].
    pub date_validated: Option<ValidationDateTime>,

    /// [`DateTime`] when this [`User`] logged in the last time.
    pub date_last_login: Option<LastLoginDateTime>,

    /// Indicator whether this [`User`] must change the password on the next
    /// login.
    pub must_change_password: bool,
}

impl User {
    /// Returns the full name of this [`User`], like `Jane Q. Doe, Jr.`.
    #[must_use]
    pub fn full_name(&self) -> String {
        let mut name = self.first_name.clone();
        if let Some(middle) = non_empty(self.middle_name.as_deref()) {
            name.push(' ');
            name.push_str(middle);
        }
        name.push(' ');
        name.push_str(&self.last_name);
        if let Some(suffix) = non_empty(self.suffix.as_deref()) {
            name.push_str(", ");
            name.push_str(suffix);
        }
        name
    }
}

/// Filters out blank strings.
fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}

/// ID of a [`User`].
#[derive(
    Clone,
    Copy,
    Debug,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(i64);

/// Unique login name of a [`User`].
#[derive(AsRef, Clone, Debug, Display, Eq, From, PartialEq)]
#[as_ref(str, String)]
#[from(&str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct UserName(String);

/// Email address of a [`User`].
#[derive(AsRef, Clone, Debug, Display, Eq, From, PartialEq)]
#[as_ref(str, String)]
#[from(&str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Email(String);

/// [`DateTime`] when a [`User`] registered.
pub type RegistrationDateTime = DateTimeOf<(User, unit::Registration)>;

/// [`DateTime`] when a [`User`] validated their [`Email`].
pub type ValidationDateTime = DateTimeOf<(User, unit::Validation)>;

/// [`DateTime`] when a [`User`] logged in.
pub type LastLoginDateTime = DateTimeOf<(User, unit::Login)>;

#[cfg(test)]
pub(crate) mod spec {
    use common::DateTime;

    use super::User;

    /// Returns an active [`User`] with only the mandatory fields set.
    pub(crate) fn user() -> User {
        User {
            id: 1.into(),
            user_name: "jdoe".into(),
            salutation: None,
            first_name: "Jane".into(),
            middle_name: None,
            last_name: "Doe".into(),
            suffix: None,
            initials: None,
            affiliation: None,
            country: None,
            url: None,
            email: "jane@example.com".into(),
            orcid: None,
            biography: None,
            signature: None,
            auth_id: None,
            auth_string: None,
            gender: None,
            phone: None,
            mailing_address: None,
            billing_address: None,
            gossip: None,
            disabled: false,
            disabled_reason: None,
            date_registered: DateTime::UNIX_EPOCH.coerce(),
            date_validated: None,
            date_last_login: None,
            must_change_password: false,
        }
    }

    #[test]
    fn full_name() {
        assert_eq!(user().full_name(), "Jane Doe");

        let u = User {
            middle_name: Some("Quinn".into()),
            suffix: Some("Jr.".into()),
            ..user()
        };
        assert_eq!(u.full_name(), "Jane Quinn Doe, Jr.");

        let u = User {
            middle_name: Some("  ".into()),
            suffix: Some(String::new()),
            ..user()
        };
        assert_eq!(u.full_name(), "Jane Doe");
    }
}
