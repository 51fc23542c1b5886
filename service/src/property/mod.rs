//! [`User`] properties projection.
//!
//! Every [`Property`] a caller may request is known by its camelCase name and
//! is extracted from a [`User`] in one of the [`Extraction`] ways. [`Resolver`]
//! turns a list of requested names into [`Values`].

pub mod context;
pub mod resolver;

use common::DateTimeOf;
use serde_json::Value;

use crate::domain::User;

pub use self::{
    context::{Context, Request, Route},
    resolver::{ResolveError, Resolver},
};

/// Resolved property values keyed by their names.
pub type Values = serde_json::Map<String, Value>;

/// Property names of the summary preset.
pub const SUMMARY: [Property; 8] = [
    Property::Id,
    Property::Href,
    Property::UserName,
    Property::Email,
    Property::FullName,
    Property::Orcid,
    Property::Groups,
    Property::Disabled,
];

/// Property of a [`User`] available for projection.
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    Hash,
    PartialEq,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
    strum::VariantArray,
)]
#[strum(serialize_all = "camelCase")]
pub enum Property {
    /// ID of a [`User`].
    Id,
    /// Link to a [`User`] in the REST API.
    Href,
    /// Login name.
    UserName,
    /// Composed full name.
    FullName,
    /// First name.
    FirstName,
    /// Middle name.
    MiddleName,
    /// Last name.
    LastName,
    /// Initials.
    Initials,
    /// Salutation.
    Salutation,
    /// Name suffix.
    Suffix,
    /// Institutional affiliation.
    Affiliation,
    /// Country code.
    Country,
    /// Personal URL.
    Url,
    /// Email address.
    Email,
    /// ORCID iD.
    Orcid,
    /// Biography.
    Biography,
    /// Email signature.
    Signature,
    /// External authentication source.
    AuthId,
    /// Identifier in the external authentication source.
    AuthString,
    /// Gender.
    Gender,
    /// Phone number.
    Phone,
    /// Mailing address.
    MailingAddress,
    /// Billing address.
    BillingAddress,
    /// Private editorial notes.
    Gossip,
    /// Disabled flag.
    Disabled,
    /// Reason of disabling.
    DisabledReason,
    /// Registration date.
    DateRegistered,
    /// Email validation date.
    DateValidated,
    /// Last login date.
    DateLastLogin,
    /// Password change enforcement flag.
    MustChangePassword,
    /// Group memberships within the current tenant.
    Groups,
    /// Reviewing interests.
    Interests,
}

impl Property {
    /// Returns the wire name of this [`Property`].
    #[must_use]
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Looks up a [`Property`] by its wire name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        name.parse().ok()
    }

    /// Returns the [`Extraction`] of this [`Property`].
    #[must_use]
    pub fn extraction(self) -> Extraction {
        use Extraction as X;

        match self {
            Self::Id => X::Direct(|u| i64::from(u.id).into()),
            Self::Href => X::Contextual(context::href),
            Self::UserName => X::Direct(|u| u.user_name.to_string().into()),
            Self::FullName => X::Direct(|u| u.full_name().into()),
            Self::FirstName => X::Direct(|u| u.first_name.clone().into()),
            Self::MiddleName => X::Direct(|u| u.middle_name.clone().into()),
            Self::LastName => X::Direct(|u| u.last_name.clone().into()),
            Self::Initials => X::Direct(|u| u.initials.clone().into()),
            Self::Salutation => X::Direct(|u| u.salutation.clone().into()),
            Self::Suffix => X::Direct(|u| u.suffix.clone().into()),
            Self::Affiliation => X::Direct(|u| u.affiliation.clone().into()),
            Self::Country => X::Direct(|u| u.country.clone().into()),
            Self::Url => X::Direct(|u| u.url.clone().into()),
            Self::Email => X::Direct(|u| u.email.to_string().into()),
            Self::Orcid => X::Direct(|u| u.orcid.clone().into()),
            Self::Biography => X::Direct(|u| u.biography.clone().into()),
            Self::Signature => X::Direct(|u| u.signature.clone().into()),
            Self::AuthId => X::Direct(|u| u.auth_id.into()),
            Self::AuthString => X::Direct(|u| u.auth_string.clone().into()),
            Self::Gender => X::Direct(|u| u.gender.clone().into()),
            Self::Phone => X::Direct(|u| u.phone.clone().into()),
            Self::MailingAddress => {
                X::Direct(|u| u.mailing_address.clone().into())
            }
            Self::BillingAddress => {
                X::Direct(|u| u.billing_address.clone().into())
            }
            Self::Gossip => X::Direct(|u| u.gossip.clone().into()),
            Self::Disabled => X::Direct(|u| u.disabled.into()),
            Self::DisabledReason => {
                X::Direct(|u| u.disabled_reason.clone().into())
            }
            Self::DateRegistered => {
                X::Direct(|u| date(Some(u.date_registered)))
            }
            Self::DateValidated => X::Direct(|u| date(u.date_validated)),
            Self::DateLastLogin => X::Direct(|u| date(u.date_last_login)),
            Self::MustChangePassword => {
                X::Direct(|u| u.must_change_password.into())
            }
            Self::Groups => X::Lookup(Lookup::Groups),
            Self::Interests => X::Lookup(Lookup::Interests),
        }
    }
}

/// Way a [`Property`] value is obtained.
#[derive(Clone, Copy, Debug)]
pub enum Extraction {
    /// Pure function of a [`User`].
    Direct(fn(&User) -> Value),

    /// Function of a [`User`] and the request [`Context`].
    Contextual(fn(&User, &Context) -> Value),

    /// Secondary [`Lookup`] in the [`Database`].
    ///
    /// [`Database`]: crate::infra::Database
    Lookup(Lookup),
}

/// Collection related to a [`User`] stored separately from it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Lookup {
    /// Group memberships within the current tenant.
    Groups,

    /// Reviewing interests.
    Interests,
}

/// Formats the provided date as an RFC 3339 string, or `null`.
fn date<U: ?Sized>(at: Option<DateTimeOf<U>>) -> Value {
    at.map(|at| at.to_rfc3339()).into()
}
