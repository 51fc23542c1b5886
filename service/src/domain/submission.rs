//! Submission definitions.

use common::define_kind;
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};

/// ID of a submission going through the editorial workflow.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, FromStr, Hash, Into, PartialEq,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(i64);

define_kind! {
    #[doc = "Stage of the editorial workflow."]
    enum Stage {
        #[doc = "Initial review of a new submission."]
        Submission = 1,

        #[doc = "Review by the members of the tenant."]
        InternalReview = 2,

        #[doc = "Peer review."]
        ExternalReview = 3,

        #[doc = "Copyediting."]
        Editing = 4,

        #[doc = "Preparation of publication formats."]
        Production = 5,
    }
}
