//! [`User`]s list definitions.
//!
//! A listing request arrives as an [`Input`], gets validated into a
//! [`Selector`], and is turned into [`Description`]s by a [`Builder`].

use common::{
    pagination::{Arguments, ArgumentsError, Limit},
    query::{Description, Fragments, Join, Predicate, Sort},
    Order,
};
use derive_more::{Display, Error, From, Into};
use itertools::Itertools as _;

#[cfg(doc)]
use crate::domain::User;
use crate::{
    domain::{role, section, submission, tenant},
    hook::Hooks,
    schema::{
        section_editors, stage_assignments, user_group_stage, user_groups,
        user_user_groups, users,
    },
};

/// Page size used when an [`Input`] doesn't specify one.
pub const DEFAULT_COUNT: i64 = 20;

/// Listing request, as received from a caller.
///
/// Every field is optional, with the missing ones taking their defaults in
/// [`Selector::new()`].
#[derive(Clone, Debug, Default)]
pub struct Input {
    /// Name of the column to order by (see [`OrderBy`]). Defaults to `id`.
    pub order_by: Option<String>,

    /// `ASC` or `DESC`. Defaults to `DESC`.
    pub order_direction: Option<String>,

    /// Roles [`User`]s must hold any of. Empty means any.
    pub role_ids: Vec<role::Id>,

    /// Submission [`User`]s must participate in.
    pub assigned_to_submission: Option<submission::Id>,

    /// Code of the [`submission::Stage`] the participation must be in.
    pub assigned_to_submission_stage: Option<i64>,

    /// Section [`User`]s must be editors of.
    pub assigned_to_section: Option<section::Id>,

    /// `active`, `disabled` or `all`. Defaults to `active`.
    pub status: Option<String>,

    /// Free text to search for.
    pub search_phrase: Option<String>,

    /// Page size. Defaults to [`DEFAULT_COUNT`].
    pub count: Option<Limit>,

    /// Number of [`User`]s to skip. Defaults to `0`.
    pub offset: Option<i64>,
}

/// Validated listing request.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Selector {
    /// ID of the [`Tenant`] the listing is scoped to.
    ///
    /// [`Tenant`]: crate::domain::Tenant
    pub context_id: tenant::Id,

    /// [`Filter`] to apply.
    pub filter: Filter,

    /// [`Ordering`] of the results.
    pub ordering: Ordering,

    /// Page [`Arguments`].
    pub arguments: Arguments,
}

impl Selector {
    /// Validates the provided [`Input`] and fills in the defaults.
    ///
    /// # Errors
    ///
    /// If any of the [`Input`] fields is invalid. Invalid values are never
    /// coerced into valid ones.
    pub fn new(
        context_id: tenant::Id,
        input: Input,
    ) -> Result<Self, InvalidInput> {
        use InvalidInput as E;

        let Input {
            order_by,
            order_direction,
            role_ids,
            assigned_to_submission,
            assigned_to_submission_stage,
            assigned_to_section,
            status,
            search_phrase,
            count,
            offset,
        } = input;

        let by = order_by.map_or(Ok(OrderBy::default()), |s| {
            s.parse().map_err(|_| E::UnknownOrderBy(s))
        })?;
        let order = order_direction.map_or(Ok(Order::default()), |s| {
            s.parse().map_err(|_| E::UnknownOrderDirection(s))
        })?;
        let status = status.map_or(Ok(Status::default()), |s| {
            s.parse().map_err(|_| E::UnknownStatus(s))
        })?;

        let stage = assigned_to_submission_stage
            .map(|code| {
                u8::try_from(code)
                    .ok()
                    .and_then(|c| submission::Stage::try_from(c).ok())
                    .ok_or(E::UnknownStage(code))
            })
            .transpose()?;
        let assignment = match (assigned_to_submission, stage) {
            (Some(submission), stage) => Some(Assignment { submission, stage }),
            (None, Some(_)) => return Err(E::StageWithoutSubmission),
            (None, None) => None,
        };

        let arguments = Arguments::new(
            count.unwrap_or(Limit::Bounded(DEFAULT_COUNT)),
            offset.unwrap_or_default(),
        )?;

        Ok(Self {
            context_id,
            filter: Filter {
                role_ids: role_ids.into_iter().sorted().dedup().collect(),
                assignment,
                section: assigned_to_section,
                status,
                search: search_phrase
                    .as_deref()
                    .unwrap_or_default()
                    .split_whitespace()
                    .map(ToOwned::to_owned)
                    .collect(),
            },
            ordering: Ordering { by, order },
            arguments,
        })
    }
}

/// Filter of a [`Selector`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Filter {
    /// Roles [`User`]s must hold any of within the [`Tenant`]. Empty means
    /// any.
    ///
    /// [`Tenant`]: crate::domain::Tenant
    pub role_ids: Vec<role::Id>,

    /// Submission participation [`User`]s must have.
    pub assignment: Option<Assignment>,

    /// Section [`User`]s must be editors of within the [`Tenant`].
    ///
    /// [`Tenant`]: crate::domain::Tenant
    pub section: Option<section::Id>,

    /// [`Status`] of [`User`]s.
    pub status: Status,

    /// Search tokens, each of them must be found in a [`User`] name or email.
    pub search: Vec<String>,
}

/// Participation in a submission.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Assignment {
    /// ID of the submission.
    pub submission: submission::Id,

    /// [`submission::Stage`] of the participation, if restricted.
    pub stage: Option<submission::Stage>,
}

/// Status of listed [`User`]s.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    PartialEq,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub enum Status {
    /// Only [`User`]s not disabled.
    #[default]
    Active,

    /// Only disabled [`User`]s.
    Disabled,

    /// All [`User`]s.
    All,
}

/// Column [`User`]s may be ordered by.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    PartialEq,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "camelCase")]
pub enum OrderBy {
    /// ID of a [`User`].
    #[default]
    Id,

    /// Login name.
    UserName,

    /// First name.
    FirstName,

    /// Last name.
    LastName,

    /// Email address.
    Email,

    /// Registration date.
    DateRegistered,

    /// Last login date.
    DateLastLogin,
}

impl OrderBy {
    /// Returns the column this [`OrderBy`] sorts on.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::Id => users::ID,
            Self::UserName => users::USER_NAME,
            Self::FirstName => users::FIRST_NAME,
            Self::LastName => users::LAST_NAME,
            Self::Email => users::EMAIL,
            Self::DateRegistered => users::DATE_REGISTERED,
            Self::DateLastLogin => users::DATE_LAST_LOGIN,
        }
    }
}

/// Ordering of a [`Selector`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Ordering {
    /// Column to order by.
    pub by: OrderBy,

    /// Direction of ordering.
    pub order: Order,
}

impl Ordering {
    /// Returns the sort keys of this [`Ordering`].
    ///
    /// [`OrderBy::Id`] always ends the keys, so that pages never overlap.
    #[must_use]
    pub fn sorts(&self) -> Vec<Sort> {
        let mut sorts = vec![Sort {
            column: self.by.column().into(),
            order: self.order,
        }];
        if self.by != OrderBy::Id {
            sorts.push(Sort {
                column: users::ID.into(),
                order: self.order,
            });
        }
        sorts
    }
}

/// Builder of [`User`]s listing [`Description`]s.
#[derive(Clone, Copy, Debug)]
pub struct Builder<'h> {
    /// [`Hooks`] to run on the built [`Fragments`].
    hooks: &'h Hooks,
}

impl<'h> Builder<'h> {
    /// Creates a new [`Builder`] running the provided [`Hooks`].
    #[must_use]
    pub fn new(hooks: &'h Hooks) -> Self {
        Self { hooks }
    }

    /// Builds an ordered page [`Description`], not paginated yet.
    #[must_use]
    pub fn build(&self, selector: &Selector) -> Description {
        Description::page(
            users::TABLE,
            self.fragments(selector),
            selector.ordering.sorts(),
        )
    }

    /// Builds a [`Description`] counting all the [`User`]s matching the
    /// [`Selector`], regardless of its [`Ordering`] and [`Arguments`].
    #[must_use]
    pub fn build_count_only(&self, selector: &Selector) -> Description {
        Description::count_only(users::TABLE, self.fragments(selector))
    }

    /// Builds the filtering [`Fragments`] shared by all the [`Description`]s
    /// of the [`Selector`].
    fn fragments(&self, selector: &Selector) -> Fragments {
        let mut fragments = apply_filters(selector);
        self.hooks.run_query(&mut fragments, selector);
        fragments
    }
}

/// Translates the [`Filter`] of the [`Selector`] into [`Fragments`].
fn apply_filters(selector: &Selector) -> Fragments {
    let Selector {
        context_id,
        filter:
            Filter {
                role_ids,
                assignment,
                section,
                status,
                search,
            },
        ..
    } = selector;
    let context_id = i64::from(*context_id);

    let mut fragments = Fragments::default();

    if !role_ids.is_empty() {
        _ = fragments.join(
            Join::new(
                user_user_groups::TABLE,
                users::ID,
                user_user_groups::USER_ID,
            )
            .join(
                Join::new(
                    user_groups::TABLE,
                    user_user_groups::USER_GROUP_ID,
                    user_groups::ID,
                )
                .filter(Predicate::eq(user_groups::CONTEXT_ID, context_id))
                .filter(Predicate::one_of(
                    user_groups::ROLE_ID,
                    role_ids.iter().copied().map(i64::from),
                )),
            ),
        );
    }

    if let Some(Assignment { submission, stage }) = assignment {
        let mut join = Join::new(
            stage_assignments::TABLE,
            users::ID,
            stage_assignments::USER_ID,
        )
        .filter(Predicate::eq(
            stage_assignments::SUBMISSION_ID,
            i64::from(*submission),
        ));
        if let Some(stage) = stage {
            join = join.join(
                Join::new(
                    user_group_stage::TABLE,
                    stage_assignments::USER_GROUP_ID,
                    user_group_stage::USER_GROUP_ID,
                )
                .filter(Predicate::eq(
                    user_group_stage::STAGE_ID,
                    i64::from(stage.u8()),
                )),
            );
        }
        _ = fragments.join(join);
    }

    if let Some(section) = section {
        _ = fragments.join(
            Join::new(
                section_editors::TABLE,
                users::ID,
                section_editors::USER_ID,
            )
            .filter(Predicate::eq(section_editors::CONTEXT_ID, context_id))
            .filter(Predicate::eq(
                section_editors::SECTION_ID,
                i64::from(*section),
            )),
        );
    }

    match status {
        Status::Active => {
            _ = fragments.filter(Predicate::eq(users::DISABLED, false));
        }
        Status::Disabled => {
            _ = fragments.filter(Predicate::eq(users::DISABLED, true));
        }
        Status::All => {}
    }

    for token in search {
        _ = fragments.filter(Predicate::Any(
            [
                users::USER_NAME,
                users::FIRST_NAME,
                users::MIDDLE_NAME,
                users::LAST_NAME,
                users::EMAIL,
            ]
            .into_iter()
            .map(|column| Predicate::contains(column, token.clone()))
            .collect(),
        ));
    }

    fragments
}

/// Total count of [`User`]s matching a [`Selector`].
#[derive(Clone, Copy, Debug, Eq, From, Hash, Into, PartialEq)]
pub struct TotalCount(u64);

/// Error of validating an [`Input`].
#[derive(Clone, Debug, Display, Eq, Error, From, PartialEq)]
pub enum InvalidInput {
    /// Ordering by an unknown column was requested.
    #[display("`{_0}` is not a column users can be ordered by")]
    #[from(ignore)]
    UnknownOrderBy(#[error(not(source))] String),

    /// Unknown ordering direction was requested.
    #[display("`{_0}` is not an ordering direction, expected `ASC` or `DESC`")]
    #[from(ignore)]
    UnknownOrderDirection(#[error(not(source))] String),

    /// Unknown [`Status`] was requested.
    #[display("`{_0}` is not a user status")]
    #[from(ignore)]
    UnknownStatus(#[error(not(source))] String),

    /// Unknown [`submission::Stage`] code was requested.
    #[display("`{_0}` is not a workflow stage")]
    #[from(ignore)]
    UnknownStage(#[error(not(source))] i64),

    /// [`submission::Stage`] was requested without a submission.
    #[display("workflow stage requires a submission to be specified")]
    StageWithoutSubmission,

    /// Invalid pagination was requested.
    #[display("{_0}")]
    Pagination(ArgumentsError),
}
