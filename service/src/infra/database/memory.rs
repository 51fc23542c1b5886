//! In-memory [`Database`] implementation.
//!
//! Evaluates query [`Description`]s over plain collections the same way the
//! Postgres implementation evaluates their SQL rendering, which makes it
//! suitable for tests and demos without a running database.
//!
//! Every relation of the storage schema is modeled. The only columns missing
//! are the localized `name` and `abbrev` of `user_groups`, which are never
//! compared.

use std::{cmp, collections::HashMap, sync::Arc};

use common::{
    operations::{By, Select},
    query::{Join, Operator, Predicate, Value},
    DateTimeOf, Description, Order,
};
use derive_more::{Display, Error as StdError};
use tracerr::Traced;

use crate::{
    domain::{
        interest, section, submission, tenant, user, user_group, Interest,
        User, UserGroup,
    },
    infra::{database, Database},
    read,
    schema::{
        interests, section_editors, stage_assignments, user_group_stage,
        user_groups, user_interests, user_user_groups, users,
    },
};

/// Row of a relation, keyed by column names.
type Row = HashMap<&'static str, Value>;

/// In-memory [`Database`].
///
/// Populated once with the `with_*()` builder methods, and read-only
/// afterwards. Clones share the same data.
#[derive(Clone, Debug, Default)]
pub struct Memory(Arc<Tables>);

/// Data of a [`Memory`] [`Database`].
#[derive(Clone, Debug, Default)]
struct Tables {
    /// Registered [`User`]s.
    users: Vec<User>,

    /// Defined [`UserGroup`]s.
    user_groups: Vec<UserGroup>,

    /// [`UserGroup`] memberships of [`User`]s.
    memberships: Vec<(user::Id, user_group::Id)>,

    /// Participants of submissions, acting as members of a [`UserGroup`].
    stage_assignments: Vec<(submission::Id, user_group::Id, user::Id)>,

    /// Workflow stages [`UserGroup`]s take part in.
    group_stages: Vec<(user_group::Id, submission::Stage)>,

    /// Section editors within tenants.
    section_editors: Vec<(tenant::Id, section::Id, user::Id)>,

    /// Known [`Interest`]s.
    interests: Vec<Interest>,

    /// [`Interest`]s of [`User`]s.
    user_interests: Vec<(user::Id, interest::Id)>,
}

impl Memory {
    /// Returns mutable [`Tables`] of this [`Memory`].
    fn tables(&mut self) -> &mut Tables {
        Arc::make_mut(&mut self.0)
    }

    /// Adds the provided [`User`].
    #[must_use]
    pub fn with_user(mut self, user: User) -> Self {
        self.tables().users.push(user);
        self
    }

    /// Adds the provided [`UserGroup`].
    #[must_use]
    pub fn with_user_group(mut self, group: UserGroup) -> Self {
        self.tables().user_groups.push(group);
        self
    }

    /// Makes the [`User`] a member of the [`UserGroup`].
    #[must_use]
    pub fn with_membership(
        mut self,
        user_id: user::Id,
        group_id: user_group::Id,
    ) -> Self {
        self.tables().memberships.push((user_id, group_id));
        self
    }

    /// Makes the [`User`] a participant of the submission, acting as a member
    /// of the [`UserGroup`].
    #[must_use]
    pub fn with_stage_assignment(
        mut self,
        submission_id: submission::Id,
        group_id: user_group::Id,
        user_id: user::Id,
    ) -> Self {
        self.tables()
            .stage_assignments
            .push((submission_id, group_id, user_id));
        self
    }

    /// Attaches the [`UserGroup`] to the workflow [`submission::Stage`].
    #[must_use]
    pub fn with_group_stage(
        mut self,
        group_id: user_group::Id,
        stage: submission::Stage,
    ) -> Self {
        self.tables().group_stages.push((group_id, stage));
        self
    }

    /// Makes the [`User`] an editor of the section within the tenant.
    #[must_use]
    pub fn with_section_editor(
        mut self,
        tenant_id: tenant::Id,
        section_id: section::Id,
        user_id: user::Id,
    ) -> Self {
        self.tables()
            .section_editors
            .push((tenant_id, section_id, user_id));
        self
    }

    /// Adds the provided [`Interest`].
    #[must_use]
    pub fn with_interest(mut self, interest: Interest) -> Self {
        self.tables().interests.push(interest);
        self
    }

    /// Attaches the [`Interest`] to the [`User`].
    #[must_use]
    pub fn with_user_interest(
        mut self,
        user_id: user::Id,
        interest_id: interest::Id,
    ) -> Self {
        self.tables().user_interests.push((user_id, interest_id));
        self
    }
}

impl Tables {
    /// Returns all the rows of the named relation.
    fn relation(&self, name: &str) -> Result<Vec<Row>, Error> {
        Ok(match name {
            users::TABLE => self.users.iter().map(user_row).collect(),
            user_groups::TABLE => self
                .user_groups
                .iter()
                .map(|g| {
                    row([
                        (user_groups::ID, i64::from(g.id).into()),
                        (
                            user_groups::CONTEXT_ID,
                            i64::from(g.tenant_id).into(),
                        ),
                        (user_groups::ROLE_ID, i64::from(g.role_id).into()),
                        (user_groups::SHOW_TITLE, g.show_title.into()),
                        (
                            user_groups::PERMIT_SELF_REGISTRATION,
                            g.permit_self_registration.into(),
                        ),
                        (user_groups::RECOMMEND_ONLY, g.recommend_only.into()),
                    ])
                })
                .collect(),
            user_user_groups::TABLE => self
                .memberships
                .iter()
                .map(|&(u, g)| {
                    row([
                        (user_user_groups::USER_ID, i64::from(u).into()),
                        (user_user_groups::USER_GROUP_ID, i64::from(g).into()),
                    ])
                })
                .collect(),
            stage_assignments::TABLE => self
                .stage_assignments
                .iter()
                .map(|&(s, g, u)| {
                    row([
                        (stage_assignments::SUBMISSION_ID, i64::from(s).into()),
                        (stage_assignments::USER_GROUP_ID, i64::from(g).into()),
                        (stage_assignments::USER_ID, i64::from(u).into()),
                    ])
                })
                .collect(),
            user_group_stage::TABLE => self
                .group_stages
                .iter()
                .map(|&(g, stage)| {
                    row([
                        (user_group_stage::USER_GROUP_ID, i64::from(g).into()),
                        (
                            user_group_stage::STAGE_ID,
                            i64::from(stage.u8()).into(),
                        ),
                    ])
                })
                .collect(),
            section_editors::TABLE => self
                .section_editors
                .iter()
                .map(|&(t, s, u)| {
                    row([
                        (section_editors::CONTEXT_ID, i64::from(t).into()),
                        (section_editors::SECTION_ID, i64::from(s).into()),
                        (section_editors::USER_ID, i64::from(u).into()),
                    ])
                })
                .collect(),
            interests::TABLE => self
                .interests
                .iter()
                .map(|i| {
                    row([
                        (interests::ID, i64::from(i.id).into()),
                        (interests::LABEL, i.label.clone().into()),
                    ])
                })
                .collect(),
            user_interests::TABLE => self
                .user_interests
                .iter()
                .map(|&(u, i)| {
                    row([
                        (user_interests::USER_ID, i64::from(u).into()),
                        (user_interests::INTEREST_ID, i64::from(i).into()),
                    ])
                })
                .collect(),
            _ => return Err(Error::UnknownRelation(name.to_owned())),
        })
    }

    /// Selects the [`User`]s matching the [`Description`] filter, along with
    /// their rows.
    fn matching_users(
        &self,
        desc: &Description,
    ) -> Result<Vec<(Row, &User)>, Error> {
        if desc.relation != users::TABLE {
            return Err(Error::UnknownRelation(desc.relation.to_string()));
        }

        let mut matched = Vec::new();
        for user in &self.users {
            let row = user_row(user);
            if self.matches(
                &row,
                &desc.fragments.predicates,
                &desc.fragments.joins,
            )? {
                matched.push((row, user));
            }
        }
        Ok(matched)
    }

    /// Checks whether the provided [`Row`] satisfies all the [`Predicate`]s
    /// and [`Join`]s.
    fn matches(
        &self,
        row: &Row,
        predicates: &[Predicate],
        joins: &[Join],
    ) -> Result<bool, Error> {
        for p in predicates {
            if !eval(row, p)? {
                return Ok(false);
            }
        }
        for join in joins {
            let outer = column(row, &join.outer)?;
            if *outer == Value::Null {
                return Ok(false);
            }
            let mut exists = false;
            for related in self.relation(&join.relation)? {
                if column(&related, &join.inner)? == outer
                    && self.matches(&related, &join.predicates, &join.joins)?
                {
                    exists = true;
                    break;
                }
            }
            if !exists {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Builds a [`Row`] out of the provided columns.
fn row<const N: usize>(columns: [(&'static str, Value); N]) -> Row {
    columns.into_iter().collect()
}

/// Builds a `users` [`Row`] out of the provided [`User`].
fn user_row(u: &User) -> Row {
    row([
        (users::ID, i64::from(u.id).into()),
        (users::USER_NAME, u.user_name.to_string().into()),
        (users::SALUTATION, u.salutation.clone().into()),
        (users::FIRST_NAME, u.first_name.clone().into()),
        (users::MIDDLE_NAME, u.middle_name.clone().into()),
        (users::LAST_NAME, u.last_name.clone().into()),
        (users::SUFFIX, u.suffix.clone().into()),
        (users::INITIALS, u.initials.clone().into()),
        (users::EMAIL, u.email.to_string().into()),
        (users::AFFILIATION, u.affiliation.clone().into()),
        (users::COUNTRY, u.country.clone().into()),
        (users::URL, u.url.clone().into()),
        (users::ORCID, u.orcid.clone().into()),
        (users::BIOGRAPHY, u.biography.clone().into()),
        (users::SIGNATURE, u.signature.clone().into()),
        (users::AUTH_ID, u.auth_id.into()),
        (users::AUTH_STRING, u.auth_string.clone().into()),
        (users::GENDER, u.gender.clone().into()),
        (users::PHONE, u.phone.clone().into()),
        (users::MAILING_ADDRESS, u.mailing_address.clone().into()),
        (users::BILLING_ADDRESS, u.billing_address.clone().into()),
        (users::GOSSIP, u.gossip.clone().into()),
        (users::DISABLED, u.disabled.into()),
        (users::DISABLED_REASON, u.disabled_reason.clone().into()),
        (users::DATE_REGISTERED, Value::DateTime(u.date_registered.coerce())),
        (users::DATE_VALIDATED, date(u.date_validated)),
        (users::DATE_LAST_LOGIN, date(u.date_last_login)),
        (users::MUST_CHANGE_PASSWORD, u.must_change_password.into()),
    ])
}

/// Represents the provided optional date as a [`Value`].
fn date<Of: ?Sized>(at: Option<DateTimeOf<Of>>) -> Value {
    at.map_or(Value::Null, |at| Value::DateTime(at.coerce()))
}

/// Returns the value of the named column of the provided [`Row`].
fn column<'r>(row: &'r Row, name: &str) -> Result<&'r Value, Error> {
    row.get(name)
        .ok_or_else(|| Error::UnknownColumn(name.to_owned()))
}

/// Evaluates the provided [`Predicate`] on the provided [`Row`].
fn eval(row: &Row, predicate: &Predicate) -> Result<bool, Error> {
    let (name, operator, value) = match predicate {
        Predicate::Compare {
            column,
            operator,
            value,
        } => (column, operator, value),
        Predicate::Any(ps) => {
            for p in ps {
                if eval(row, p)? {
                    return Ok(true);
                }
            }
            return Ok(false);
        }
    };

    let actual = column(row, name)?;
    Ok(match (operator, value) {
        (Operator::Eq, expected) => actual == expected,
        (Operator::In, Value::IntSet(set)) => {
            matches!(actual, Value::Int(v) if set.contains(v))
        }
        (Operator::Contains, Value::Text(needle)) => {
            matches!(
                actual,
                Value::Text(t) if t.to_lowercase().contains(&needle.to_lowercase()),
            )
        }
        (op, v) => {
            return Err(Error::UnsupportedComparison(format!(
                "`{op:?}` of `{name}` against `{v:?}`",
            )));
        }
    })
}

/// Compares the provided column values.
///
/// [`Value::Null`] is greater than anything else, like in Postgres.
fn compare(a: &Value, b: &Value) -> cmp::Ordering {
    use cmp::Ordering::{Equal, Greater, Less};

    match (a, b) {
        (Value::Null, Value::Null) => Equal,
        (Value::Null, _) => Greater,
        (_, Value::Null) => Less,
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Int(a), Value::Int(b)) => a.cmp(b),
        (Value::Text(a), Value::Text(b)) => a.cmp(b),
        (Value::DateTime(a), Value::DateTime(b)) => a.cmp(b),
        (_, _) => Equal,
    }
}

/// Converts the provided window bound into an index.
fn saturate(n: u64) -> usize {
    usize::try_from(n).unwrap_or(usize::MAX)
}

impl Database<Select<By<Option<User>, user::Id>>> for Memory {
    type Ok = Option<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self.0.users.iter().find(|u| u.id == id).cloned())
    }
}

impl Database<Select<By<Vec<User>, Description>>> for Memory {
    type Ok = Vec<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<User>, Description>>,
    ) -> Result<Self::Ok, Self::Err> {
        let desc = by.into_inner();

        let mut matched = self
            .0
            .matching_users(&desc)
            .map_err(tracerr::from_and_wrap!(=> database::Error))?;

        for sort in &desc.ordering {
            if !users_has_column(&sort.column) {
                return Err(tracerr::new!(database::Error::from(
                    Error::UnknownColumn(sort.column.to_string()),
                )));
            }
        }
        matched.sort_by(|(a, _), (b, _)| {
            desc.ordering
                .iter()
                .map(|s| {
                    let o = compare(
                        a.get(&*s.column).unwrap_or(&Value::Null),
                        b.get(&*s.column).unwrap_or(&Value::Null),
                    );
                    match s.order {
                        Order::Ascending => o,
                        Order::Descending => o.reverse(),
                    }
                })
                .find(|o| o.is_ne())
                .unwrap_or(cmp::Ordering::Equal)
        });

        let window = desc.window().unwrap_or_default();
        Ok(matched
            .into_iter()
            .skip(saturate(window.offset))
            .take(window.limit.map_or(usize::MAX, saturate))
            .map(|(_, u)| u.clone())
            .collect())
    }
}

/// Checks whether `users` [`Row`]s have the named column.
fn users_has_column(name: &str) -> bool {
    [
        users::ID,
        users::USER_NAME,
        users::FIRST_NAME,
        users::MIDDLE_NAME,
        users::LAST_NAME,
        users::EMAIL,
        users::AFFILIATION,
        users::COUNTRY,
        users::DISABLED,
        users::DATE_REGISTERED,
        users::DATE_LAST_LOGIN,
    ]
    .contains(&name)
}

impl Database<Select<By<read::user::list::TotalCount, Description>>>
    for Memory
{
    type Ok = read::user::list::TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<read::user::list::TotalCount, Description>>,
    ) -> Result<Self::Ok, Self::Err> {
        let desc = by.into_inner();

        let matched = self
            .0
            .matching_users(&desc)
            .map_err(tracerr::from_and_wrap!(=> database::Error))?;
        Ok(u64::try_from(matched.len()).unwrap_or(u64::MAX).into())
    }
}

impl Database<Select<By<Vec<UserGroup>, (user::Id, tenant::Id)>>> for Memory {
    type Ok = Vec<UserGroup>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<UserGroup>, (user::Id, tenant::Id)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (user_id, tenant_id) = by.into_inner();
        let tables = &self.0;

        let mut groups = tables
            .user_groups
            .iter()
            .filter(|g| {
                g.tenant_id == tenant_id
                    && tables.memberships.contains(&(user_id, g.id))
            })
            .cloned()
            .collect::<Vec<_>>();
        groups.sort_by_key(|g| i64::from(g.id));
        Ok(groups)
    }
}

impl Database<Select<By<Vec<Interest>, user::Id>>> for Memory {
    type Ok = Vec<Interest>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Interest>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let user_id = by.into_inner();
        let tables = &self.0;

        let mut interests = tables
            .interests
            .iter()
            .filter(|i| tables.user_interests.contains(&(user_id, i.id)))
            .cloned()
            .collect::<Vec<_>>();
        interests.sort_by_key(|i| i64::from(i.id));
        Ok(interests)
    }
}

/// [`Memory`] database error.
#[derive(Clone, Debug, Display, Eq, PartialEq, StdError)]
pub enum Error {
    /// Relation is not stored.
    #[display("unknown relation `{_0}`")]
    UnknownRelation(#[error(not(source))] String),

    /// Column is not present in a relation.
    #[display("unknown column `{_0}`")]
    UnknownColumn(#[error(not(source))] String),

    /// Comparison cannot be evaluated.
    #[display("unsupported comparison: {_0}")]
    UnsupportedComparison(#[error(not(source))] String),
}

#[cfg(test)]
mod spec {
    use common::{
        operations::{By, Select},
        pagination::{Arguments, Limit},
        query::{Fragments, Join, Predicate, Sort},
        DateTime, Description, Order,
    };

    use crate::{
        domain::{user::spec::user, Interest, User},
        infra::{database, Database},
        read::user::list::TotalCount,
        schema::{interests, user_interests, user_user_groups, users},
    };

    use super::{Error, Memory};

    fn memory() -> Memory {
        Memory::default()
            .with_user(User {
                id: 1.into(),
                user_name: "amy".into(),
                last_name: "Zeta".into(),
                date_last_login: Some(DateTime::UNIX_EPOCH.coerce()),
                ..user()
            })
            .with_user(User {
                id: 2.into(),
                user_name: "bob".into(),
                last_name: "Alpha".into(),
                email: "BOB@Example.com".into(),
                ..user()
            })
            .with_user(User {
                id: 3.into(),
                user_name: "cid".into(),
                last_name: "Alpha".into(),
                ..user()
            })
            .with_membership(2.into(), 9.into())
    }

    async fn select(db: &Memory, desc: Description) -> Vec<i64> {
        db.execute(Select(By::<Vec<User>, _>::new(desc)))
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.id.into())
            .collect()
    }

    fn sort(column: &'static str, order: Order) -> Sort {
        Sort {
            column: column.into(),
            order,
        }
    }

    #[tokio::test]
    async fn sorts_by_keys_in_order() {
        let desc = Description::page(
            users::TABLE,
            Fragments::default(),
            vec![
                sort(users::LAST_NAME, Order::Ascending),
                sort(users::ID, Order::Descending),
            ],
        );

        assert_eq!(select(&memory(), desc).await, [3, 2, 1]);
    }

    #[tokio::test]
    async fn sorts_nulls_last_ascending() {
        let desc = Description::page(
            users::TABLE,
            Fragments::default(),
            vec![
                sort(users::DATE_LAST_LOGIN, Order::Ascending),
                sort(users::ID, Order::Ascending),
            ],
        );

        assert_eq!(select(&memory(), desc).await, [1, 2, 3]);
    }

    #[tokio::test]
    async fn applies_window() {
        let desc = Arguments::new(Limit::Bounded(1), 1)
            .unwrap()
            .apply(Description::page(
                users::TABLE,
                Fragments::default(),
                vec![sort(users::ID, Order::Ascending)],
            ))
            .unwrap();

        assert_eq!(select(&memory(), desc).await, [2]);
    }

    #[tokio::test]
    async fn evaluates_predicates_and_joins() {
        let db = memory();
        let by_email = Fragments {
            predicates: vec![Predicate::contains(users::EMAIL, "example.COM")],
            joins: vec![],
        };
        let member = Fragments {
            predicates: vec![],
            joins: vec![Join::new(
                user_user_groups::TABLE,
                users::ID,
                user_user_groups::USER_ID,
            )
            .filter(Predicate::one_of(user_user_groups::USER_GROUP_ID, [9]))],
        };

        let count = |f: Fragments| {
            let db = db.clone();
            async move {
                u64::from(
                    db.execute(Select(By::<TotalCount, _>::new(
                        Description::count_only(users::TABLE, f),
                    )))
                    .await
                    .unwrap(),
                )
            }
        };

        assert_eq!(count(by_email).await, 3);
        assert_eq!(count(member).await, 1);
    }

    #[tokio::test]
    async fn evaluates_interests_and_profile_columns() {
        let db = memory()
            .with_user(User {
                id: 4.into(),
                user_name: "dee".into(),
                orcid: Some("https://orcid.org/0000-0001".into()),
                gender: Some("F".into()),
                ..user()
            })
            .with_interest(Interest {
                id: 7.into(),
                label: "Ecology".into(),
            })
            .with_interest(Interest {
                id: 8.into(),
                label: "Economy".into(),
            })
            .with_user_interest(4.into(), 7.into())
            .with_user_interest(1.into(), 8.into());
        let interested = |label: &str| {
            Join::new(
                user_interests::TABLE,
                users::ID,
                user_interests::USER_ID,
            )
            .join(
                Join::new(
                    interests::TABLE,
                    user_interests::INTEREST_ID,
                    interests::ID,
                )
                .filter(Predicate::contains(interests::LABEL, label)),
            )
        };

        let count = |f: Fragments| {
            let db = db.clone();
            async move {
                u64::from(
                    db.execute(Select(By::<TotalCount, _>::new(
                        Description::count_only(users::TABLE, f),
                    )))
                    .await
                    .unwrap(),
                )
            }
        };

        assert_eq!(
            count(Fragments {
                predicates: vec![],
                joins: vec![interested("eco")],
            })
            .await,
            2,
        );
        assert_eq!(
            count(Fragments {
                predicates: vec![Predicate::eq(users::GENDER, "F")],
                joins: vec![interested("ecol")],
            })
            .await,
            1,
        );
        assert_eq!(
            count(Fragments {
                predicates: vec![Predicate::eq(users::ORCID, None::<String>)],
                joins: vec![],
            })
            .await,
            3,
        );
    }

    #[tokio::test]
    async fn rejects_unknown_relation() {
        let desc = Description::count_only(
            users::TABLE,
            Fragments {
                predicates: vec![],
                joins: vec![Join::new("sessions", users::ID, "user_id")],
            },
        );

        let err = memory()
            .execute(Select(By::<TotalCount, _>::new(desc)))
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            database::Error::Memory(Error::UnknownRelation(r)) if r == "sessions",
        ));
    }
}
