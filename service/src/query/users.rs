//! [`Query`] collection related to the multiple [`User`]s.

use common::{
    operations::{By, Select},
    pagination::ApplyError,
    Description,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{tenant, User},
    infra::{database, Database},
    read::{
        self,
        user::list::{Builder, Input, InvalidInput, Selector},
    },
    Service,
};

use super::Query;

/// [`Query`] for a page of [`User`]s matching an [`Input`].
#[derive(Clone, Debug)]
pub struct List {
    /// ID of the tenant to list [`User`]s within.
    pub context_id: tenant::Id,

    /// Listing [`Input`].
    pub input: Input,
}

/// [`Query`] for the total count of [`User`]s matching an [`Input`].
///
/// Pagination of the [`Input`] is validated, but doesn't affect the count.
#[derive(Clone, Debug)]
pub struct TotalCount {
    /// ID of the tenant to count [`User`]s within.
    pub context_id: tenant::Id,

    /// Listing [`Input`].
    pub input: Input,
}

impl<Db> Query<List> for Service<Db>
where
    Db: Database<
        Select<By<Vec<User>, Description>>,
        Ok = Vec<User>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Vec<User>;
    type Err = Traced<ExecutionError>;

    #[tracing::instrument(skip_all, fields(context.id = %context_id))]
    async fn execute(
        &self,
        List { context_id, input }: List,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let selector = Selector::new(context_id, input)
            .map_err(tracerr::from_and_wrap!(=> E))?;
        let desc = selector
            .arguments
            .apply(Builder::new(self.hooks()).build(&selector))
            .map_err(tracerr::from_and_wrap!(=> E))?;

        self.database()
            .execute(Select(By::new(desc)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
    }
}

impl<Db> Query<TotalCount> for Service<Db>
where
    Db: Database<
        Select<By<read::user::list::TotalCount, Description>>,
        Ok = read::user::list::TotalCount,
        Err = Traced<database::Error>,
    >,
{
    type Ok = read::user::list::TotalCount;
    type Err = Traced<ExecutionError>;

    #[tracing::instrument(skip_all, fields(context.id = %context_id))]
    async fn execute(
        &self,
        TotalCount { context_id, input }: TotalCount,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let selector = Selector::new(context_id, input)
            .map_err(tracerr::from_and_wrap!(=> E))?;
        let desc = Builder::new(self.hooks()).build_count_only(&selector);

        self.database()
            .execute(Select(By::new(desc)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
    }
}

/// Error of [`List`] or [`TotalCount`] [`Query`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Input`] is invalid.
    #[display("Invalid input: {_0}")]
    InvalidInput(InvalidInput),

    /// Page cannot be applied.
    #[display("Failed to paginate: {_0}")]
    Pagination(ApplyError),
}

#[cfg(test)]
mod spec {
    use common::{pagination::Limit, query::Predicate};

    use crate::{
        domain::{submission::Stage, user::spec::user, User, UserGroup},
        infra::Memory,
        read::user::list::{Input, InvalidInput},
        schema::users,
        Config, Hooks, Query as _, Service,
    };

    use super::{ExecutionError, List, TotalCount};

    fn group(id: i64, tenant: i64, role: i64) -> UserGroup {
        UserGroup {
            id: id.into(),
            tenant_id: tenant.into(),
            role_id: role.into(),
            name: [("en", "Group")].into_iter().collect(),
            abbrev: [("en", "GR")].into_iter().collect(),
            show_title: false,
            permit_self_registration: false,
            recommend_only: false,
        }
    }

    /// Users 1-3 are active and 4-5 are disabled, all holding role `4` in
    /// tenant `5`. Active user 6 holds role `4` in tenant `6` only.
    fn memory() -> Memory {
        let mut db = Memory::default()
            .with_user_group(group(10, 5, 4))
            .with_user_group(group(11, 6, 4))
            .with_user_group(group(12, 5, 8));
        for id in 1_i64..=6 {
            db = db
                .with_user(User {
                    id: id.into(),
                    user_name: format!("user{id}").into(),
                    first_name: ["Ann", "Bea", "Cat", "Dan", "Eve", "Fay"]
                        [usize::try_from(id - 1).unwrap()]
                    .into(),
                    disabled: (4..=5).contains(&id),
                    ..user()
                })
                .with_membership(
                    id.into(),
                    if id == 6 { 11_i64 } else { 10 }.into(),
                );
        }
        db
    }

    fn service(db: Memory, hooks: Hooks) -> Service<Memory> {
        Service::new(Config::default(), db, hooks)
    }

    async fn list(svc: &Service<Memory>, input: Input) -> Vec<i64> {
        svc.execute(List {
            context_id: 5.into(),
            input,
        })
        .await
        .unwrap()
        .into_iter()
        .map(|u| u.id.into())
        .collect()
    }

    async fn count(svc: &Service<Memory>, input: Input) -> u64 {
        svc.execute(TotalCount {
            context_id: 5.into(),
            input,
        })
        .await
        .unwrap()
        .into()
    }

    fn by_role() -> Input {
        Input {
            role_ids: vec![4.into()],
            ..Input::default()
        }
    }

    #[tokio::test]
    async fn lists_active_role_holders_newest_first() {
        let svc = service(memory(), Hooks::default());

        assert_eq!(list(&svc, by_role()).await, [3, 2, 1]);
        assert_eq!(count(&svc, by_role()).await, 3);
    }

    #[tokio::test]
    async fn filters_by_status() {
        let svc = service(memory(), Hooks::default());
        let status = |s: &str| Input {
            status: Some(s.into()),
            ..by_role()
        };

        assert_eq!(list(&svc, status("disabled")).await, [5, 4]);
        assert_eq!(count(&svc, status("all")).await, 5);
    }

    #[tokio::test]
    async fn count_ignores_pagination() {
        let svc = service(memory(), Hooks::default());
        let page = |count, offset| Input {
            count: Some(count),
            offset: Some(offset),
            status: Some("all".into()),
            ..by_role()
        };

        assert_eq!(list(&svc, page(Limit::Bounded(2), 0)).await, [5, 4]);
        assert_eq!(list(&svc, page(Limit::Bounded(2), 4)).await, [1]);
        assert!(list(&svc, page(Limit::Bounded(2), 10)).await.is_empty());
        assert!(list(&svc, page(Limit::Bounded(0), 0)).await.is_empty());
        assert_eq!(list(&svc, page(Limit::Unbounded, 1)).await, [4, 3, 2, 1]);
        assert_eq!(count(&svc, page(Limit::Bounded(2), 10)).await, 5);
    }

    #[tokio::test]
    async fn searches_every_token() {
        let svc = service(memory(), Hooks::default());
        let search = |s: &str| Input {
            search_phrase: Some(s.into()),
            ..Input::default()
        };

        assert_eq!(list(&svc, search("  ")).await, [6, 3, 2, 1]);
        assert_eq!(list(&svc, search("bea")).await, [2]);
        assert_eq!(list(&svc, search("USER3 doe")).await, [3]);
        assert!(list(&svc, search("bea cat")).await.is_empty());
    }

    #[tokio::test]
    async fn orders_with_id_tiebreak() {
        let svc = service(memory(), Hooks::default());

        let ids = list(
            &svc,
            Input {
                order_by: Some("lastName".into()),
                order_direction: Some("ASC".into()),
                ..by_role()
            },
        )
        .await;

        assert_eq!(ids, [1, 2, 3]);
    }

    #[tokio::test]
    async fn filters_by_assignments() {
        let db = memory()
            .with_stage_assignment(7.into(), 10.into(), 1.into())
            .with_stage_assignment(7.into(), 12.into(), 2.into())
            .with_group_stage(12.into(), Stage::ExternalReview)
            .with_section_editor(5.into(), 3.into(), 3.into())
            .with_section_editor(6.into(), 3.into(), 2.into());
        let svc = service(db, Hooks::default());

        let submission = |stage| Input {
            assigned_to_submission: Some(7.into()),
            assigned_to_submission_stage: stage,
            ..Input::default()
        };
        let section = Input {
            assigned_to_section: Some(3.into()),
            ..Input::default()
        };

        assert_eq!(list(&svc, submission(None)).await, [2, 1]);
        assert_eq!(list(&svc, submission(Some(3))).await, [2]);
        assert!(list(&svc, submission(Some(1))).await.is_empty());
        assert_eq!(list(&svc, section).await, [3]);
    }

    #[tokio::test]
    async fn hooks_constrain_both_list_and_count() {
        let hooks = Hooks::default().on_query(|f, _| {
            _ = f.filter(Predicate::eq(users::FIRST_NAME, "Bea"));
        });
        let svc = service(memory(), hooks);

        assert_eq!(list(&svc, by_role()).await, [2]);
        assert_eq!(count(&svc, by_role()).await, 1);
    }

    #[tokio::test]
    async fn query_hooks_run_in_registration_order() {
        let hooks = Hooks::default()
            .on_query(|f, _| {
                _ = f.filter(Predicate::eq(users::FIRST_NAME, "Bea"));
            })
            .on_query(|f, _| {
                if f.predicates.last()
                    == Some(&Predicate::eq(users::FIRST_NAME, "Bea"))
                {
                    _ = f.predicates.pop();
                    _ = f.filter(Predicate::eq(users::FIRST_NAME, "Cat"));
                }
            });
        let svc = service(memory(), hooks);

        assert_eq!(list(&svc, by_role()).await, [3]);
        assert_eq!(count(&svc, by_role()).await, 1);
    }

    #[tokio::test]
    async fn rejects_invalid_input() {
        let svc = service(memory(), Hooks::default());

        let err = svc
            .execute(List {
                context_id: 5.into(),
                input: Input {
                    order_by: Some("password".into()),
                    ..Input::default()
                },
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::InvalidInput(InvalidInput::UnknownOrderBy(_)),
        ));

        let err = svc
            .execute(TotalCount {
                context_id: 5.into(),
                input: Input {
                    offset: Some(-1),
                    ..Input::default()
                },
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::InvalidInput(InvalidInput::Pagination(_)),
        ));
    }
}
