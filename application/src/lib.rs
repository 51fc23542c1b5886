//! Application provides command line access to the [`Service`].

#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod args;
pub mod config;

use derive_more::{Display, Error as StdError, From};
use serde_json::{json, Value};
use service::{
    domain::{user, Tenant, User},
    infra::database,
    property::{Context, Request, ResolveError, Route, Values},
    query::{self, users::ExecutionError},
    read::user::list::TotalCount,
    Query,
};
use tracerr::Traced;
// Used in binary.
use refinery as _;
use tokio as _;
use tracing_subscriber as _;

pub use self::{
    args::{Args, Command},
    config::Config,
};
use self::args::{Page, Preset, Projection};

/// [`Service`] with filled infrastructure dependencies.
///
/// [`Service`]: service::Service
pub type Service = service::Service<service::infra::Postgres>;

/// Runs the provided [`Command`] against the provided [`Service`], returning
/// its JSON output.
///
/// # Errors
///
/// If the [`Command`] fails to execute.
///
/// [`Service`]: service::Service
#[tracing::instrument(skip_all)]
pub async fn run<Db>(
    svc: &service::Service<Db>,
    command: Command,
    api: &config::Api,
) -> Result<Value, Traced<Error>>
where
    service::Service<Db>: Query<
            query::users::List,
            Ok = Vec<User>,
            Err = Traced<ExecutionError>,
        > + Query<
            query::users::TotalCount,
            Ok = TotalCount,
            Err = Traced<ExecutionError>,
        > + Query<
            query::user::ById,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + for<'a> Query<
            query::user::Properties<'a>,
            Ok = Values,
            Err = Traced<ResolveError>,
        > + for<'a> Query<
            query::user::Summary<'a>,
            Ok = Values,
            Err = Traced<ResolveError>,
        > + for<'a> Query<
            query::user::Full<'a>,
            Ok = Values,
            Err = Traced<ResolveError>,
        >,
{
    match command {
        Command::List {
            scope,
            filter,
            page,
            projection,
        } => {
            let tenant = scope.tenant();
            let users = svc
                .execute(query::users::List {
                    context_id: tenant.id,
                    input: filter.into_input(page),
                })
                .await
                .map_err(tracerr::map_from_and_wrap!(=> Error))?;
            tracing::debug!(count = users.len(), "listed users");

            let ctx = context(api, Some(tenant));
            let mut out = Vec::with_capacity(users.len());
            for u in &users {
                out.push(Value::Object(
                    project(svc, u, &projection, &ctx)
                        .await
                        .map_err(tracerr::map_from_and_wrap!(=> Error))?,
                ));
            }
            Ok(Value::Array(out))
        }
        Command::Count { scope, filter } => {
            let total = svc
                .execute(query::users::TotalCount {
                    context_id: scope.context_id.into(),
                    input: filter.into_input(Page::default()),
                })
                .await
                .map_err(tracerr::map_from_and_wrap!(=> Error))?;
            Ok(json!({ "total": u64::from(total) }))
        }
        Command::Show {
            user_id,
            context_id,
            tenant_path,
            projection,
        } => {
            let id = user::Id::from(user_id);
            let u = svc
                .execute(query::user::ById::by(id))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> Error))?
                .ok_or_else(|| tracerr::new!(Error::UserNotFound(id)))?;

            let tenant = context_id.map(|id| args::tenant(id, tenant_path));
            let ctx = context(api, tenant);
            Ok(Value::Object(
                project(svc, &u, &projection, &ctx)
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> Error))?,
            ))
        }
    }
}

/// Resolves the properties of the provided [`User`] requested by the
/// [`Projection`].
async fn project<Db>(
    svc: &service::Service<Db>,
    user: &User,
    projection: &Projection,
    context: &Context,
) -> Result<Values, Traced<ResolveError>>
where
    service::Service<Db>: for<'a> Query<
            query::user::Properties<'a>,
            Ok = Values,
            Err = Traced<ResolveError>,
        > + for<'a> Query<
            query::user::Summary<'a>,
            Ok = Values,
            Err = Traced<ResolveError>,
        > + for<'a> Query<
            query::user::Full<'a>,
            Ok = Values,
            Err = Traced<ResolveError>,
        >,
{
    if let Some(names) = projection.names() {
        return svc
            .execute(query::user::Properties {
                user,
                names,
                context,
            })
            .await;
    }
    match projection.preset() {
        Preset::Summary => {
            svc.execute(query::user::Summary { user, context }).await
        }
        Preset::Full => svc.execute(query::user::Full { user, context }).await,
    }
}

/// Builds the properties resolution [`Context`] of a command line request.
///
/// The [`Route`] is known only when a [`Tenant`] is.
fn context(api: &config::Api, tenant: Option<Tenant>) -> Context {
    let route = tenant.as_ref().map(|t| Route {
        tenant_path: t.path.clone(),
        api_version: api.version.clone(),
        collection: api.collection.clone(),
    });
    Context {
        request: Request {
            actor: None,
            base_url: api.base_url.clone(),
        },
        tenant,
        route,
    }
}

/// Error of running a [`Command`].
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// Listing or counting failed.
    #[display("Failed to list users: {_0}")]
    Listing(ExecutionError),

    /// Properties resolution failed.
    #[display("Failed to resolve user properties: {_0}")]
    Resolve(ResolveError),

    /// [`Database`] error.
    ///
    /// [`Database`]: service::infra::Database
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`User`] doesn't exist.
    #[display("`User(id: {_0})` doesn't exist")]
    #[from(ignore)]
    UserNotFound(#[error(not(source))] user::Id),
}

#[cfg(test)]
mod spec {
    use common::DateTime;
    use serde_json::json;
    use service::{
        domain::{User, UserGroup},
        infra::Memory,
        Config, Hooks,
    };

    use crate::{
        args::{Filter, Page, Preset, Projection, Scope},
        config, Command, Error,
    };

    use super::run;

    fn user(id: i64, first_name: &str) -> User {
        User {
            id: id.into(),
            user_name: format!("user{id}").into(),
            salutation: None,
            first_name: first_name.into(),
            middle_name: None,
            last_name: "Doe".into(),
            suffix: None,
            initials: None,
            affiliation: None,
            country: None,
            url: None,
            email: format!("user{id}@example.com").into(),
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

    fn service() -> service::Service<Memory> {
        let db = Memory::default()
            .with_user(user(1, "Ann"))
            .with_user(user(2, "Bea"))
            .with_user_group(UserGroup {
                id: 10.into(),
                tenant_id: 5.into(),
                role_id: 4.into(),
                name: [("en", "Authors")].into_iter().collect(),
                abbrev: [("en", "AU")].into_iter().collect(),
                show_title: false,
                permit_self_registration: true,
                recommend_only: false,
            })
            .with_membership(1.into(), 10.into())
            .with_membership(2.into(), 10.into());
        service::Service::new(Config::default(), db, Hooks::default())
    }

    fn api() -> config::Api {
        config::Api {
            base_url: Some("https://example.com/".into()),
            ..config::Api::default()
        }
    }

    fn scope() -> Scope {
        Scope {
            context_id: 5,
            tenant_path: Some("journal".into()),
        }
    }

    #[tokio::test]
    async fn lists_summaries() {
        let out = run(
            &service(),
            Command::List {
                scope: scope(),
                filter: Filter::default(),
                page: Page::default(),
                projection: Projection::default(),
            },
            &api(),
        )
        .await
        .unwrap();

        assert_eq!(out.as_array().unwrap().len(), 2);
        assert_eq!(out[0]["id"], json!(2));
        assert_eq!(
            out[0]["href"],
            json!("https://example.com/journal/api/v1/users/2"),
        );
        assert_eq!(out[1]["fullName"], json!("Ann Doe"));
        assert_eq!(out[1]["groups"][0]["id"], json!(10));
    }

    #[tokio::test]
    async fn counts() {
        let out = run(
            &service(),
            Command::Count {
                scope: scope(),
                filter: Filter {
                    search_phrase: Some("bea".into()),
                    ..Filter::default()
                },
            },
            &api(),
        )
        .await
        .unwrap();

        assert_eq!(out, json!({ "total": 1 }));
    }

    #[tokio::test]
    async fn shows_requested_props_without_tenant() {
        let out = run(
            &service(),
            Command::Show {
                user_id: 1,
                context_id: None,
                tenant_path: None,
                projection: Projection {
                    preset: None,
                    props: vec!["userName".into(), "href".into()],
                },
            },
            &api(),
        )
        .await
        .unwrap();

        assert_eq!(out, json!({ "userName": "user1", "href": null }));
    }

    #[tokio::test]
    async fn shows_full_preset() {
        let out = run(
            &service(),
            Command::Show {
                user_id: 2,
                context_id: Some(5),
                tenant_path: None,
                projection: Projection {
                    preset: Some(Preset::Full),
                    props: vec![],
                },
            },
            &api(),
        )
        .await
        .unwrap();

        assert_eq!(out["email"], json!("user2@example.com"));
        assert_eq!(
            out["href"],
            json!("https://example.com/5/api/v1/users/2"),
        );
        assert_eq!(out["interests"], json!([]));
    }

    #[tokio::test]
    async fn fails_on_missing_user() {
        let err = run(
            &service(),
            Command::Show {
                user_id: 9,
                context_id: None,
                tenant_path: None,
                projection: Projection::default(),
            },
            &api(),
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            Error::UserNotFound(id) if i64::from(*id) == 9,
        ));
    }
}
