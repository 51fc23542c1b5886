//! [`Query`] collection related to a single [`User`].

use common::operations::{By, Select};
use tracerr::Traced;

#[cfg(doc)]
use crate::property::Property;
use crate::{
    domain::{tenant, user, Interest, User, UserGroup},
    infra::{database, Database},
    property::{Context, ResolveError, Values},
    Service,
};

use super::{DatabaseQuery, Query};

/// Queries a [`User`] by its [`user::Id`].
pub type ById = DatabaseQuery<By<Option<User>, user::Id>>;

/// [`Query`] resolving the requested properties of a [`User`].
#[derive(Clone, Copy, Debug)]
pub struct Properties<'a> {
    /// [`User`] to resolve the properties of.
    pub user: &'a User,

    /// Names of the requested properties.
    pub names: &'a [String],

    /// [`Context`] of the request.
    pub context: &'a Context,
}

/// [`Query`] resolving the summary preset of a [`User`].
#[derive(Clone, Copy, Debug)]
pub struct Summary<'a> {
    /// [`User`] to resolve the summary of.
    pub user: &'a User,

    /// [`Context`] of the request.
    pub context: &'a Context,
}

/// [`Query`] resolving every known [`Property`] of a [`User`].
#[derive(Clone, Copy, Debug)]
pub struct Full<'a> {
    /// [`User`] to resolve the properties of.
    pub user: &'a User,

    /// [`Context`] of the request.
    pub context: &'a Context,
}

impl<Db> Query<Properties<'_>> for Service<Db>
where
    Db: Database<
            Select<By<Vec<UserGroup>, (user::Id, tenant::Id)>>,
            Ok = Vec<UserGroup>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Interest>, user::Id>>,
            Ok = Vec<Interest>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Values;
    type Err = Traced<ResolveError>;

    async fn execute(
        &self,
        Properties {
            user,
            names,
            context,
        }: Properties<'_>,
    ) -> Result<Self::Ok, Self::Err> {
        self.resolver()
            .resolve(user, names, context)
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<Db> Query<Summary<'_>> for Service<Db>
where
    Db: Database<
            Select<By<Vec<UserGroup>, (user::Id, tenant::Id)>>,
            Ok = Vec<UserGroup>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Interest>, user::Id>>,
            Ok = Vec<Interest>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Values;
    type Err = Traced<ResolveError>;

    async fn execute(
        &self,
        Summary { user, context }: Summary<'_>,
    ) -> Result<Self::Ok, Self::Err> {
        self.resolver()
            .resolve_summary(user, context)
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<Db> Query<Full<'_>> for Service<Db>
where
    Db: Database<
            Select<By<Vec<UserGroup>, (user::Id, tenant::Id)>>,
            Ok = Vec<UserGroup>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Interest>, user::Id>>,
            Ok = Vec<Interest>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Values;
    type Err = Traced<ResolveError>;

    async fn execute(
        &self,
        Full { user, context }: Full<'_>,
    ) -> Result<Self::Ok, Self::Err> {
        self.resolver()
            .resolve_full(user, context)
            .await
            .map_err(tracerr::wrap!())
    }
}

#[cfg(test)]
mod spec {
    use serde_json::json;

    use crate::{
        domain::user::spec::user,
        infra::Memory,
        property::{Context, ResolveError},
        Config, Hooks, Query as _, Service,
    };

    use super::{ById, Full, Properties, Summary};

    fn service(config: Config) -> Service<Memory> {
        Service::new(
            config,
            Memory::default().with_user(user()),
            Hooks::default(),
        )
    }

    #[tokio::test]
    async fn gets_user_by_id() {
        let svc = service(Config::default());

        let found = svc.execute(ById::by(1.into())).await.unwrap();
        let missing = svc.execute(ById::by(2.into())).await.unwrap();

        assert_eq!(found, Some(user()));
        assert_eq!(missing, None);
    }

    #[tokio::test]
    async fn resolves_through_service() {
        let svc = service(Config::default());
        let u = user();
        let ctx = Context::default();
        let names = vec!["userName".to_owned(), "unknown".to_owned()];

        let values = svc
            .execute(Properties {
                user: &u,
                names: &names,
                context: &ctx,
            })
            .await
            .unwrap();
        let summary = svc
            .execute(Summary {
                user: &u,
                context: &ctx,
            })
            .await
            .unwrap();
        let full = svc
            .execute(Full {
                user: &u,
                context: &ctx,
            })
            .await
            .unwrap();

        assert_eq!(values.len(), 1);
        assert_eq!(values["userName"], json!("jdoe"));
        assert_eq!(summary["href"], json!(null));
        assert_eq!(summary["groups"], json!(null));
        assert!(full.len() > summary.len());
    }

    #[tokio::test]
    async fn strict_config_rejects_unknown() {
        let svc = service(Config {
            strict_properties: true,
        });
        let u = user();
        let names = vec!["unknown".to_owned()];

        let err = svc
            .execute(Properties {
                user: &u,
                names: &names,
                context: &Context::default(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ResolveError::UnknownProperty(_)));
    }
}
