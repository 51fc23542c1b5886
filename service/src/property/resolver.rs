//! [`Resolver`] of [`User`] properties.

use common::operations::{By, Select};
use derive_more::{Display, Error, From};
use itertools::Itertools as _;
use serde_json::{json, Value};
use tracerr::Traced;

use crate::{
    domain::{tenant, user, Interest, User, UserGroup},
    hook::Hooks,
    infra::{database, Database},
};

use super::{Context, Extraction, Lookup, Property, Values, SUMMARY};

/// Resolver of [`User`] properties into [`Values`].
#[derive(Debug)]
pub struct Resolver<'s, Db> {
    /// [`Database`] to perform secondary lookups in.
    database: &'s Db,

    /// [`Hooks`] to run on presets and resolved [`Values`].
    hooks: &'s Hooks,

    /// Indicator whether unknown property names are rejected rather than
    /// ignored.
    strict: bool,
}

impl<'s, Db> Resolver<'s, Db> {
    /// Creates a new lenient [`Resolver`].
    #[must_use]
    pub fn new(database: &'s Db, hooks: &'s Hooks) -> Self {
        Self {
            database,
            hooks,
            strict: false,
        }
    }

    /// Makes this [`Resolver`] reject unknown property names, if `strict`.
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

impl<Db> Resolver<'_, Db>
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
    /// Resolves the properties of the provided [`User`] by their `names`.
    ///
    /// Duplicated names are resolved once. Secondary lookups are performed
    /// only for the requested properties.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::UnknownProperty`] if this [`Resolver`] is strict and
    ///   some name is not a [`Property`];
    /// - [`ResolveError::Db`] if a secondary lookup fails.
    #[tracing::instrument(
        skip_all,
        fields(user.id = %user.id, properties = names.len()),
    )]
    pub async fn resolve(
        &self,
        user: &User,
        names: &[String],
        ctx: &Context,
    ) -> Result<Values, Traced<ResolveError>> {
        use ResolveError as E;

        let names = names.iter().unique().cloned().collect::<Vec<_>>();

        let mut values = Values::new();
        for name in &names {
            let Some(property) = Property::from_name(name) else {
                if self.strict {
                    return Err(tracerr::new!(E::UnknownProperty(name.clone())));
                }
                tracing::debug!(property = %name, "unknown property ignored");
                continue;
            };
            let value = match property.extraction() {
                Extraction::Direct(extract) => extract(user),
                Extraction::Contextual(extract) => extract(user, ctx),
                Extraction::Lookup(lookup) => {
                    self.lookup(lookup, user, ctx)
                        .await
                        .map_err(tracerr::map_from_and_wrap!(=> E))?
                }
            };
            _ = values.insert(name.clone(), value);
        }

        self.hooks.run_values(&mut values, user, &names, ctx);

        Ok(values)
    }

    /// Resolves the summary preset of the provided [`User`].
    ///
    /// # Errors
    ///
    /// See [`Resolver::resolve()`].
    pub async fn resolve_summary(
        &self,
        user: &User,
        ctx: &Context,
    ) -> Result<Values, Traced<ResolveError>> {
        let mut names = preset(SUMMARY);
        self.hooks.run_summary(&mut names, user, ctx);
        self.resolve(user, &names, ctx).await
    }

    /// Resolves every known [`Property`] of the provided [`User`].
    ///
    /// # Errors
    ///
    /// See [`Resolver::resolve()`].
    pub async fn resolve_full(
        &self,
        user: &User,
        ctx: &Context,
    ) -> Result<Values, Traced<ResolveError>> {
        use strum::VariantArray as _;

        let mut names = preset(Property::VARIANTS.iter().copied());
        self.hooks.run_full(&mut names, user, ctx);
        self.resolve(user, &names, ctx).await
    }

    /// Performs the provided secondary [`Lookup`].
    ///
    /// `null` whenever the [`Context`] has no tenant.
    async fn lookup(
        &self,
        lookup: Lookup,
        user: &User,
        ctx: &Context,
    ) -> Result<Value, Traced<database::Error>> {
        let Some(tenant) = &ctx.tenant else {
            return Ok(Value::Null);
        };

        Ok(match lookup {
            Lookup::Groups => {
                let groups = self
                    .database
                    .execute(Select(By::<Vec<UserGroup>, _>::new((
                        user.id, tenant.id,
                    ))))
                    .await
                    .map_err(tracerr::wrap!())?;
                groups.iter().map(group_entry).collect()
            }
            Lookup::Interests => {
                let interests = self
                    .database
                    .execute(Select(By::<Vec<Interest>, _>::new(user.id)))
                    .await
                    .map_err(tracerr::wrap!())?;
                interests.iter().map(interest_entry).collect()
            }
        })
    }
}

/// Collects the names of the provided preset [`Property`]s.
fn preset(properties: impl IntoIterator<Item = Property>) -> Vec<String> {
    properties.into_iter().map(|p| p.name().to_owned()).collect()
}

/// Represents the provided [`UserGroup`] as a `groups` entry.
fn group_entry(group: &UserGroup) -> Value {
    json!({
        "id": i64::from(group.id),
        "name": Value::from(&group.name),
        "abbrev": Value::from(&group.abbrev),
        "roleId": i64::from(group.role_id),
        "showTitle": group.show_title,
        "permitSelfRegistration": group.permit_self_registration,
        "recommendOnly": group.recommend_only,
    })
}

/// Represents the provided [`Interest`] as an `interests` entry.
fn interest_entry(interest: &Interest) -> Value {
    json!({
        "id": i64::from(interest.id),
        "interest": interest.label,
    })
}

/// Error of resolving [`User`] properties.
#[derive(Debug, Display, Error, From)]
pub enum ResolveError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Requested property name is not a known [`Property`].
    #[display("`{_0}` is not a known user property")]
    UnknownProperty(#[error(not(source))] String),
}
