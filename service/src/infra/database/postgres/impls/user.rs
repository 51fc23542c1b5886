//! [`User`]-related [`Database`] implementations.

use common::{
    operations::{By, Select},
    Description,
};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{user, User},
    infra::{
        database::{
            self,
            postgres::{self, render, Connection},
            Postgres,
        },
        Database,
    },
    read,
};

/// Builds a [`User`] out of a whole `users` [`Row`].
fn user_from_row(row: &Row) -> User {
    User {
        id: row.get("user_id"),
        user_name: row.get("username"),
        salutation: row.get("salutation"),
        first_name: row.get("first_name"),
        middle_name: row.get("middle_name"),
        last_name: row.get("last_name"),
        suffix: row.get("suffix"),
        initials: row.get("initials"),
        affiliation: row.get("affiliation"),
        country: row.get("country"),
        url: row.get("url"),
        email: row.get("email"),
        orcid: row.get("orcid"),
        biography: row.get("biography"),
        signature: row.get("signature"),
        auth_id: row.get("auth_id"),
        auth_string: row.get("auth_string"),
        gender: row.get("gender"),
        phone: row.get("phone"),
        mailing_address: row.get("mailing_address"),
        billing_address: row.get("billing_address"),
        gossip: row.get("gossip"),
        disabled: row.get("disabled"),
        disabled_reason: row.get("disabled_reason"),
        date_registered: row.get("date_registered"),
        date_validated: row.get("date_validated"),
        date_last_login: row.get("date_last_login"),
        must_change_password: row.get("must_change_password"),
    }
}

impl<C> Database<Select<By<Option<User>, user::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: user::Id = by.into_inner();

        const SQL: &str = "\
            SELECT * \
            FROM users \
            WHERE user_id = $1::INT8";
        Ok(self
            .query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(user_from_row))
    }
}

impl<C> Database<Select<By<Vec<User>, Description>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<User>, Description>>,
    ) -> Result<Self::Ok, Self::Err> {
        let desc = by.into_inner();

        let sql = render::select(&desc)
            .map_err(tracerr::from_and_wrap!(=> postgres::Error))
            .map_err(tracerr::map_from)?;
        tracing::debug!(sql = %sql.text, "selecting users");

        Ok(self
            .query(sql.text.as_str(), &sql.params())
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(user_from_row)
            .collect())
    }
}

impl<C> Database<Select<By<read::user::list::TotalCount, Description>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = read::user::list::TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<read::user::list::TotalCount, Description>>,
    ) -> Result<Self::Ok, Self::Err> {
        let desc = by.into_inner();

        let sql = render::count(&desc)
            .map_err(tracerr::from_and_wrap!(=> postgres::Error))
            .map_err(tracerr::map_from)?;
        tracing::debug!(sql = %sql.text, "counting users");

        let count = self
            .query(sql.text.as_str(), &sql.params())
            .await
            .map_err(tracerr::wrap!())?
            .first()
            .map_or(0, |row| row.get::<_, i64>(0));
        Ok(u64::try_from(count).unwrap_or_default().into())
    }
}
