//! [`Interest`]-related [`Database`] implementations.

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    domain::{user, Interest},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

impl<C> Database<Select<By<Vec<Interest>, user::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Interest>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Interest>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let user_id: user::Id = by.into_inner();

        const SQL: &str = "\
            SELECT i.interest_id, i.label \
            FROM interests AS i \
            INNER JOIN user_interests AS ui \
                    ON ui.interest_id = i.interest_id \
            WHERE ui.user_id = $1::INT8 \
            ORDER BY i.interest_id";
        Ok(self
            .query(SQL, &[&user_id])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| Interest {
                id: row.get("interest_id"),
                label: row.get("label"),
            })
            .collect())
    }
}
