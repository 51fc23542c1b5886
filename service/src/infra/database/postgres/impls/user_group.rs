//! [`UserGroup`]-related [`Database`] implementations.

use common::operations::{By, Select};
use postgres_types::Json;
use tracerr::Traced;

use crate::{
    domain::{tenant, user, user_group::LocalizedText, UserGroup},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

impl<C> Database<Select<By<Vec<UserGroup>, (user::Id, tenant::Id)>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<UserGroup>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<UserGroup>, (user::Id, tenant::Id)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (user_id, tenant_id) = by.into_inner();

        const SQL: &str = "\
            SELECT g.user_group_id, g.context_id, g.role_id, \
                   g.name, g.abbrev, \
                   g.show_title, g.permit_self_registration, \
                   g.recommend_only \
            FROM user_groups AS g \
            INNER JOIN user_user_groups AS m \
                    ON m.user_group_id = g.user_group_id \
            WHERE m.user_id = $1::INT8 \
              AND g.context_id = $2::INT8 \
            ORDER BY g.user_group_id";
        Ok(self
            .query(SQL, &[&user_id, &tenant_id])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| UserGroup {
                id: row.get("user_group_id"),
                tenant_id: row.get("context_id"),
                role_id: row.get("role_id"),
                name: row.get::<_, Json<LocalizedText>>("name").0,
                abbrev: row.get::<_, Json<LocalizedText>>("abbrev").0,
                show_title: row.get("show_title"),
                permit_self_registration: row.get("permit_self_registration"),
                recommend_only: row.get("recommend_only"),
            })
            .collect())
    }
}
