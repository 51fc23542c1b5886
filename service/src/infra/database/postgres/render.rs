//! Rendering of query [`Description`]s as SQL.

use common::{
    query::{Join, Operator, Predicate, Value},
    DateTime, Description,
};
use derive_more::{Display, Error as StdError};
use itertools::Itertools as _;
use postgres_types::ToSql;

use super::LikePattern;

/// Rendered SQL statement along with its parameters.
#[derive(Debug)]
pub struct Sql<'d> {
    /// Text of the statement.
    pub text: String,

    /// Values bound to the statement placeholders, in order.
    binds: Vec<Bind<'d>>,
}

impl Sql<'_> {
    /// Returns the parameters to execute this [`Sql`] with.
    #[must_use]
    pub fn params(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.binds
            .iter()
            .map(|b| -> &(dyn ToSql + Sync) {
                match b {
                    Bind::Bool(v) => v,
                    Bind::Int(v) => v,
                    Bind::IntSet(v) => v,
                    Bind::Text(v) => v,
                    Bind::DateTime(v) => v,
                    Bind::Pattern(v) => v,
                }
            })
            .collect()
    }
}

/// Value bound to a placeholder.
#[derive(Debug)]
enum Bind<'d> {
    /// `BOOL` value.
    Bool(bool),

    /// `INT8` value.
    Int(i64),

    /// `INT8[]` value.
    IntSet(&'d [i64]),

    /// `VARCHAR` value.
    Text(&'d str),

    /// `TIMESTAMPTZ` value.
    DateTime(&'d DateTime),

    /// `ILIKE` pattern.
    Pattern(LikePattern),
}

/// Renders the provided [`Description`] as a `SELECT` of whole rows of its
/// main relation, ordered and windowed.
///
/// # Errors
///
/// If the [`Description`] contains a comparison SQL cannot express.
pub fn select(desc: &Description) -> Result<Sql<'_>, Error> {
    let mut r = Renderer::default();
    let alias = r.alias();

    let mut text = format!(
        "SELECT {alias}.* FROM {} {alias}{}",
        quote(&desc.relation),
        r.filter(&alias, &desc.fragments.predicates, &desc.fragments.joins)?,
    );
    if !desc.ordering.is_empty() {
        text.push_str(&format!(
            " ORDER BY {}",
            desc.ordering.iter().format_with(", ", |s, f| {
                f(&format_args!(
                    "{alias}.{} {}",
                    quote(&s.column),
                    s.order.sql(),
                ))
            }),
        ));
    }
    if let Some(window) = desc.window() {
        if let Some(limit) = window.limit {
            let idx = r.bind(Bind::Int(saturate(limit)));
            text.push_str(&format!(" LIMIT ${idx}::INT8"));
        }
        let idx = r.bind(Bind::Int(saturate(window.offset)));
        text.push_str(&format!(" OFFSET ${idx}::INT8"));
    }

    Ok(Sql {
        text,
        binds: r.binds,
    })
}

/// Renders the provided [`Description`] as a `COUNT(*)` of the matching rows
/// of its main relation, disregarding any ordering and window.
///
/// # Errors
///
/// If the [`Description`] contains a comparison SQL cannot express.
pub fn count(desc: &Description) -> Result<Sql<'_>, Error> {
    let mut r = Renderer::default();
    let alias = r.alias();

    let text = format!(
        "SELECT COUNT(*)::INT8 FROM {} {alias}{}",
        quote(&desc.relation),
        r.filter(&alias, &desc.fragments.predicates, &desc.fragments.joins)?,
    );

    Ok(Sql {
        text,
        binds: r.binds,
    })
}

/// State of rendering a single statement.
#[derive(Debug, Default)]
struct Renderer<'d> {
    /// Values bound so far.
    binds: Vec<Bind<'d>>,

    /// Number of relation aliases issued so far.
    aliases: usize,
}

impl<'d> Renderer<'d> {
    /// Issues a new relation alias.
    fn alias(&mut self) -> String {
        let alias = format!("t{}", self.aliases);
        self.aliases += 1;
        alias
    }

    /// Binds the provided value, returning its placeholder index.
    fn bind(&mut self, bind: Bind<'d>) -> usize {
        self.binds.push(bind);
        self.binds.len()
    }

    /// Renders a ` WHERE` clause, if there is anything to filter by.
    fn filter(
        &mut self,
        alias: &str,
        predicates: &'d [Predicate],
        joins: &'d [Join],
    ) -> Result<String, Error> {
        let conds = self.conditions(alias, predicates, joins)?;
        Ok(if conds.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conds.join(" AND "))
        })
    }

    /// Renders the conditions on the rows of the `alias`ed relation.
    fn conditions(
        &mut self,
        alias: &str,
        predicates: &'d [Predicate],
        joins: &'d [Join],
    ) -> Result<Vec<String>, Error> {
        let mut conds = predicates
            .iter()
            .map(|p| self.predicate(alias, p))
            .collect::<Result<Vec<_>, _>>()?;
        for join in joins {
            conds.push(self.join(alias, join)?);
        }
        Ok(conds)
    }

    /// Renders the provided [`Predicate`].
    fn predicate(
        &mut self,
        alias: &str,
        predicate: &'d Predicate,
    ) -> Result<String, Error> {
        let (column, operator, value) = match predicate {
            Predicate::Compare {
                column,
                operator,
                value,
            } => (column, operator, value),
            Predicate::Any(ps) if ps.is_empty() => {
                return Ok("FALSE".into());
            }
            Predicate::Any(ps) => {
                let ps = ps
                    .iter()
                    .map(|p| self.predicate(alias, p))
                    .collect::<Result<Vec<_>, _>>()?;
                return Ok(format!("({})", ps.join(" OR ")));
            }
        };

        let col = format!("{alias}.{}", quote(column));
        Ok(match (operator, value) {
            (Operator::Eq, Value::Null) => format!("{col} IS NULL"),
            (Operator::Eq, Value::Bool(v)) => {
                format!("{col} = ${}::BOOL", self.bind(Bind::Bool(*v)))
            }
            (Operator::Eq, Value::Int(v)) => {
                format!("{col} = ${}::INT8", self.bind(Bind::Int(*v)))
            }
            (Operator::Eq, Value::Text(v)) => {
                format!("{col} = ${}::VARCHAR", self.bind(Bind::Text(v)))
            }
            (Operator::Eq, Value::DateTime(v)) => format!(
                "{col} = ${}::TIMESTAMPTZ",
                self.bind(Bind::DateTime(v)),
            ),
            (Operator::In, Value::IntSet(vs)) => {
                format!("{col} = ANY(${}::INT8[])", self.bind(Bind::IntSet(vs)))
            }
            (Operator::Contains, Value::Text(v)) => format!(
                "{col} ILIKE ${}::VARCHAR",
                self.bind(Bind::Pattern(LikePattern::contains(v))),
            ),
            (op, v) => {
                return Err(Error::UnsupportedComparison(format!(
                    "`{op:?}` of `{column}` against `{v:?}`",
                )));
            }
        })
    }

    /// Renders the provided [`Join`] as an `EXISTS` sub-query.
    fn join(&mut self, outer: &str, join: &'d Join) -> Result<String, Error> {
        let alias = self.alias();
        let mut conds = vec![format!(
            "{alias}.{} = {outer}.{}",
            quote(&join.inner),
            quote(&join.outer),
        )];
        conds.extend(self.conditions(&alias, &join.predicates, &join.joins)?);
        Ok(format!(
            "EXISTS (SELECT 1 FROM {} {alias} WHERE {})",
            quote(&join.relation),
            conds.join(" AND "),
        ))
    }
}

/// Quotes the provided SQL identifier.
fn quote(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Converts the provided window bound into `INT8`.
fn saturate(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

/// Error of rendering a [`Description`].
#[derive(Clone, Debug, Display, Eq, PartialEq, StdError)]
pub enum Error {
    /// Comparison has no SQL representation.
    #[display("unsupported comparison: {_0}")]
    UnsupportedComparison(#[error(not(source))] String),
}

#[cfg(test)]
mod spec {
    use common::{
        pagination::{Arguments, Limit},
        query::{Fragments, Join, Operator, Predicate, Sort, Value},
        Description, Order,
    };

    use super::{count, select, Error};

    fn fragments() -> Fragments {
        Fragments {
            predicates: vec![
                Predicate::eq("disabled", false),
                Predicate::Any(vec![
                    Predicate::contains("username", "jo%"),
                    Predicate::contains("email", "jo%"),
                ]),
            ],
            joins: vec![Join::new("user_user_groups", "user_id", "user_id")
                .join(
                    Join::new("user_groups", "user_group_id", "user_group_id")
                        .filter(Predicate::eq("context_id", 5_i64))
                        .filter(Predicate::one_of("role_id", [4])),
                )],
        }
    }

    const WHERE: &str = " WHERE t0.\"disabled\" = $1::BOOL \
        AND (t0.\"username\" ILIKE $2::VARCHAR \
             OR t0.\"email\" ILIKE $3::VARCHAR) \
        AND EXISTS (\
            SELECT 1 FROM \"user_user_groups\" t1 \
            WHERE t1.\"user_id\" = t0.\"user_id\" \
              AND EXISTS (\
                SELECT 1 FROM \"user_groups\" t2 \
                WHERE t2.\"user_group_id\" = t1.\"user_group_id\" \
                  AND t2.\"context_id\" = $4::INT8 \
                  AND t2.\"role_id\" = ANY($5::INT8[])))";

    /// Collapses whitespace runs, so that expected SQL may be formatted.
    fn squash(sql: &str) -> String {
        sql.split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .replace("( ", "(")
    }

    #[test]
    fn renders_page() {
        let desc = Arguments::new(Limit::Bounded(10), 20)
            .unwrap()
            .apply(Description::page(
                "users",
                fragments(),
                vec![
                    Sort {
                        column: "last_name".into(),
                        order: Order::Ascending,
                    },
                    Sort {
                        column: "user_id".into(),
                        order: Order::Ascending,
                    },
                ],
            ))
            .unwrap();

        let sql = select(&desc).unwrap();

        assert_eq!(
            squash(&sql.text),
            squash(&format!(
                "SELECT t0.* FROM \"users\" t0{WHERE} \
                 ORDER BY t0.\"last_name\" ASC, t0.\"user_id\" ASC \
                 LIMIT $6::INT8 OFFSET $7::INT8",
            )),
        );
        assert_eq!(sql.params().len(), 7);
    }

    #[test]
    fn renders_count_with_same_filter() {
        let desc = Description::count_only("users", fragments());

        let sql = count(&desc).unwrap();

        assert_eq!(
            squash(&sql.text),
            squash(&format!("SELECT COUNT(*)::INT8 FROM \"users\" t0{WHERE}")),
        );
        assert_eq!(sql.params().len(), 5);
    }

    #[test]
    fn renders_edge_predicates() {
        let desc = Description::count_only(
            "users",
            Fragments {
                predicates: vec![
                    Predicate::eq("middle_name", None::<String>),
                    Predicate::Any(vec![]),
                ],
                joins: vec![],
            },
        );

        let sql = count(&desc).unwrap();

        assert_eq!(
            sql.text,
            "SELECT COUNT(*)::INT8 FROM \"users\" t0 \
             WHERE t0.\"middle_name\" IS NULL AND FALSE",
        );
        assert!(sql.params().is_empty());
    }

    #[test]
    fn renders_unfiltered_unbounded() {
        let desc = Arguments::new(Limit::Unbounded, 0)
            .unwrap()
            .apply(Description::page(
                "users",
                Fragments::default(),
                vec![Sort {
                    column: "user_id".into(),
                    order: Order::Descending,
                }],
            ))
            .unwrap();

        let sql = select(&desc).unwrap();

        assert_eq!(
            sql.text,
            "SELECT t0.* FROM \"users\" t0 \
             ORDER BY t0.\"user_id\" DESC OFFSET $1::INT8",
        );
    }

    #[test]
    fn rejects_unsupported_comparison() {
        let desc = Description::count_only(
            "users",
            Fragments {
                predicates: vec![Predicate::Compare {
                    column: "email".into(),
                    operator: Operator::In,
                    value: Value::Text("x".into()),
                }],
                joins: vec![],
            },
        );

        assert!(matches!(
            count(&desc),
            Err(Error::UnsupportedComparison(_)),
        ));
    }
}
