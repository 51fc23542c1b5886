//! [`Args`] definitions.

use clap::{Parser, Subcommand, ValueEnum};
use common::pagination::Limit;
use service::{
    domain::{role, tenant, Tenant},
    read::user::list::Input,
};

/// Lists, counts and projects users of a tenant.
#[derive(Debug, Parser)]
#[command(name = "users", version, about, long_about = None)]
pub struct Args {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub config: String,

    /// [`Command`] to run.
    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    /// Parses command line arguments.
    ///
    /// # Errors
    ///
    /// Errors if failed to parse command line arguments.
    pub fn parse() -> Result<Self, clap::Error> {
        <Self as Parser>::try_parse()
    }
}

/// Command to run.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Prints a page of the matching users.
    List {
        /// Tenant to list users within.
        #[command(flatten)]
        scope: Scope,

        /// Users filter.
        #[command(flatten)]
        filter: Filter,

        /// Page to print.
        #[command(flatten)]
        page: Page,

        /// Properties to print for each user.
        #[command(flatten)]
        projection: Projection,
    },

    /// Prints the total number of the matching users.
    Count {
        /// Tenant to count users within.
        #[command(flatten)]
        scope: Scope,

        /// Users filter.
        #[command(flatten)]
        filter: Filter,
    },

    /// Prints a single user.
    Show {
        /// ID of the user to print.
        user_id: i64,

        /// Tenant to resolve the tenant-scoped properties within.
        #[arg(long = "context", value_name = "ID")]
        context_id: Option<i64>,

        /// URL path of the tenant. Defaults to its ID.
        #[arg(long, value_name = "PATH", requires = "context_id")]
        tenant_path: Option<String>,

        /// Properties to print.
        #[command(flatten)]
        projection: Projection,
    },
}

/// Tenant a [`Command`] is scoped to.
#[derive(Clone, Debug, clap::Args)]
pub struct Scope {
    /// ID of the tenant.
    #[arg(long = "context", value_name = "ID")]
    pub context_id: i64,

    /// URL path of the tenant. Defaults to its ID.
    #[arg(long, value_name = "PATH")]
    pub tenant_path: Option<String>,
}

impl Scope {
    /// Returns the [`Tenant`] described by this [`Scope`].
    #[must_use]
    pub fn tenant(&self) -> Tenant {
        tenant(self.context_id, self.tenant_path.clone())
    }
}

/// Builds a [`Tenant`] out of its command line representation.
pub(crate) fn tenant(id: i64, path: Option<String>) -> Tenant {
    Tenant {
        id: tenant::Id::from(id),
        path: path.unwrap_or_else(|| id.to_string()).into(),
    }
}

/// Users filter, as accepted on the command line.
#[derive(Clone, Debug, Default, clap::Args)]
pub struct Filter {
    /// Roles users must hold any of, by name (like `author`) or ID.
    #[arg(long = "role", value_name = "ROLE", value_delimiter = ',')]
    pub role_ids: Vec<role::Id>,

    /// Submission users must participate in.
    #[arg(long = "submission", value_name = "ID")]
    pub assigned_to_submission: Option<i64>,

    /// Code of the stage the submission participation must be in.
    #[arg(
        long = "stage",
        value_name = "CODE",
        requires = "assigned_to_submission",
        allow_negative_numbers = true
    )]
    pub assigned_to_submission_stage: Option<i64>,

    /// Section users must be editors of.
    #[arg(long = "section", value_name = "ID")]
    pub assigned_to_section: Option<i64>,

    /// `active`, `disabled` or `all`.
    #[arg(long)]
    pub status: Option<String>,

    /// Free text every token of which must match.
    #[arg(long = "search", value_name = "PHRASE")]
    pub search_phrase: Option<String>,

    /// Column to order by, like `lastName`.
    #[arg(long)]
    pub order_by: Option<String>,

    /// `ASC` or `DESC`.
    #[arg(long = "order", value_name = "DIRECTION")]
    pub order_direction: Option<String>,
}

/// Page of a listing.
#[derive(Clone, Copy, Debug, Default, clap::Args)]
pub struct Page {
    /// Page size, or `unbounded`.
    #[arg(long, allow_negative_numbers = true)]
    pub count: Option<Limit>,

    /// Number of users to skip.
    #[arg(long, allow_negative_numbers = true)]
    pub offset: Option<i64>,
}

impl Filter {
    /// Combines this [`Filter`] with the provided [`Page`] into an [`Input`].
    #[must_use]
    pub fn into_input(self, page: Page) -> Input {
        let Self {
            role_ids,
            assigned_to_submission,
            assigned_to_submission_stage,
            assigned_to_section,
            status,
            search_phrase,
            order_by,
            order_direction,
        } = self;
        let Page { count, offset } = page;

        Input {
            order_by,
            order_direction,
            role_ids,
            assigned_to_submission: assigned_to_submission.map(Into::into),
            assigned_to_submission_stage,
            assigned_to_section: assigned_to_section.map(Into::into),
            status,
            search_phrase,
            count,
            offset,
        }
    }
}

/// Properties to print for a user.
#[derive(Clone, Debug, Default, clap::Args)]
#[group(multiple = false)]
pub struct Projection {
    /// Named set of properties.
    #[arg(long, value_enum)]
    pub preset: Option<Preset>,

    /// Comma-separated names of the properties.
    #[arg(long, value_name = "NAMES", value_delimiter = ',')]
    pub props: Vec<String>,
}

/// Named set of user properties.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum Preset {
    /// Properties shown in listings.
    #[default]
    Summary,

    /// Every known property.
    Full,
}

impl Projection {
    /// Returns the explicitly requested property names, if any.
    ///
    /// [`None`] means the [`Preset`] should be resolved instead.
    #[must_use]
    pub fn names(&self) -> Option<&[String]> {
        (self.preset.is_none() && !self.props.is_empty())
            .then_some(self.props.as_slice())
    }

    /// Returns the [`Preset`] to resolve when no names are requested.
    #[must_use]
    pub fn preset(&self) -> Preset {
        self.preset.unwrap_or_default()
    }
}

#[cfg(test)]
mod spec {
    use std::iter;

    use clap::Parser as _;
    use common::pagination::Limit;
    use service::domain::role;

    use super::{Args, Command, Preset};

    fn parse(args: &[&str]) -> Command {
        Args::try_parse_from(iter::once("users").chain(args.iter().copied()))
            .unwrap()
            .command
    }

    #[test]
    fn parses_list() {
        let Command::List {
            scope,
            filter,
            page,
            projection,
        } = parse(&[
            "list",
            "--context",
            "5",
            "--role",
            "author,16",
            "--search",
            "jane doe",
            "--count",
            "unbounded",
            "--offset",
            "-1",
            "--props",
            "id,userName",
        ])
        else {
            panic!("expected `list` command");
        };

        assert_eq!(scope.context_id, 5);
        assert_eq!(scope.tenant().path.to_string(), "5");
        assert_eq!(filter.role_ids, [role::Id::AUTHOR, role::Id::from(16)]);
        assert_eq!(filter.search_phrase.as_deref(), Some("jane doe"));
        assert_eq!(page.count, Some(Limit::Unbounded));
        assert_eq!(page.offset, Some(-1));
        assert_eq!(
            projection.names(),
            Some(["id".to_owned(), "userName".to_owned()].as_slice()),
        );
    }

    #[test]
    fn parses_show() {
        let Command::Show {
            user_id,
            context_id,
            projection,
            ..
        } = parse(&["show", "7", "--preset", "full"])
        else {
            panic!("expected `show` command");
        };

        assert_eq!(user_id, 7);
        assert_eq!(context_id, None);
        assert_eq!(projection.names(), None);
        assert_eq!(projection.preset(), Preset::Full);
    }

    #[test]
    fn rejects_conflicting_projection() {
        let res = Args::try_parse_from([
            "users", "show", "7", "--preset", "full", "--props", "id",
        ]);

        assert!(res.is_err());
    }

    #[test]
    fn requires_context_for_listing() {
        assert!(Args::try_parse_from(["users", "count"]).is_err());
    }
}
