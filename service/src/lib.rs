//! Service lists the users of a tenant and projects their properties.
//!
//! List of available Cargo features:
#![doc = document_features::document_features!()]
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

pub mod domain;
pub mod hook;
pub mod infra;
pub mod property;
pub mod query;
pub mod read;
pub mod schema;

use std::sync::Arc;

use smart_default::SmartDefault;

#[cfg(doc)]
use infra::Database;

pub use self::{hook::Hooks, query::Query};

/// [`Service`] configuration.
#[derive(Clone, Copy, Debug, SmartDefault)]
pub struct Config {
    /// Indicator whether requesting an unknown user property is an error,
    /// rather than being silently ignored.
    #[default(false)]
    pub strict_properties: bool,
}

/// Domain service.
#[derive(Clone, Debug)]
pub struct Service<Db> {
    /// Configuration of this [`Service`].
    config: Config,

    /// [`Database`] of this [`Service`].
    database: Db,

    /// Extension [`Hooks`] of this [`Service`].
    hooks: Arc<Hooks>,
}

impl<Db> Service<Db> {
    /// Creates a new [`Service`] with the provided parameters.
    ///
    /// [`Hooks`] are fixed for the whole lifetime of the [`Service`].
    #[must_use]
    pub fn new(config: Config, database: Db, hooks: Hooks) -> Self {
        Self {
            config,
            database,
            hooks: Arc::new(hooks),
        }
    }

    /// Returns [`Config`] of this [`Service`].
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns [`Database`] of this [`Service`].
    #[must_use]
    pub fn database(&self) -> &Db {
        &self.database
    }

    /// Returns [`Hooks`] of this [`Service`].
    #[must_use]
    pub fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    /// Returns a [`property::Resolver`] configured for this [`Service`].
    #[must_use]
    pub fn resolver(&self) -> property::Resolver<'_, Db> {
        property::Resolver::new(&self.database, &self.hooks)
            .strict(self.config.strict_properties)
    }
}
