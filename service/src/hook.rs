//! Extension [`Hooks`].
//!
//! [`Hooks`] let third-party code adjust listing queries and resolved
//! properties without touching the [`Service`]. Each seam keeps its callbacks
//! in registration order, and each callback sees the changes made by the ones
//! registered before it.
//!
//! [`Service`]: crate::Service

use std::fmt;

use common::query::Fragments;

use crate::{
    domain::User,
    property::{self, Values},
    read::user::list::Selector,
};

/// Callback adjusting the filtering [`Fragments`] of a users listing.
pub type QueryHook = Box<dyn Fn(&mut Fragments, &Selector) + Send + Sync>;

/// Callback adjusting the resolved [`Values`] of a [`User`].
///
/// Receives the requested property names as well.
pub type ValuesHook = Box<
    dyn Fn(&mut Values, &User, &[String], &property::Context) + Send + Sync,
>;

/// Callback adjusting the property names of a preset.
pub type PresetHook =
    Box<dyn Fn(&mut Vec<String>, &User, &property::Context) + Send + Sync>;

/// Ordered callbacks registered for each extension seam.
#[derive(Default)]
pub struct Hooks {
    /// Callbacks run after the internal filters of a listing are applied.
    query: Vec<QueryHook>,

    /// Callbacks run after all the requested properties are resolved.
    values: Vec<ValuesHook>,

    /// Callbacks run on the summary preset before resolving it.
    summary: Vec<PresetHook>,

    /// Callbacks run on the full preset before resolving it.
    full: Vec<PresetHook>,
}

impl Hooks {
    /// Registers a callback adjusting listing [`Fragments`].
    #[must_use]
    pub fn on_query(
        mut self,
        hook: impl Fn(&mut Fragments, &Selector) + Send + Sync + 'static,
    ) -> Self {
        self.query.push(Box::new(hook));
        self
    }

    /// Registers a callback adjusting resolved [`Values`].
    #[must_use]
    pub fn on_values(
        mut self,
        hook: impl Fn(&mut Values, &User, &[String], &property::Context)
            + Send
            + Sync
            + 'static,
    ) -> Self {
        self.values.push(Box::new(hook));
        self
    }

    /// Registers a callback adjusting the summary preset.
    #[must_use]
    pub fn on_summary_properties(
        mut self,
        hook: impl Fn(&mut Vec<String>, &User, &property::Context)
            + Send
            + Sync
            + 'static,
    ) -> Self {
        self.summary.push(Box::new(hook));
        self
    }

    /// Registers a callback adjusting the full preset.
    #[must_use]
    pub fn on_full_properties(
        mut self,
        hook: impl Fn(&mut Vec<String>, &User, &property::Context)
            + Send
            + Sync
            + 'static,
    ) -> Self {
        self.full.push(Box::new(hook));
        self
    }

    /// Runs the [`QueryHook`]s.
    pub(crate) fn run_query(
        &self,
        fragments: &mut Fragments,
        selector: &Selector,
    ) {
        for hook in &self.query {
            hook(fragments, selector);
        }
    }

    /// Runs the [`ValuesHook`]s.
    pub(crate) fn run_values(
        &self,
        values: &mut Values,
        user: &User,
        names: &[String],
        ctx: &property::Context,
    ) {
        for hook in &self.values {
            hook(values, user, names, ctx);
        }
    }

    /// Runs the summary [`PresetHook`]s.
    pub(crate) fn run_summary(
        &self,
        names: &mut Vec<String>,
        user: &User,
        ctx: &property::Context,
    ) {
        for hook in &self.summary {
            hook(names, user, ctx);
        }
    }

    /// Runs the full [`PresetHook`]s.
    pub(crate) fn run_full(
        &self,
        names: &mut Vec<String>,
        user: &User,
        ctx: &property::Context,
    ) {
        for hook in &self.full {
            hook(names, user, ctx);
        }
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("query", &self.query.len())
            .field("values", &self.values.len())
            .field("summary", &self.summary.len())
            .field("full", &self.full.len())
            .finish()
    }
}
