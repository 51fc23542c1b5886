//! [`User`] read model definitions.
//!
//! [`User`]: crate::domain::User

pub mod list;
