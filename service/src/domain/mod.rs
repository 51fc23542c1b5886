//! Domain definitions.

pub mod interest;
pub mod role;
pub mod section;
pub mod submission;
pub mod tenant;
pub mod user;
pub mod user_group;

pub use self::{
    interest::Interest, tenant::Tenant, user::User, user_group::UserGroup,
};
