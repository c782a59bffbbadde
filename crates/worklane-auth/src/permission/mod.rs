//! Permission resolution — role defaults plus per-member overrides.

pub mod policies;
pub mod resolver;

pub use policies::RolePolicies;
pub use resolver::{PermissionResolver, ResolvedPermissions};
