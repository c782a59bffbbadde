//! Workspace membership entities.

pub mod model;
pub mod overrides;
pub mod role;
pub mod status;

pub use model::Membership;
pub use overrides::PermissionOverrides;
pub use role::WorkspaceRole;
pub use status::MembershipStatus;
