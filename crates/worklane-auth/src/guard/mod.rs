//! Request-time authorization guard.

pub mod enforcer;
pub mod requirements;

pub use enforcer::AccessGuard;
pub use requirements::AccessRequirements;
