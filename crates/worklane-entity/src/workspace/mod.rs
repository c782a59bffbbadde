//! Workspace entities.

pub mod model;

pub use model::Workspace;
