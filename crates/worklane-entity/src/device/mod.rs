//! Device session entities.

pub mod kind;
pub mod model;

pub use kind::DeviceType;
pub use model::{DeviceSession, SessionAttributes};
