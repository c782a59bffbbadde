//! # worklane-core
//!
//! Core crate for the Worklane session & authorization authority.
//! Contains configuration schemas, the clock abstraction, the logging
//! bootstrap, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Worklane crates.

pub mod config;
pub mod error;
pub mod logging;
pub mod result;
pub mod time;

pub use error::AppError;
pub use result::AppResult;
pub use time::{Clock, ManualClock, SystemClock};
