//! # worklane-entity
//!
//! Domain entity models for the Worklane session & authorization core.
//! Every struct in this crate represents a database table row or a domain
//! value object. All entities derive `Debug`, `Clone`, `Serialize`,
//! `Deserialize`, and database entities additionally derive
//! `sqlx::FromRow`.

pub mod device;
pub mod membership;
pub mod permission;
pub mod token;
pub mod user;
pub mod workspace;
