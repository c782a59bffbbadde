//! # worklane-database
//!
//! PostgreSQL connection management and concrete repository
//! implementations for the Worklane auth tables.

pub mod connection;
pub mod repositories;

pub use connection::Database;
