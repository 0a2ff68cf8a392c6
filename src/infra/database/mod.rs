//! Concrete database client implementations.
//!
//! This module contains the database adapter that implements
//! the `DatabaseClient` trait defined in the domain layer.

pub mod postgres;

pub use postgres::{PostgresClient, PostgresConfig};
