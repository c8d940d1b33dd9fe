//! Tenantry Database: SurrealDB connection management and the record
//! store behind organizations, users and the role catalog.
//!
//! This crate provides:
//! - Connection management ([`DbManager`], [`DbConfig`])
//! - Schema initialization and migrations ([`run_migrations`])
//! - Error types ([`DbError`])
//! - Repository implementations of the `tenantry-core` traits ([`repository`])

mod connection;
mod error;
mod schema;

pub mod repository;

pub use connection::{DbConfig, DbManager};
pub use error::DbError;
pub use schema::{ADMIN_ROLE_ID, USER_ROLE_ID, run_migrations};
