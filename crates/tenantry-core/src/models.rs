//! Domain models for tenantry.
//!
//! These are the core types shared across all crates.

pub mod api;
pub mod identity;
pub mod organization;
pub mod role;
pub mod user;
pub mod workflow;
