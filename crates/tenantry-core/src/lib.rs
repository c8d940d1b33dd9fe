//! Tenantry Core: domain models, error taxonomy and the traits of the
//! three backends an organization or user spans: the identity provider,
//! the workflow engine and the system-of-record store.

pub mod actor;
pub mod error;
pub mod gateway;
pub mod models;
pub mod repository;
pub mod saga;
