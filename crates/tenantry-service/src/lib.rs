//! Tenantry Service: the organization and user orchestrators.
//!
//! Both are generic over the repository and gateway traits of
//! `tenantry-core`, so this crate depends on neither the database nor the
//! HTTP adapters.

pub mod config;
pub mod organization;
pub mod password;
pub mod user;

pub use config::ServiceConfig;
pub use organization::OrganizationService;
pub use user::UserService;
