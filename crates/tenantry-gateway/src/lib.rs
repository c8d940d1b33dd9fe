//! Tenantry Gateway: HTTP adapters for the collaborators an organization
//! spans outside the record store.
//!
//! - [`KeycloakClient`] implements the identity provider over the
//!   Keycloak admin REST API.
//! - [`ArgoClient`] implements the workflow submitter over the Argo
//!   Workflows server API.

mod argo;
mod error;
mod http;
mod keycloak;

pub use argo::{ArgoClient, ArgoConfig};
pub use error::GatewayError;
pub use keycloak::{KeycloakClient, KeycloakConfig, realm_slug};
