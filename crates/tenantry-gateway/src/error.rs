//! Gateway error types and their mapping into the core taxonomy.

use tenantry_core::error::TenantryError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("base URL cannot be a base: {0}")]
    InvalidBaseUrl(String),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("{entity} already exists: {id}")]
    Conflict { entity: &'static str, id: String },

    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl GatewayError {
    /// Convert into the core error, keeping NotFound and Conflict and
    /// reporting everything else through `backend`.
    pub fn into_tenantry(self, backend: fn(String) -> TenantryError) -> TenantryError {
        match self {
            Self::NotFound { entity, id } => TenantryError::not_found(entity, id),
            Self::Conflict { entity, id } => TenantryError::conflict(entity, id),
            other => backend(other.to_string()),
        }
    }
}
