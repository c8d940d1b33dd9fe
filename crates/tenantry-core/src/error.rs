//! Error types for tenantry.
//!
//! Every error carries one of four kinds ([`ErrorKind`]) which callers
//! translate into a transport-level response. Wrapping an error with
//! [`ResultExt::context`] adds an operation description without
//! changing its kind.

use thiserror::Error;

/// Coarse classification of a failure, stable across wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadRequest,
    NotFound,
    Conflict,
    Internal,
}

#[derive(Debug, Error)]
pub enum TenantryError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Entity already exists: {entity} with id {id}")]
    Conflict { entity: String, id: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Identity provider error: {0}")]
    IdentityProvider(String),

    #[error("Workflow engine error: {0}")]
    Workflow(String),

    #[error("Cryptography error: {0}")]
    Crypto(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<TenantryError>,
    },
}

impl TenantryError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn conflict(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::Conflict {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::BadRequest(_) => ErrorKind::BadRequest,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Conflict { .. } => ErrorKind::Conflict,
            Self::Database(_)
            | Self::IdentityProvider(_)
            | Self::Workflow(_)
            | Self::Crypto(_)
            | Self::Internal(_) => ErrorKind::Internal,
            Self::Context { source, .. } => source.kind(),
        }
    }

    /// Wrap this error with an operation description, keeping its kind.
    pub fn context(self, context: impl Into<String>) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, skipping every context layer.
    pub fn root(&self) -> &TenantryError {
        match self {
            Self::Context { source, .. } => source.root(),
            other => other,
        }
    }
}

pub type TenantryResult<T> = Result<T, TenantryError>;

/// Adds [`TenantryError::context`] to results whose error converts into
/// [`TenantryError`].
pub trait ResultExt<T> {
    fn context(self, context: impl Into<String>) -> TenantryResult<T>;
}

impl<T, E: Into<TenantryError>> ResultExt<T> for Result<T, E> {
    fn context(self, context: impl Into<String>) -> TenantryResult<T> {
        self.map_err(|e| e.into().context(context))
    }
}
