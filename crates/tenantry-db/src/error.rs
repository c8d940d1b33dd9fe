//! Database-specific error types and conversions.

use tenantry_core::error::TenantryError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    /// A statement the server accepted but rejected at execution, such as
    /// a unique index or field assertion violation.
    #[error("Query failed: {0}")]
    Query(String),

    #[error("Invalid stored value: {0}")]
    Corrupt(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },
}

impl From<DbError> for TenantryError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => TenantryError::NotFound { entity, id },
            other => TenantryError::Database(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tenantry_core::error::ErrorKind;

    #[test]
    fn not_found_keeps_its_kind() {
        let err: TenantryError = DbError::NotFound {
            entity: "user".into(),
            id: "jdoe".into(),
        }
        .into();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err: TenantryError = DbError::Corrupt("bad uuid".into()).into();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[test]
    fn query_failure_is_not_reported_as_migration() {
        let err: TenantryError = DbError::Query("index violation".into()).into();
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.to_string(), "Database error: Query failed: index violation");
    }
}
