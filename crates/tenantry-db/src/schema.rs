//! Schema definitions and migration runner for SurrealDB.
//!
//! All tables are SCHEMAFULL. UUIDs are stored as strings and the
//! organization status is a string guarded by an ASSERT.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

/// Identifier of the seeded `admin` role.
pub const ADMIN_ROLE_ID: &str = "9b1f7c52-3a0e-4a5d-8c11-0d6b2f1a0001";
/// Identifier of the seeded `user` role.
pub const USER_ROLE_ID: &str = "9b1f7c52-3a0e-4a5d-8c11-0d6b2f1a0002";

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "initial_schema",
        sql: SCHEMA_V1,
    },
    Migration {
        version: 2,
        name: "seed_roles",
        sql: SEED_ROLES_V2,
    },
];

// -----------------------------------------------------------------------
// Schema v1
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Organizations, keyed by the identity provider's realm id
-- =======================================================================
DEFINE TABLE organization SCHEMAFULL;
DEFINE FIELD name ON TABLE organization TYPE string;
DEFINE FIELD description ON TABLE organization TYPE string DEFAULT '';
DEFINE FIELD phone ON TABLE organization TYPE string DEFAULT '';
DEFINE FIELD creator ON TABLE organization TYPE option<string>;
DEFINE FIELD status ON TABLE organization TYPE string DEFAULT 'UNSET' \
    ASSERT $value IN ['UNSET', 'PENDING', 'CREATING', 'CREATED', \
    'ERROR', 'DELETING', 'DELETED'];
DEFINE FIELD status_description ON TABLE organization TYPE string \
    DEFAULT '';
DEFINE FIELD workflow_id ON TABLE organization TYPE string DEFAULT '';
DEFINE FIELD created_at ON TABLE organization TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE organization TYPE datetime \
    DEFAULT time::now();

-- =======================================================================
-- Roles (global catalog)
-- =======================================================================
DEFINE TABLE role SCHEMAFULL;
DEFINE FIELD name ON TABLE role TYPE string;
DEFINE FIELD description ON TABLE role TYPE string DEFAULT '';
DEFINE FIELD creator ON TABLE role TYPE option<string>;
DEFINE FIELD created_at ON TABLE role TYPE datetime DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE role TYPE datetime DEFAULT time::now();
DEFINE INDEX idx_role_name ON TABLE role COLUMNS name UNIQUE;

-- =======================================================================
-- Users (organization scope), keyed by the identity provider's user id
-- =======================================================================
DEFINE TABLE user SCHEMAFULL;
DEFINE FIELD account_id ON TABLE user TYPE string;
DEFINE FIELD name ON TABLE user TYPE string;
DEFINE FIELD password_hash ON TABLE user TYPE string;
DEFINE FIELD email ON TABLE user TYPE string DEFAULT '';
DEFINE FIELD department ON TABLE user TYPE string DEFAULT '';
DEFINE FIELD description ON TABLE user TYPE string DEFAULT '';
DEFINE FIELD organization_id ON TABLE user TYPE string;
DEFINE FIELD role_id ON TABLE user TYPE string;
DEFINE FIELD creator ON TABLE user TYPE option<string>;
DEFINE FIELD created_at ON TABLE user TYPE datetime DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE user TYPE datetime DEFAULT time::now();
DEFINE INDEX idx_user_org_account ON TABLE user \
    COLUMNS organization_id, account_id UNIQUE;
DEFINE INDEX idx_user_organization ON TABLE user COLUMNS organization_id;
";

// -----------------------------------------------------------------------
// Schema v2: built-in roles
// -----------------------------------------------------------------------

const SEED_ROLES_V2: &str = "\
CREATE role:`9b1f7c52-3a0e-4a5d-8c11-0d6b2f1a0001` SET \
    name = 'admin', description = 'Organization administrator';
CREATE role:`9b1f7c52-3a0e-4a5d-8c11-0d6b2f1a0002` SET \
    name = 'user', description = 'Organization member';
";

/// Apply every pending migration.
///
/// Creates the `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the recorded maximum.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    let mut result = db
        .query("SELECT version FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version <= current_version {
            continue;
        }
        info!(
            version = migration.version,
            name = migration.name,
            "Applying migration"
        );
        db.query(migration.sql).await?.check().map_err(|e| {
            DbError::Migration(format!(
                "Migration v{} '{}' failed: {}",
                migration.version, migration.name, e,
            ))
        })?;

        db.query("CREATE _migration SET version = $version, name = $name")
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

        info!(version = migration.version, "Migration applied");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_ordered() {
        for window in MIGRATIONS.windows(2) {
            assert!(
                window[0].version < window[1].version,
                "Migrations must be in ascending version order"
            );
        }
    }

    #[test]
    fn seeded_role_ids_are_uuids_used_by_the_seed() {
        for id in [ADMIN_ROLE_ID, USER_ROLE_ID] {
            assert!(uuid::Uuid::parse_str(id).is_ok());
            assert!(SEED_ROLES_V2.contains(id));
        }
    }
}
