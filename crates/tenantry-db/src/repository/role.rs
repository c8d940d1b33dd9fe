//! Role catalog reads. The catalog is seeded by migration and never
//! mutated here.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tenantry_core::models::role::{Role, RoleRef};
use uuid::Uuid;

use super::{parse_optional_uuid, parse_uuid};
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct RoleRowWithId {
    record_id: String,
    name: String,
    description: String,
    creator: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl RoleRowWithId {
    fn try_into_role(self) -> Result<Role, DbError> {
        Ok(Role {
            id: parse_uuid(&self.record_id)?,
            name: self.name,
            description: self.description,
            creator: parse_optional_uuid(self.creator.as_deref())?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

pub(crate) async fn fetch_roles<C: Connection>(db: &Surreal<C>) -> Result<Vec<Role>, DbError> {
    let mut result = db
        .query("SELECT meta::id(id) AS record_id, * FROM role ORDER BY name ASC")
        .await?;

    let rows: Vec<RoleRowWithId> = result.take(0)?;
    rows.into_iter().map(|row| row.try_into_role()).collect()
}

/// Role names keyed by id, for attaching [`RoleRef`]s to user rows.
pub(crate) struct RoleNames(HashMap<Uuid, String>);

impl RoleNames {
    pub(crate) async fn load<C: Connection>(db: &Surreal<C>) -> Result<Self, DbError> {
        let roles = fetch_roles(db).await?;
        Ok(Self(roles.into_iter().map(|r| (r.id, r.name)).collect()))
    }

    /// A role id absent from the catalog resolves to an empty name.
    pub(crate) fn resolve(&self, id: Uuid) -> RoleRef {
        RoleRef {
            id: Some(id),
            name: self.0.get(&id).cloned().unwrap_or_default(),
        }
    }
}
