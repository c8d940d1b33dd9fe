//! Role domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub creator: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Reference from a user to a role in the catalog.
///
/// `id` is `None` when the name has not been resolved against the
/// catalog yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRef {
    pub id: Option<Uuid>,
    pub name: String,
}

impl RoleRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }
}

/// Find a role by exact, case-sensitive name.
pub fn find_by_name<'a>(catalog: &'a [Role], name: &str) -> Option<&'a Role> {
    catalog.iter().find(|role| role.name == name)
}
