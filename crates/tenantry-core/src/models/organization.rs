//! Organization domain model.
//!
//! An organization is a tenant. Its identifier is issued by the identity
//! provider when the organization's realm is created and is reused as
//! the primary key of the system-of-record row.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{TenantryError, TenantryResult};

/// Provisioning status of an organization.
///
/// This crate only ever performs `Unset -> Pending`. The remaining
/// states are written by the workflow-completion collaborator and are
/// stored and read back verbatim.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrganizationStatus {
    #[default]
    Unset,
    Pending,
    Creating,
    Created,
    Error,
    Deleting,
    Deleted,
}

impl OrganizationStatus {
    pub const ALL: [OrganizationStatus; 7] = [
        Self::Unset,
        Self::Pending,
        Self::Creating,
        Self::Created,
        Self::Error,
        Self::Deleting,
        Self::Deleted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unset => "UNSET",
            Self::Pending => "PENDING",
            Self::Creating => "CREATING",
            Self::Created => "CREATED",
            Self::Error => "ERROR",
            Self::Deleting => "DELETING",
            Self::Deleted => "DELETED",
        }
    }

    /// The transition applied once the provisioning workflow has been
    /// submitted. Only legal from [`OrganizationStatus::Unset`].
    pub fn on_workflow_submitted(self) -> TenantryResult<OrganizationStatus> {
        match self {
            Self::Unset => Ok(Self::Pending),
            other => Err(TenantryError::Internal(format!(
                "cannot start provisioning from status {other}"
            ))),
        }
    }
}

impl fmt::Display for OrganizationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrganizationStatus {
    type Err = TenantryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| TenantryError::Internal(format!("unknown organization status: {s}")))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    /// Realm identifier issued by the identity provider.
    pub id: String,
    pub name: String,
    pub description: String,
    pub phone: String,
    pub creator: Option<Uuid>,
    pub status: OrganizationStatus,
    pub status_description: String,
    /// Empty until the provisioning workflow has been submitted.
    pub workflow_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied fields for a new organization. The identifier is not
/// part of it: the identity provider assigns one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewOrganization {
    pub name: String,
    pub description: String,
    pub phone: String,
    pub creator: Option<Uuid>,
}

/// Store input for a new organization row, keyed by the realm id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrganization {
    pub id: String,
    pub name: String,
    pub description: String,
    pub phone: String,
    pub creator: Option<Uuid>,
}

impl CreateOrganization {
    pub fn from_new(id: impl Into<String>, input: NewOrganization) -> Self {
        Self {
            id: id.into(),
            name: input.name,
            description: input.description,
            phone: input.phone,
            creator: input.creator,
        }
    }
}

/// Mutable organization fields. Name and identifier never change.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateOrganization {
    pub description: Option<String>,
    pub phone: Option<String>,
}
