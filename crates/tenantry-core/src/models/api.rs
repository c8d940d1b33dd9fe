//! Request and response shapes exchanged with the request-handling layer,
//! and the conversions between them and the domain models.
//!
//! Each pair has exactly one conversion function. Responses never carry
//! password material.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::organization::{NewOrganization, Organization, UpdateOrganization};
use super::role::RoleRef;
use super::user::{NewUser, User, UserProfile};

// ---------------------------------------------------------------------------
// Organization
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrganizationRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub phone: String,
}

impl CreateOrganizationRequest {
    pub fn into_new_organization(self, creator: Option<Uuid>) -> NewOrganization {
        NewOrganization {
            name: self.name,
            description: self.description,
            phone: self.phone,
            creator,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrganizationResponse {
    pub id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrganizationRequest {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub phone: String,
}

impl From<UpdateOrganizationRequest> for UpdateOrganization {
    /// Empty strings mean "leave unchanged".
    fn from(req: UpdateOrganizationRequest) -> Self {
        Self {
            description: non_empty(req.description),
            phone: non_empty(req.phone),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub phone: String,
    pub status: String,
    pub status_description: String,
    pub workflow_id: String,
    pub creator: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Organization> for OrganizationResponse {
    fn from(org: Organization) -> Self {
        Self {
            id: org.id,
            name: org.name,
            description: org.description,
            phone: org.phone,
            status: org.status.to_string(),
            status_description: org.status_description,
            workflow_id: org.workflow_id,
            creator: org.creator.map(|c| c.to_string()).unwrap_or_default(),
            created_at: org.created_at,
            updated_at: org.updated_at,
        }
    }
}

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub account_id: String,
    pub password: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub department: String,
    pub role: String,
    #[serde(default)]
    pub description: String,
}

impl CreateUserRequest {
    pub fn into_new_user(self, organization_id: &str, creator: Option<Uuid>) -> NewUser {
        NewUser {
            account_id: self.account_id,
            password: self.password,
            name: self.name,
            role_name: self.role,
            organization_id: organization_id.to_string(),
            email: self.email,
            department: self.department,
            description: self.description,
            creator,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub department: String,
    pub role: String,
    #[serde(default)]
    pub description: String,
}

impl From<UpdateUserRequest> for UserProfile {
    fn from(req: UpdateUserRequest) -> Self {
        Self {
            name: req.name,
            role_name: req.role,
            email: req.email,
            department: req.department,
            description: req.description,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleResponse {
    pub id: String,
    pub name: String,
}

impl From<RoleRef> for RoleResponse {
    fn from(role: RoleRef) -> Self {
        Self {
            id: role.id.map(|id| id.to_string()).unwrap_or_default(),
            name: role.name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub account_id: String,
    pub name: String,
    pub role: RoleResponse,
    pub organization_id: String,
    pub email: String,
    pub department: String,
    pub description: String,
    pub creator: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            account_id: user.account_id,
            name: user.name,
            role: user.role.into(),
            organization_id: user.organization_id,
            email: user.email,
            department: user.department,
            description: user.description,
            creator: user.creator.map(|c| c.to_string()).unwrap_or_default(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckExistedIdResponse {
    pub existed: bool,
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}
