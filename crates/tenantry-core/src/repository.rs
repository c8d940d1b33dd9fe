//! Repository trait definitions for the system-of-record store.
//!
//! Organization rows are keyed by the identity provider's realm id and
//! user rows by the identity provider's user id; neither repository
//! generates identifiers.

use uuid::Uuid;

use crate::error::TenantryResult;
use crate::models::{
    organization::{CreateOrganization, Organization, OrganizationStatus, UpdateOrganization},
    role::Role,
    user::{CreateUserRecord, UpdateUserRecord, User},
};

// ---------------------------------------------------------------------------
// Organization
// ---------------------------------------------------------------------------

pub trait OrganizationRepository: Send + Sync {
    fn create(
        &self,
        input: CreateOrganization,
    ) -> impl Future<Output = TenantryResult<Organization>> + Send;
    /// Every organization row.
    fn fetch(&self) -> impl Future<Output = TenantryResult<Vec<Organization>>> + Send;
    fn get(&self, id: &str) -> impl Future<Output = TenantryResult<Organization>> + Send;
    fn update(
        &self,
        id: &str,
        input: UpdateOrganization,
    ) -> impl Future<Output = TenantryResult<Organization>> + Send;
    fn delete(&self, id: &str) -> impl Future<Output = TenantryResult<()>> + Send;
    /// Record the workflow id and the status it moves the row to in one
    /// update. Fails with NotFound when no row was affected.
    fn init_workflow(
        &self,
        id: &str,
        workflow_id: &str,
        status: OrganizationStatus,
    ) -> impl Future<Output = TenantryResult<()>> + Send;
}

// ---------------------------------------------------------------------------
// User (organization-scoped)
// ---------------------------------------------------------------------------

/// Composable predicate for [`UserRepository::list`]. Filters are
/// combined with AND.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserFilter {
    Organization(String),
    AccountId(String),
}

impl UserFilter {
    pub fn organization(organization_id: impl Into<String>) -> Self {
        Self::Organization(organization_id.into())
    }

    pub fn account_id(account_id: impl Into<String>) -> Self {
        Self::AccountId(account_id.into())
    }
}

pub trait UserRepository: Send + Sync {
    fn create_with_uuid(
        &self,
        input: CreateUserRecord,
    ) -> impl Future<Output = TenantryResult<User>> + Send;
    fn update_with_uuid(
        &self,
        id: Uuid,
        input: UpdateUserRecord,
    ) -> impl Future<Output = TenantryResult<User>> + Send;
    fn delete_with_uuid(&self, id: Uuid) -> impl Future<Output = TenantryResult<()>> + Send;
    /// Single user by account id within an organization.
    fn get(
        &self,
        account_id: &str,
        organization_id: &str,
    ) -> impl Future<Output = TenantryResult<User>> + Send;
    fn list(
        &self,
        filters: &[UserFilter],
    ) -> impl Future<Output = TenantryResult<Vec<User>>> + Send;
    /// The full role catalog.
    fn fetch_roles(&self) -> impl Future<Output = TenantryResult<Vec<Role>>> + Send;
    /// Remove every user row of an organization. Returns the number removed.
    fn flush(&self, organization_id: &str) -> impl Future<Output = TenantryResult<u64>> + Send;
}
