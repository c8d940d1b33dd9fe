//! Collaborator traits for the identity provider and the workflow engine.
//!
//! Implementations must report an absent realm or user as
//! [`TenantryError::NotFound`](crate::error::TenantryError::NotFound) and a
//! duplicate as [`TenantryError::Conflict`](crate::error::TenantryError::Conflict);
//! everything else is an internal failure.

use crate::error::TenantryResult;
use crate::models::identity::{IdentityUser, RealmDefaults};
use crate::models::workflow::SubmitOptions;

pub trait IdentityProvider: Send + Sync {
    /// Create a realm for an organization and return its identifier.
    fn create_realm(
        &self,
        name: &str,
        defaults: &RealmDefaults,
        token: &str,
    ) -> impl Future<Output = TenantryResult<String>> + Send;
    fn delete_realm(&self, realm: &str, token: &str)
    -> impl Future<Output = TenantryResult<()>> + Send;
    /// Obtain a token for the provider's own administrative principal.
    fn login_admin(&self) -> impl Future<Output = TenantryResult<String>> + Send;
    fn create_user(
        &self,
        realm: &str,
        user: &IdentityUser,
        token: &str,
    ) -> impl Future<Output = TenantryResult<()>> + Send;
    fn get_user(
        &self,
        realm: &str,
        account_id: &str,
        token: &str,
    ) -> impl Future<Output = TenantryResult<IdentityUser>> + Send;
    /// `user.id` selects the account to update.
    fn update_user(
        &self,
        realm: &str,
        user: &IdentityUser,
        token: &str,
    ) -> impl Future<Output = TenantryResult<()>> + Send;
    fn delete_user(
        &self,
        realm: &str,
        account_id: &str,
        token: &str,
    ) -> impl Future<Output = TenantryResult<()>> + Send;
}

pub trait WorkflowSubmitter: Send + Sync {
    /// Submit a job from a named template and return the job handle.
    fn submit(
        &self,
        template: &str,
        options: SubmitOptions,
    ) -> impl Future<Output = TenantryResult<String>> + Send;
}
