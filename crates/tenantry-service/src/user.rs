//! User orchestrator.
//!
//! A user is an identity in the organization's realm plus a row in the
//! record store keyed by the identity's UUID. Role membership is carried
//! to the identity provider as a `role@organization` group.

use tenantry_core::actor::{Actor, require_actor, require_token};
use tenantry_core::error::{ResultExt, TenantryError, TenantryResult};
use tenantry_core::gateway::IdentityProvider;
use tenantry_core::models::identity::{Credential, IdentityUser, role_group};
use tenantry_core::models::role::{Role, find_by_name};
use tenantry_core::models::user::{
    CreateUserRecord, NewUser, UpdateUserRecord, User, UserProfile,
};
use tenantry_core::repository::{UserFilter, UserRepository};
use tenantry_core::saga::{Compensation, Saga, SagaError};
use tracing::info;
use uuid::Uuid;

use crate::config::ServiceConfig;
use crate::password::hash_password;

/// Reduce a filtered listing to the single user it must contain.
fn exactly_one(
    mut users: Vec<User>,
    account_id: &str,
    organization_id: &str,
) -> TenantryResult<User> {
    match users.len() {
        0 => Err(TenantryError::not_found(
            "user",
            format!("{account_id}@{organization_id}"),
        )),
        1 => Ok(users.remove(0)),
        n => Err(TenantryError::Internal(format!(
            "{n} users match account id {account_id} in organization {organization_id}"
        ))),
    }
}

fn resolve_role(catalog: &[Role], name: &str) -> TenantryResult<Uuid> {
    find_by_name(catalog, name)
        .map(|r| r.id)
        .ok_or_else(|| TenantryError::BadRequest(format!("unknown role: {name}")))
}

fn identity_uuid(identity: &IdentityUser) -> TenantryResult<Uuid> {
    let id = identity
        .id
        .as_deref()
        .ok_or_else(|| TenantryError::IdentityProvider("identity has no id".into()))?;
    Uuid::parse_str(id)
        .map_err(|e| TenantryError::IdentityProvider(format!("identity id {id} is not a UUID: {e}")))
}

pub struct UserService<U, I>
where
    U: UserRepository,
    I: IdentityProvider,
{
    users: U,
    identity: I,
    config: ServiceConfig,
}

impl<U, I> UserService<U, I>
where
    U: UserRepository,
    I: IdentityProvider,
{
    pub fn new(users: U, identity: I, config: ServiceConfig) -> Self {
        Self {
            users,
            identity,
            config,
        }
    }

    /// Create the identity, then persist the row under the identity's
    /// UUID.
    pub async fn create(&self, input: NewUser, token: Option<&str>) -> Result<User, SagaError> {
        let mut saga = Saga::new("create user", input.account_id.clone());
        let token = saga.check("validate actor token", require_token(token))?;
        let user = self.create_in(&mut saga, input, token).await?;
        saga.finish();
        Ok(user)
    }

    /// Create the organization's administrator with the provider's own
    /// admin credentials.
    pub async fn create_admin(&self, organization_id: &str) -> Result<User, SagaError> {
        let mut saga = Saga::new("create admin", organization_id);
        let token = saga
            .read("login as provider admin", self.identity.login_admin())
            .await?;

        let input = NewUser {
            account_id: self.config.admin_account.clone(),
            password: self.config.admin_initial_password.clone(),
            name: self.config.admin_account.clone(),
            role_name: self.config.admin_role.clone(),
            organization_id: organization_id.to_string(),
            email: String::new(),
            department: String::new(),
            description: String::new(),
            creator: None,
        };
        let user = self.create_in(&mut saga, input, &token).await?;
        saga.finish();
        Ok(user)
    }

    async fn create_in(
        &self,
        saga: &mut Saga,
        input: NewUser,
        token: &str,
    ) -> Result<User, SagaError> {
        let realm = input.organization_id.as_str();
        let account_id = input.account_id.as_str();
        let representation = IdentityUser::new_account(
            account_id,
            &input.password,
            role_group(&input.role_name, realm),
        );

        saga.apply(
            "create identity",
            async {
                match self.identity.create_user(realm, &representation, token).await {
                    Ok(()) => Ok(()),
                    Err(err) => match self.identity.get_user(realm, account_id, token).await {
                        Ok(_) => Err(TenantryError::conflict("user", account_id)),
                        Err(_) => Err(err),
                    },
                }
            },
            |_| Compensation::Manual(format!("delete identity {account_id} in realm {realm}")),
        )
        .await?;

        let identity = saga
            .read(
                "fetch identity",
                self.identity.get_user(realm, account_id, token),
            )
            .await?;
        let id = saga.check("read identity id", identity_uuid(&identity))?;

        let catalog = saga
            .read("fetch role catalog", self.users.fetch_roles())
            .await?;
        let role_id = saga.check("resolve role", resolve_role(&catalog, &input.role_name))?;

        let password_hash = saga.check(
            "hash password",
            hash_password(&input.password, self.config.pepper.as_deref()),
        )?;

        let record = CreateUserRecord {
            id,
            account_id: input.account_id.clone(),
            name: input.name.clone(),
            password_hash,
            email: input.email.clone(),
            department: input.department.clone(),
            description: input.description.clone(),
            organization_id: input.organization_id.clone(),
            role_id,
            creator: input.creator,
        };
        let user = saga
            .apply(
                "persist user",
                self.users.create_with_uuid(record),
                |u| Compensation::Manual(format!("delete user row {}", u.id)),
            )
            .await?;

        Ok(user)
    }

    /// Delete the organization's administrator: identity first, then row.
    pub async fn delete_admin(&self, organization_id: &str) -> Result<(), SagaError> {
        let account_id = self.config.admin_account.as_str();
        let mut saga = Saga::new("delete admin", organization_id);
        let token = saga
            .read("login as provider admin", self.identity.login_admin())
            .await?;

        let identity = saga
            .read(
                "fetch identity",
                self.identity.get_user(organization_id, account_id, &token),
            )
            .await?;
        let id = saga.check("read identity id", identity_uuid(&identity))?;

        saga.apply(
            "delete identity",
            self.identity.delete_user(organization_id, account_id, &token),
            |_| Compensation::Manual(format!("recreate identity {account_id} with id {id}")),
        )
        .await?;

        saga.apply(
            "delete user row",
            self.users.delete_with_uuid(id),
            |_| Compensation::NotRequired,
        )
        .await?;

        saga.finish();
        Ok(())
    }

    /// Remove every user row of an organization. Identities in the
    /// provider are left in place.
    pub async fn delete_all(&self, organization_id: &str) -> TenantryResult<u64> {
        let removed = self
            .users
            .flush(organization_id)
            .await
            .context(format!("flush users of {organization_id}"))?;
        info!(organization_id, removed, "Flushed organization users");
        Ok(removed)
    }

    pub async fn list(&self, organization_id: &str) -> TenantryResult<Vec<User>> {
        self.users
            .list(&[UserFilter::organization(organization_id)])
            .await
            .context(format!("list users of {organization_id}"))
    }

    /// The single user with `account_id` in the organization. More than one
    /// match is an internal failure.
    pub async fn get_by_account_id(
        &self,
        account_id: &str,
        organization_id: &str,
    ) -> TenantryResult<User> {
        let users = self
            .users
            .list(&[
                UserFilter::organization(organization_id),
                UserFilter::account_id(account_id),
            ])
            .await
            .context(format!("get user {account_id}"))?;
        exactly_one(users, account_id, organization_id)
    }

    pub async fn account_exists(
        &self,
        account_id: &str,
        organization_id: &str,
    ) -> TenantryResult<bool> {
        match self.get_by_account_id(account_id, organization_id).await {
            Ok(_) => Ok(true),
            Err(TenantryError::NotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Update profile fields within the actor's organization. A role change
    /// is pushed to the identity provider before the row is written.
    pub async fn update_by_account_id(
        &self,
        actor: Option<&Actor>,
        token: Option<&str>,
        account_id: &str,
        profile: UserProfile,
    ) -> Result<User, SagaError> {
        let mut saga = Saga::new("update user", account_id);
        let actor = saga.check("validate actor", require_actor(actor))?;
        let token = saga.check("validate actor token", require_token(token))?;
        let organization_id = actor.organization_id.as_str();

        let existing = saga
            .read(
                "load user",
                self.get_by_account_id(account_id, organization_id),
            )
            .await?;

        let mut role_id = None;
        if !profile.role_name.is_empty() && profile.role_name != existing.role.name {
            let catalog = saga
                .read("fetch role catalog", self.users.fetch_roles())
                .await?;
            let new_role = saga.check("resolve role", resolve_role(&catalog, &profile.role_name))?;

            let change = IdentityUser::group_change(
                &existing.id.to_string(),
                role_group(&profile.role_name, organization_id),
            );
            let previous_group = role_group(&existing.role.name, organization_id);
            saga.apply(
                "update identity group",
                self.identity.update_user(organization_id, &change, token),
                |_| {
                    Compensation::Manual(format!(
                        "restore group {previous_group} for {account_id}"
                    ))
                },
            )
            .await?;
            role_id = Some(new_role);
        }

        let changes = UpdateUserRecord::with_profile(&existing, &profile, role_id);
        let updated = saga
            .apply(
                "update user row",
                self.users.update_with_uuid(existing.id, changes),
                |_| Compensation::NotRequired,
            )
            .await?;

        saga.finish();
        Ok(updated)
    }

    /// Replace the identity's password, then the stored hash. Divergence
    /// between the two is reported, not repaired.
    pub async fn update_password_by_account_id(
        &self,
        token: Option<&str>,
        account_id: &str,
        new_password: &str,
        organization_id: &str,
    ) -> Result<(), SagaError> {
        let mut saga = Saga::new("update password", account_id);
        let token = saga.check("validate actor token", require_token(token))?;

        let mut identity = saga
            .read(
                "fetch identity",
                self.identity.get_user(organization_id, account_id, token),
            )
            .await?;
        identity.credentials = Some(vec![Credential::password(new_password)]);

        saga.apply(
            "replace identity password",
            self.identity.update_user(organization_id, &identity, token),
            |_| {
                Compensation::Manual(format!(
                    "reset identity password of {account_id} to match the stored hash"
                ))
            },
        )
        .await?;

        let existing = saga
            .read("load user", self.users.get(account_id, organization_id))
            .await?;
        let password_hash = saga.check(
            "hash password",
            hash_password(new_password, self.config.pepper.as_deref()),
        )?;

        saga.apply(
            "update password hash",
            self.users.update_with_uuid(
                existing.id,
                UpdateUserRecord::with_password_hash(&existing, password_hash),
            ),
            |_| Compensation::NotRequired,
        )
        .await?;

        saga.finish();
        Ok(())
    }

    /// Delete the row, then the identity.
    pub async fn delete_by_account_id(
        &self,
        token: Option<&str>,
        account_id: &str,
        organization_id: &str,
    ) -> Result<(), SagaError> {
        let mut saga = Saga::new("delete user", account_id);
        let token = saga.check("validate actor token", require_token(token))?;

        let existing = saga
            .read("load user", self.users.get(account_id, organization_id))
            .await?;

        saga.apply(
            "delete user row",
            self.users.delete_with_uuid(existing.id),
            |_| Compensation::Manual(format!("recreate user row {}", existing.id)),
        )
        .await?;

        saga.apply(
            "delete identity",
            self.identity.delete_user(organization_id, account_id, token),
            |_| Compensation::NotRequired,
        )
        .await?;

        saga.finish();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use tenantry_core::error::ErrorKind;
    use tenantry_core::models::role::RoleRef;

    use super::*;

    fn user(account_id: &str) -> User {
        User {
            id: Uuid::new_v4(),
            account_id: account_id.into(),
            name: account_id.into(),
            password_hash: String::new(),
            role: RoleRef::named("user"),
            organization_id: "acme-7f3".into(),
            email: String::new(),
            department: String::new(),
            description: String::new(),
            creator: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn exactly_one_classifies_counts() {
        let err = exactly_one(vec![], "jdoe", "acme-7f3").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let found = exactly_one(vec![user("jdoe")], "jdoe", "acme-7f3").unwrap();
        assert_eq!(found.account_id, "jdoe");

        let err = exactly_one(vec![user("jdoe"), user("jdoe")], "jdoe", "acme-7f3").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[test]
    fn unknown_role_is_bad_request() {
        let catalog = vec![Role {
            id: Uuid::new_v4(),
            name: "admin".into(),
            description: String::new(),
            creator: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }];
        assert_eq!(resolve_role(&catalog, "admin").unwrap(), catalog[0].id);
        assert_eq!(
            resolve_role(&catalog, "Admin").unwrap_err().kind(),
            ErrorKind::BadRequest
        );
    }

    #[test]
    fn identity_id_must_be_a_uuid() {
        let mut identity = IdentityUser::default();
        assert!(identity_uuid(&identity).is_err());
        identity.id = Some("not-a-uuid".into());
        assert!(identity_uuid(&identity).is_err());
        let id = Uuid::new_v4();
        identity.id = Some(id.to_string());
        assert_eq!(identity_uuid(&identity).unwrap(), id);
    }
}
