//! Organization orchestrator.
//!
//! An organization spans a realm in the identity provider, a row in the
//! record store and a provisioning job in the workflow engine. None of
//! these share a transaction, so every write runs as a [`Saga`].

use tenantry_core::actor::require_token;
use tenantry_core::error::{ResultExt, TenantryResult};
use tenantry_core::gateway::{IdentityProvider, WorkflowSubmitter};
use tenantry_core::models::identity::RealmDefaults;
use tenantry_core::models::organization::{
    CreateOrganization, NewOrganization, Organization, UpdateOrganization,
};
use tenantry_core::models::workflow::SubmitOptions;
use tenantry_core::repository::OrganizationRepository;
use tenantry_core::saga::{Compensation, Saga, SagaError};

use crate::config::ServiceConfig;

/// Template parameter carrying the organization id.
const CONTRACT_ID_PARAM: &str = "contract_id";

pub struct OrganizationService<O, I, W>
where
    O: OrganizationRepository,
    I: IdentityProvider,
    W: WorkflowSubmitter,
{
    organizations: O,
    identity: I,
    workflows: W,
    config: ServiceConfig,
}

impl<O, I, W> OrganizationService<O, I, W>
where
    O: OrganizationRepository,
    I: IdentityProvider,
    W: WorkflowSubmitter,
{
    pub fn new(organizations: O, identity: I, workflows: W, config: ServiceConfig) -> Self {
        Self {
            organizations,
            identity,
            workflows,
            config,
        }
    }

    /// Create the realm, persist the row under the realm id, submit the
    /// provisioning workflow and record its id. Returns the organization id.
    pub async fn create(
        &self,
        input: NewOrganization,
        token: Option<&str>,
    ) -> Result<String, SagaError> {
        let mut saga = Saga::new("create organization", input.name.clone());
        let token = saga.check("validate actor token", require_token(token))?;

        let defaults = RealmDefaults {
            display_name: Some(input.name.clone()),
            ..Default::default()
        };
        let realm_id = saga
            .apply(
                "create realm",
                self.identity.create_realm(&input.name, &defaults, token),
                |id| Compensation::Manual(format!("delete realm {id}")),
            )
            .await?;

        let organization = saga
            .apply(
                "persist organization",
                self.organizations
                    .create(CreateOrganization::from_new(realm_id, input)),
                |org| Compensation::Manual(format!("delete organization row {}", org.id)),
            )
            .await?;

        let next_status = saga.check(
            "check status transition",
            organization.status.on_workflow_submitted(),
        )?;

        let options = SubmitOptions::default().with_parameter(CONTRACT_ID_PARAM, &organization.id);
        let workflow_id = saga
            .apply(
                "submit provisioning workflow",
                self.workflows.submit(&self.config.workflow_template, options),
                |wf| Compensation::Manual(format!("stop workflow {wf}")),
            )
            .await?;

        saga.apply(
            "record workflow",
            self.organizations
                .init_workflow(&organization.id, &workflow_id, next_status),
            |_| Compensation::NotRequired,
        )
        .await?;

        saga.finish();
        Ok(organization.id)
    }

    pub async fn get(&self, id: &str) -> TenantryResult<Organization> {
        self.organizations
            .get(id)
            .await
            .context(format!("get organization {id}"))
    }

    pub async fn list(&self) -> TenantryResult<Vec<Organization>> {
        self.organizations.fetch().await.context("list organizations")
    }

    /// Delete the realm, then the row. A missing row stops before any
    /// side effect.
    pub async fn delete(&self, id: &str, token: Option<&str>) -> Result<(), SagaError> {
        let mut saga = Saga::new("delete organization", id);
        let token = saga.check("validate actor token", require_token(token))?;

        saga.read("load organization", self.organizations.get(id))
            .await?;

        saga.apply(
            "delete realm",
            self.identity.delete_realm(id, token),
            |_| Compensation::Manual(format!("recreate realm {id}")),
        )
        .await?;

        saga.apply(
            "delete organization row",
            self.organizations.delete(id),
            |_| Compensation::NotRequired,
        )
        .await?;

        saga.finish();
        Ok(())
    }

    /// Update description and phone of an existing organization.
    pub async fn update(
        &self,
        id: &str,
        input: UpdateOrganization,
    ) -> Result<Organization, SagaError> {
        let mut saga = Saga::new("update organization", id);

        let existing = saga
            .read("load organization", self.organizations.get(id))
            .await?;

        let updated = saga
            .apply(
                "update organization",
                self.organizations.update(id, input),
                |_| {
                    Compensation::Manual(format!(
                        "restore description {:?} and phone {:?}",
                        existing.description, existing.phone
                    ))
                },
            )
            .await?;

        saga.finish();
        Ok(updated)
    }
}
