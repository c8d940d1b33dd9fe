//! SurrealDB implementation of [`OrganizationRepository`].

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tenantry_core::error::TenantryResult;
use tenantry_core::models::organization::{
    CreateOrganization, Organization, OrganizationStatus, UpdateOrganization,
};
use tenantry_core::repository::OrganizationRepository;

use super::parse_optional_uuid;
use crate::error::DbError;

/// DB-side row struct for queries where the id is already known.
#[derive(Debug, SurrealValue)]
struct OrganizationRow {
    name: String,
    description: String,
    phone: String,
    creator: Option<String>,
    status: String,
    status_description: String,
    workflow_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct OrganizationRowWithId {
    record_id: String,
    name: String,
    description: String,
    phone: String,
    creator: Option<String>,
    status: String,
    status_description: String,
    workflow_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrganizationRow {
    fn into_organization(self, id: String) -> Result<Organization, DbError> {
        Ok(Organization {
            id,
            name: self.name,
            description: self.description,
            phone: self.phone,
            creator: parse_optional_uuid(self.creator.as_deref())?,
            status: parse_status(&self.status)?,
            status_description: self.status_description,
            workflow_id: self.workflow_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl OrganizationRowWithId {
    fn try_into_organization(self) -> Result<Organization, DbError> {
        OrganizationRow {
            name: self.name,
            description: self.description,
            phone: self.phone,
            creator: self.creator,
            status: self.status,
            status_description: self.status_description,
            workflow_id: self.workflow_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
        .into_organization(self.record_id)
    }
}

fn parse_status(s: &str) -> Result<OrganizationStatus, DbError> {
    s.parse()
        .map_err(|_| DbError::Corrupt(format!("unknown organization status: {s}")))
}

fn not_found(id: &str) -> DbError {
    DbError::NotFound {
        entity: "organization".into(),
        id: id.to_string(),
    }
}

#[derive(Clone)]
pub struct SurrealOrganizationRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealOrganizationRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> OrganizationRepository for SurrealOrganizationRepository<C> {
    async fn create(&self, input: CreateOrganization) -> TenantryResult<Organization> {
        let id = input.id;

        let result = self
            .db
            .query(
                "CREATE type::record('organization', $id) SET \
                 name = $name, description = $description, \
                 phone = $phone, creator = $creator",
            )
            .bind(("id", id.clone()))
            .bind(("name", input.name))
            .bind(("description", input.description))
            .bind(("phone", input.phone))
            .bind(("creator", input.creator.map(|c| c.to_string())))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<OrganizationRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| not_found(&id))?;

        Ok(row.into_organization(id)?)
    }

    async fn fetch(&self) -> TenantryResult<Vec<Organization>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM organization \
                 ORDER BY created_at ASC",
            )
            .await
            .map_err(DbError::from)?;

        let rows: Vec<OrganizationRowWithId> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(|row| row.try_into_organization())
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(items)
    }

    async fn get(&self, id: &str) -> TenantryResult<Organization> {
        let mut result = self
            .db
            .query("SELECT * FROM type::record('organization', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<OrganizationRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| not_found(id))?;

        Ok(row.into_organization(id.to_string())?)
    }

    async fn update(&self, id: &str, input: UpdateOrganization) -> TenantryResult<Organization> {
        let mut sets = Vec::new();
        if input.description.is_some() {
            sets.push("description = $description");
        }
        if input.phone.is_some() {
            sets.push("phone = $phone");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('organization', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self.db.query(&query).bind(("id", id.to_string()));
        if let Some(description) = input.description {
            builder = builder.bind(("description", description));
        }
        if let Some(phone) = input.phone {
            builder = builder.bind(("phone", phone));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<OrganizationRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| not_found(id))?;

        Ok(row.into_organization(id.to_string())?)
    }

    async fn delete(&self, id: &str) -> TenantryResult<()> {
        let mut result = self
            .db
            .query("DELETE type::record('organization', $id) RETURN BEFORE")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<OrganizationRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(not_found(id).into());
        }

        Ok(())
    }

    async fn init_workflow(
        &self,
        id: &str,
        workflow_id: &str,
        status: OrganizationStatus,
    ) -> TenantryResult<()> {
        let result = self
            .db
            .query(
                "UPDATE type::record('organization', $id) SET \
                 status = $status, workflow_id = $workflow_id, \
                 updated_at = time::now()",
            )
            .bind(("id", id.to_string()))
            .bind(("status", status.as_str()))
            .bind(("workflow_id", workflow_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<OrganizationRow> = result.take(0).map_err(DbError::from)?;
        if rows.len() != 1 {
            return Err(not_found(id).into());
        }

        Ok(())
    }
}
