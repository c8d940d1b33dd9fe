//! SurrealDB implementation of [`UserRepository`].
//!
//! Rows are keyed by the identity provider's user id. The role is stored
//! as an id and joined with the catalog on read.

use chrono::{DateTime, Utc};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tenantry_core::error::TenantryResult;
use tenantry_core::models::role::Role;
use tenantry_core::models::user::{CreateUserRecord, UpdateUserRecord, User};
use tenantry_core::repository::{UserFilter, UserRepository};
use tracing::debug;
use uuid::Uuid;

use super::role::{RoleNames, fetch_roles};
use super::{parse_optional_uuid, parse_uuid};
use crate::error::DbError;

/// DB-side row struct for queries where the UUID is already known.
#[derive(Debug, SurrealValue)]
struct UserRow {
    account_id: String,
    name: String,
    password_hash: String,
    email: String,
    department: String,
    description: String,
    organization_id: String,
    role_id: String,
    creator: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// DB-side row struct that includes the record ID via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct UserRowWithId {
    record_id: String,
    account_id: String,
    name: String,
    password_hash: String,
    email: String,
    department: String,
    description: String,
    organization_id: String,
    role_id: String,
    creator: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self, id: Uuid, roles: &RoleNames) -> Result<User, DbError> {
        Ok(User {
            id,
            account_id: self.account_id,
            name: self.name,
            password_hash: self.password_hash,
            role: roles.resolve(parse_uuid(&self.role_id)?),
            organization_id: self.organization_id,
            email: self.email,
            department: self.department,
            description: self.description,
            creator: parse_optional_uuid(self.creator.as_deref())?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl UserRowWithId {
    fn try_into_user(self, roles: &RoleNames) -> Result<User, DbError> {
        let id = parse_uuid(&self.record_id)?;
        UserRow {
            account_id: self.account_id,
            name: self.name,
            password_hash: self.password_hash,
            email: self.email,
            department: self.department,
            description: self.description,
            organization_id: self.organization_id,
            role_id: self.role_id,
            creator: self.creator,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
        .into_user(id, roles)
    }
}

#[derive(Clone)]
pub struct SurrealUserRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealUserRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> UserRepository for SurrealUserRepository<C> {
    async fn create_with_uuid(&self, input: CreateUserRecord) -> TenantryResult<User> {
        let id = input.id;
        let id_str = id.to_string();

        let result = self
            .db
            .query(
                "CREATE type::record('user', $id) SET \
                 account_id = $account_id, name = $name, \
                 password_hash = $password_hash, email = $email, \
                 department = $department, description = $description, \
                 organization_id = $organization_id, role_id = $role_id, \
                 creator = $creator",
            )
            .bind(("id", id_str.clone()))
            .bind(("account_id", input.account_id))
            .bind(("name", input.name))
            .bind(("password_hash", input.password_hash))
            .bind(("email", input.email))
            .bind(("department", input.department))
            .bind(("description", input.description))
            .bind(("organization_id", input.organization_id))
            .bind(("role_id", input.role_id.to_string()))
            .bind(("creator", input.creator.map(|c| c.to_string())))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: id_str,
        })?;

        let roles = RoleNames::load(&self.db).await?;
        Ok(row.into_user(id, &roles)?)
    }

    async fn update_with_uuid(&self, id: Uuid, input: UpdateUserRecord) -> TenantryResult<User> {
        let id_str = id.to_string();

        let mut sets = vec![
            "account_id = $account_id",
            "name = $name",
            "password_hash = $password_hash",
            "email = $email",
            "department = $department",
            "description = $description",
        ];
        if input.role_id.is_some() {
            sets.push("role_id = $role_id");
        }
        sets.push("updated_at = time::now()");

        let query = format!(
            "UPDATE type::record('user', $id) SET {}",
            sets.join(", ")
        );

        let mut builder = self
            .db
            .query(&query)
            .bind(("id", id_str.clone()))
            .bind(("account_id", input.account_id))
            .bind(("name", input.name))
            .bind(("password_hash", input.password_hash))
            .bind(("email", input.email))
            .bind(("department", input.department))
            .bind(("description", input.description));
        if let Some(role_id) = input.role_id {
            builder = builder.bind(("role_id", role_id.to_string()));
        }

        let result = builder.await.map_err(DbError::from)?;
        let mut result = result
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "user".into(),
            id: id_str,
        })?;

        let roles = RoleNames::load(&self.db).await?;
        Ok(row.into_user(id, &roles)?)
    }

    async fn delete_with_uuid(&self, id: Uuid) -> TenantryResult<()> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("DELETE type::record('user', $id) RETURN BEFORE")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        if rows.is_empty() {
            return Err(DbError::NotFound {
                entity: "user".into(),
                id: id_str,
            }
            .into());
        }

        Ok(())
    }

    async fn get(&self, account_id: &str, organization_id: &str) -> TenantryResult<User> {
        let mut users = self
            .list(&[
                UserFilter::organization(organization_id),
                UserFilter::account_id(account_id),
            ])
            .await?;

        match users.len() {
            0 => Err(DbError::NotFound {
                entity: "user".into(),
                id: format!("{account_id}@{organization_id}"),
            }
            .into()),
            1 => Ok(users.remove(0)),
            n => Err(DbError::Corrupt(format!(
                "{n} users share account id {account_id} in {organization_id}"
            ))
            .into()),
        }
    }

    async fn list(&self, filters: &[UserFilter]) -> TenantryResult<Vec<User>> {
        let mut conditions = Vec::with_capacity(filters.len());
        let mut values = Vec::with_capacity(filters.len());
        for (i, filter) in filters.iter().enumerate() {
            let (column, value) = match filter {
                UserFilter::Organization(v) => ("organization_id", v),
                UserFilter::AccountId(v) => ("account_id", v),
            };
            conditions.push(format!("{column} = $filters[{i}]"));
            values.push(value.clone());
        }

        let mut query = String::from("SELECT meta::id(id) AS record_id, * FROM user");
        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }
        query.push_str(" ORDER BY created_at ASC");

        let mut result = self
            .db
            .query(&query)
            .bind(("filters", values))
            .await
            .map_err(DbError::from)?;
        let rows: Vec<UserRowWithId> = result.take(0).map_err(DbError::from)?;

        let roles = RoleNames::load(&self.db).await?;
        let items = rows
            .into_iter()
            .map(|row| row.try_into_user(&roles))
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(items)
    }

    async fn fetch_roles(&self) -> TenantryResult<Vec<Role>> {
        Ok(fetch_roles(&self.db).await?)
    }

    async fn flush(&self, organization_id: &str) -> TenantryResult<u64> {
        let mut result = self
            .db
            .query("DELETE user WHERE organization_id = $organization_id RETURN BEFORE")
            .bind(("organization_id", organization_id.to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<UserRow> = result.take(0).map_err(DbError::from)?;
        debug!(organization_id, removed = rows.len(), "Flushed organization users");

        Ok(rows.len() as u64)
    }
}
