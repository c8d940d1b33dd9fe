//! Shared fixtures: in-memory SurrealDB repositories and recording fakes
//! of the identity provider and workflow submitter.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use tenantry_core::error::{TenantryError, TenantryResult};
use tenantry_core::gateway::{IdentityProvider, WorkflowSubmitter};
use tenantry_core::models::identity::{IdentityUser, RealmDefaults};
use tenantry_core::models::workflow::SubmitOptions;
use uuid::Uuid;

pub const TOKEN: &str = "actor-token";
pub const ADMIN_TOKEN: &str = "provider-admin-token";
/// Suffix the fake appends to realm names.
pub const REALM_SUFFIX: &str = "7f3";

pub async fn memory_db() -> Surreal<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    tenantry_db::run_migrations(&db).await.unwrap();
    db
}

#[derive(Default)]
struct IdentityState {
    realms: HashSet<String>,
    /// (realm, username) -> representation with id assigned.
    users: HashMap<(String, String), IdentityUser>,
    calls: Vec<String>,
    tokens: Vec<String>,
    failing: HashSet<&'static str>,
}

/// Identity provider double. Clones share state.
#[derive(Clone, Default)]
pub struct FakeIdentityProvider {
    state: Arc<Mutex<IdentityState>>,
}

impl FakeIdentityProvider {
    /// Make every call to `operation` fail with an internal error.
    pub fn fail_on(&self, operation: &'static str) {
        self.state.lock().unwrap().failing.insert(operation);
    }

    /// Mutating calls in order, e.g. `create_realm acme-7f3`.
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn mutations(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| !c.starts_with("get_user") && !c.starts_with("login_admin"))
            .collect()
    }

    pub fn tokens(&self) -> Vec<String> {
        self.state.lock().unwrap().tokens.clone()
    }

    pub fn has_realm(&self, realm: &str) -> bool {
        self.state.lock().unwrap().realms.contains(realm)
    }

    pub fn user(&self, realm: &str, username: &str) -> Option<IdentityUser> {
        self.state
            .lock()
            .unwrap()
            .users
            .get(&(realm.to_string(), username.to_string()))
            .cloned()
    }

    /// Seed an identity directly, bypassing the call log.
    pub fn seed_user(&self, realm: &str, username: &str) -> Uuid {
        let id = Uuid::new_v4();
        let user = IdentityUser {
            id: Some(id.to_string()),
            username: Some(username.to_string()),
            ..Default::default()
        };
        self.state
            .lock()
            .unwrap()
            .users
            .insert((realm.to_string(), username.to_string()), user);
        id
    }

    fn enter(&self, operation: &'static str, detail: &str, token: Option<&str>) -> TenantryResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("{operation} {detail}"));
        if let Some(t) = token {
            state.tokens.push(t.to_string());
        }
        if state.failing.contains(operation) {
            return Err(TenantryError::IdentityProvider(format!(
                "{operation} unavailable"
            )));
        }
        Ok(())
    }
}

impl IdentityProvider for FakeIdentityProvider {
    async fn create_realm(
        &self,
        name: &str,
        _defaults: &RealmDefaults,
        token: &str,
    ) -> TenantryResult<String> {
        self.enter("create_realm", name, Some(token))?;
        let id = format!("{name}-{REALM_SUFFIX}");
        let mut state = self.state.lock().unwrap();
        if !state.realms.insert(id.clone()) {
            return Err(TenantryError::conflict("realm", id));
        }
        Ok(id)
    }

    async fn delete_realm(&self, realm: &str, token: &str) -> TenantryResult<()> {
        self.enter("delete_realm", realm, Some(token))?;
        let mut state = self.state.lock().unwrap();
        if !state.realms.remove(realm) {
            return Err(TenantryError::not_found("realm", realm));
        }
        Ok(())
    }

    async fn login_admin(&self) -> TenantryResult<String> {
        self.enter("login_admin", "", None)?;
        Ok(ADMIN_TOKEN.to_string())
    }

    async fn create_user(
        &self,
        realm: &str,
        user: &IdentityUser,
        token: &str,
    ) -> TenantryResult<()> {
        let username = user.username.clone().unwrap_or_default();
        self.enter("create_user", &format!("{realm} {username}"), Some(token))?;
        let mut state = self.state.lock().unwrap();
        let key = (realm.to_string(), username);
        if state.users.contains_key(&key) {
            // Opaque failure: the caller has to probe to learn it is a duplicate.
            return Err(TenantryError::IdentityProvider("HTTP 409".into()));
        }
        let mut stored = user.clone();
        stored.id = Some(Uuid::new_v4().to_string());
        state.users.insert(key, stored);
        Ok(())
    }

    async fn get_user(
        &self,
        realm: &str,
        account_id: &str,
        token: &str,
    ) -> TenantryResult<IdentityUser> {
        self.enter("get_user", &format!("{realm} {account_id}"), Some(token))?;
        self.user(realm, account_id)
            .ok_or_else(|| TenantryError::not_found("user", account_id))
    }

    async fn update_user(
        &self,
        realm: &str,
        user: &IdentityUser,
        token: &str,
    ) -> TenantryResult<()> {
        let id = user.id.clone().unwrap_or_default();
        self.enter("update_user", &format!("{realm} {id}"), Some(token))?;
        let mut state = self.state.lock().unwrap();
        let stored = state
            .users
            .iter_mut()
            .find(|((r, _), u)| r == realm && u.id.as_deref() == Some(id.as_str()))
            .map(|(_, u)| u)
            .ok_or_else(|| TenantryError::not_found("user", id.clone()))?;
        if user.credentials.is_some() {
            stored.credentials = user.credentials.clone();
        }
        if user.groups.is_some() {
            stored.groups = user.groups.clone();
        }
        Ok(())
    }

    async fn delete_user(&self, realm: &str, account_id: &str, token: &str) -> TenantryResult<()> {
        self.enter("delete_user", &format!("{realm} {account_id}"), Some(token))?;
        let mut state = self.state.lock().unwrap();
        state
            .users
            .remove(&(realm.to_string(), account_id.to_string()))
            .map(|_| ())
            .ok_or_else(|| TenantryError::not_found("user", account_id))
    }
}

#[derive(Default)]
struct WorkflowState {
    submissions: Vec<(String, SubmitOptions)>,
    failing: bool,
}

/// Workflow submitter double. Clones share state.
#[derive(Clone, Default)]
pub struct FakeWorkflowSubmitter {
    state: Arc<Mutex<WorkflowState>>,
}

impl FakeWorkflowSubmitter {
    pub fn fail(&self) {
        self.state.lock().unwrap().failing = true;
    }

    pub fn submissions(&self) -> Vec<(String, SubmitOptions)> {
        self.state.lock().unwrap().submissions.clone()
    }
}

impl WorkflowSubmitter for FakeWorkflowSubmitter {
    async fn submit(&self, template: &str, options: SubmitOptions) -> TenantryResult<String> {
        let mut state = self.state.lock().unwrap();
        state.submissions.push((template.to_string(), options));
        if state.failing {
            return Err(TenantryError::Workflow("connection refused".into()));
        }
        Ok(format!("{template}-{}", state.submissions.len()))
    }
}
