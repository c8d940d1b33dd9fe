//! Connection to the record store.
//!
//! [`DbManager::open`] is the single entry point used by the binary: it
//! signs in, selects the tenantry namespace and brings the schema up to
//! date before any repository touches it.

use surrealdb::Surreal;
use surrealdb::engine::remote::ws::{Client, Ws};
use surrealdb::opt::auth::Root;
use tracing::info;

use crate::error::DbError;
use crate::repository::{SurrealOrganizationRepository, SurrealUserRepository};
use crate::schema::run_migrations;

#[derive(Debug, Clone)]
pub struct DbConfig {
    /// `host:port`, optionally prefixed with `ws://`.
    pub url: String,
    pub namespace: String,
    pub database: String,
    pub username: String,
    pub password: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: "127.0.0.1:8000".into(),
            namespace: "tenantry".into(),
            database: "main".into(),
            username: "root".into(),
            password: "root".into(),
        }
    }
}

impl DbConfig {
    /// The address handed to the WebSocket engine, which takes no scheme.
    pub fn address(&self) -> &str {
        let url = self.url.trim_end_matches('/');
        url.strip_prefix("ws://").unwrap_or(url)
    }
}

/// A migrated connection shared by the organization and user stores.
#[derive(Clone)]
pub struct DbManager {
    db: Surreal<Client>,
}

impl DbManager {
    /// Sign in with root credentials and apply pending migrations.
    pub async fn open(config: &DbConfig) -> Result<Self, DbError> {
        let address = config.address();
        info!(
            address,
            namespace = %config.namespace,
            database = %config.database,
            "Opening record store"
        );

        let db = Surreal::new::<Ws>(address).await?;
        db.signin(Root {
            username: config.username.clone(),
            password: config.password.clone(),
        })
        .await?;
        db.use_ns(&config.namespace)
            .use_db(&config.database)
            .await?;
        run_migrations(&db).await?;

        info!(namespace = %config.namespace, "Record store ready");
        Ok(Self { db })
    }

    pub fn client(&self) -> &Surreal<Client> {
        &self.db
    }

    pub fn organizations(&self) -> SurrealOrganizationRepository<Client> {
        SurrealOrganizationRepository::new(self.db.clone())
    }

    pub fn users(&self) -> SurrealUserRepository<Client> {
        SurrealUserRepository::new(self.db.clone())
    }
}
