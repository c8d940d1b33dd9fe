//! Command line definition. Every flag can also be set through a
//! `TENANTRY_*` environment variable.

use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use tenantry_db::DbConfig;
use tenantry_gateway::{ArgoConfig, KeycloakConfig};
use tenantry_service::ServiceConfig;
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "tenantry", version)]
#[command(about = "Provision organizations and users across identity, workflow and record backends")]
pub struct Cli {
    #[command(flatten)]
    pub db: DbArgs,

    #[command(flatten)]
    pub keycloak: KeycloakArgs,

    #[command(flatten)]
    pub argo: ArgoArgs,

    #[command(flatten)]
    pub service: ServiceArgs,

    /// Filter used when RUST_LOG is unset.
    #[arg(long, env = "TENANTRY_LOG", default_value = "tenantry=info")]
    pub log: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Apply pending schema migrations.
    Migrate,
    /// Create an organization: realm, record and provisioning workflow.
    CreateOrganization {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        phone: String,
        /// Account UUID recorded as creator.
        #[arg(long)]
        creator: Option<Uuid>,
        #[arg(long, env = "TENANTRY_ACTOR_TOKEN", hide_env_values = true)]
        token: Option<String>,
    },
    /// Delete an organization's realm and record.
    DeleteOrganization {
        id: String,
        #[arg(long, env = "TENANTRY_ACTOR_TOKEN", hide_env_values = true)]
        token: Option<String>,
    },
    /// Create the administrator account of an organization.
    CreateAdmin { organization_id: String },
    /// Delete the administrator account of an organization.
    DeleteAdmin { organization_id: String },
    /// Print every organization as JSON.
    ListOrganizations,
    /// Print the users of an organization as JSON.
    ListUsers { organization_id: String },
}

#[derive(Debug, Args)]
pub struct DbArgs {
    #[arg(id = "db-url", long = "db-url", env = "TENANTRY_DB_URL", default_value = "127.0.0.1:8000")]
    pub url: String,
    #[arg(id = "db-namespace", long = "db-namespace", env = "TENANTRY_DB_NAMESPACE", default_value = "tenantry")]
    pub namespace: String,
    #[arg(id = "db-database", long = "db-database", env = "TENANTRY_DB_DATABASE", default_value = "main")]
    pub database: String,
    #[arg(id = "db-username", long = "db-username", env = "TENANTRY_DB_USERNAME", default_value = "root")]
    pub username: String,
    #[arg(
        id = "db-password", long = "db-password",
        env = "TENANTRY_DB_PASSWORD",
        default_value = "root",
        hide_env_values = true
    )]
    pub password: String,
}

impl DbArgs {
    pub fn into_config(self) -> DbConfig {
        DbConfig {
            url: self.url,
            namespace: self.namespace,
            database: self.database,
            username: self.username,
            password: self.password,
        }
    }
}

#[derive(Debug, Args)]
pub struct KeycloakArgs {
    #[arg(id = "keycloak-url", long = "keycloak-url", env = "TENANTRY_KEYCLOAK_URL", default_value = "http://localhost:8080")]
    pub base_url: String,
    #[arg(id = "keycloak-admin-realm", long = "keycloak-admin-realm", env = "TENANTRY_KEYCLOAK_ADMIN_REALM", default_value = "master")]
    pub admin_realm: String,
    #[arg(id = "keycloak-client-id", long = "keycloak-client-id", env = "TENANTRY_KEYCLOAK_CLIENT_ID", default_value = "admin-cli")]
    pub client_id: String,
    #[arg(id = "keycloak-username", long = "keycloak-username", env = "TENANTRY_KEYCLOAK_USERNAME", default_value = "admin")]
    pub username: String,
    #[arg(
        id = "keycloak-password", long = "keycloak-password",
        env = "TENANTRY_KEYCLOAK_PASSWORD",
        default_value = "admin",
        hide_env_values = true
    )]
    pub password: String,
    #[arg(id = "keycloak-timeout-secs", long = "keycloak-timeout-secs", env = "TENANTRY_KEYCLOAK_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,
}

impl KeycloakArgs {
    pub fn into_config(self) -> KeycloakConfig {
        KeycloakConfig {
            base_url: self.base_url,
            admin_realm: self.admin_realm,
            admin_client_id: self.client_id,
            admin_username: self.username,
            admin_password: self.password,
            request_timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

#[derive(Debug, Args)]
pub struct ArgoArgs {
    #[arg(id = "argo-url", long = "argo-url", env = "TENANTRY_ARGO_URL", default_value = "http://localhost:2746")]
    pub base_url: String,
    #[arg(id = "argo-namespace", long = "argo-namespace", env = "TENANTRY_ARGO_NAMESPACE", default_value = "argo")]
    pub namespace: String,
    #[arg(id = "argo-token", long = "argo-token", env = "TENANTRY_ARGO_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
    #[arg(id = "argo-timeout-secs", long = "argo-timeout-secs", env = "TENANTRY_ARGO_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,
}

impl ArgoArgs {
    pub fn into_config(self) -> ArgoConfig {
        ArgoConfig {
            base_url: self.base_url,
            namespace: self.namespace,
            token: self.token,
            request_timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

#[derive(Debug, Args)]
pub struct ServiceArgs {
    #[arg(long, env = "TENANTRY_WORKFLOW_TEMPLATE", default_value = "create-contract-repo")]
    pub workflow_template: String,
    #[arg(long, env = "TENANTRY_ADMIN_ACCOUNT", default_value = "admin")]
    pub admin_account: String,
    #[arg(
        long,
        env = "TENANTRY_ADMIN_INITIAL_PASSWORD",
        default_value = "admin",
        hide_env_values = true
    )]
    pub admin_initial_password: String,
    #[arg(long, env = "TENANTRY_ADMIN_ROLE", default_value = "admin")]
    pub admin_role: String,
    #[arg(long, env = "TENANTRY_PASSWORD_PEPPER", hide_env_values = true)]
    pub pepper: Option<String>,
}

impl ServiceArgs {
    pub fn into_config(self) -> ServiceConfig {
        ServiceConfig {
            workflow_template: self.workflow_template,
            admin_account: self.admin_account,
            admin_initial_password: self.admin_initial_password,
            admin_role: self.admin_role,
            pepper: self.pepper,
        }
    }
}
