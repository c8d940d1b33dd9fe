//! Tenantry operator CLI.
//!
//! Wires the SurrealDB repositories, the Keycloak and Argo gateways and
//! the orchestrators together, then runs a single provisioning command.

mod cli;

use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use serde_json::Value;
use tenantry_core::error::{ErrorKind, ResultExt, TenantryError, TenantryResult};
use tenantry_core::models::api::{CreateOrganizationResponse, OrganizationResponse, UserResponse};
use tenantry_core::models::organization::NewOrganization;
use tenantry_db::DbManager;
use tenantry_gateway::{ArgoClient, KeycloakClient};
use tenantry_service::{OrganizationService, UserService};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .json()
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, kind = ?err.kind(), "Command failed");
            exit_code(err.kind())
        }
    }
}

fn exit_code(kind: ErrorKind) -> ExitCode {
    match kind {
        ErrorKind::BadRequest => ExitCode::from(2),
        ErrorKind::NotFound => ExitCode::from(3),
        ErrorKind::Conflict => ExitCode::from(4),
        ErrorKind::Internal => ExitCode::FAILURE,
    }
}

async fn run(cli: Cli) -> TenantryResult<()> {
    let db_config = cli.db.into_config();
    let store = DbManager::open(&db_config).await.context("open record store")?;

    if matches!(cli.command, Command::Migrate) {
        info!("Migrations up to date");
        return Ok(());
    }

    let identity = KeycloakClient::new(cli.keycloak.into_config())
        .map_err(|e| e.into_tenantry(TenantryError::IdentityProvider))
        .context("configure Keycloak client")?;
    let workflows = ArgoClient::new(cli.argo.into_config())
        .map_err(|e| e.into_tenantry(TenantryError::Workflow))
        .context("configure Argo client")?;
    let config = cli.service.into_config();

    let organizations = OrganizationService::new(
        store.organizations(),
        identity.clone(),
        workflows,
        config.clone(),
    );
    let users = UserService::new(store.users(), identity, config);

    match cli.command {
        Command::Migrate => {}
        Command::CreateOrganization {
            name,
            description,
            phone,
            creator,
            token,
        } => {
            let input = NewOrganization {
                name,
                description,
                phone,
                creator,
            };
            let id = organizations.create(input, token.as_deref()).await?;
            print_json(&CreateOrganizationResponse { id })?;
        }
        Command::DeleteOrganization { id, token } => {
            organizations.delete(&id, token.as_deref()).await?;
            info!(organization_id = %id, "Organization deleted");
        }
        Command::CreateAdmin { organization_id } => {
            let user = users.create_admin(&organization_id).await?;
            print_json(&UserResponse::from(user))?;
        }
        Command::DeleteAdmin { organization_id } => {
            users.delete_admin(&organization_id).await?;
            info!(organization_id = %organization_id, "Administrator deleted");
        }
        Command::ListOrganizations => {
            let list: Vec<OrganizationResponse> = organizations
                .list()
                .await?
                .into_iter()
                .map(OrganizationResponse::from)
                .collect();
            print_json(&list)?;
        }
        Command::ListUsers { organization_id } => {
            let list: Vec<UserResponse> = users
                .list(&organization_id)
                .await?
                .into_iter()
                .map(UserResponse::from)
                .collect();
            print_json(&list)?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> TenantryResult<()> {
    let value: Value = serde_json::to_value(value)
        .map_err(|e| TenantryError::Internal(format!("serialize output: {e}")))?;
    println!("{value:#}");
    Ok(())
}
