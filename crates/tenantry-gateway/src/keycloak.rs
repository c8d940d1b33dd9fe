//! Keycloak admin REST adapter for [`IdentityProvider`].
//!
//! Each organization is a realm. The realm is named after the
//! organization with a short random suffix, and that name doubles as the
//! realm id so the store row and the realm share one identifier.

use std::time::Duration;

use rand::Rng;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tenantry_core::error::{TenantryError, TenantryResult};
use tenantry_core::gateway::IdentityProvider;
use tenantry_core::models::identity::{IdentityUser, RealmDefaults};
use tracing::{debug, instrument};
use url::Url;

use crate::error::GatewayError;
use crate::http::{check_status, endpoint, new_client, parse_base_url};

#[derive(Debug, Clone)]
pub struct KeycloakConfig {
    /// Server root, e.g. `http://localhost:8080`.
    pub base_url: String,
    /// Realm holding the administrative principal.
    pub admin_realm: String,
    pub admin_client_id: String,
    pub admin_username: String,
    pub admin_password: String,
    pub request_timeout: Duration,
}

impl Default for KeycloakConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".into(),
            admin_realm: "master".into(),
            admin_client_id: "admin-cli".into(),
            admin_username: "admin".into(),
            admin_password: "admin".into(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RealmRepresentation<'a> {
    id: &'a str,
    realm: &'a str,
    enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    display_name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct PasswordGrant<'a> {
    grant_type: &'static str,
    client_id: &'a str,
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Lowercase the name and collapse every run of characters outside
/// `[a-z0-9]` into a single `-`.
pub fn realm_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        slug.push_str("org");
    }
    slug
}

fn realm_id(name: &str) -> String {
    let suffix: u16 = rand::thread_rng().gen_range(0..0x1000);
    format!("{}-{suffix:03x}", realm_slug(name))
}

fn identity_error(err: GatewayError) -> TenantryError {
    err.into_tenantry(TenantryError::IdentityProvider)
}

#[derive(Debug, Clone)]
pub struct KeycloakClient {
    http: Client,
    base_url: Url,
    config: KeycloakConfig,
}

impl KeycloakClient {
    pub fn new(config: KeycloakConfig) -> Result<Self, GatewayError> {
        Ok(Self {
            http: new_client(config.request_timeout)?,
            base_url: parse_base_url(&config.base_url)?,
            config,
        })
    }

    fn admin_url(&self, realm: &str, rest: &[&str]) -> Result<Url, GatewayError> {
        let mut segments = vec!["admin", "realms", realm];
        segments.extend_from_slice(rest);
        endpoint(&self.base_url, &segments)
    }

    #[instrument(skip(self, defaults, token))]
    async fn post_realm(
        &self,
        name: &str,
        defaults: &RealmDefaults,
        token: &str,
    ) -> Result<String, GatewayError> {
        let id = realm_id(name);
        let body = RealmRepresentation {
            id: &id,
            realm: &id,
            enabled: defaults.enabled,
            display_name: defaults.display_name.as_deref(),
        };

        let url = endpoint(&self.base_url, &["admin", "realms"])?;
        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;
        check_status(response, "realm", &id).await?;

        debug!(realm = %id, "Created realm");
        Ok(id)
    }

    #[instrument(skip(self, token))]
    async fn remove_realm(&self, realm: &str, token: &str) -> Result<(), GatewayError> {
        let url = self.admin_url(realm, &[])?;
        let response = self.http.delete(url).bearer_auth(token).send().await?;
        check_status(response, "realm", realm).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn password_grant(&self) -> Result<String, GatewayError> {
        let url = endpoint(
            &self.base_url,
            &[
                "realms",
                self.config.admin_realm.as_str(),
                "protocol",
                "openid-connect",
                "token",
            ],
        )?;
        let form = PasswordGrant {
            grant_type: "password",
            client_id: &self.config.admin_client_id,
            username: &self.config.admin_username,
            password: &self.config.admin_password,
        };

        let response = self.http.post(url).form(&form).send().await?;
        let response = check_status(response, "admin realm", &self.config.admin_realm).await?;
        let token: TokenResponse = response.json().await?;
        Ok(token.access_token)
    }

    #[instrument(skip(self, user, token), fields(username = ?user.username))]
    async fn post_user(
        &self,
        realm: &str,
        user: &IdentityUser,
        token: &str,
    ) -> Result<(), GatewayError> {
        let url = self.admin_url(realm, &["users"])?;
        let response = self
            .http
            .post(url)
            .bearer_auth(token)
            .json(user)
            .send()
            .await?;
        let id = user.username.as_deref().unwrap_or_default();
        check_status(response, "user", id).await?;
        Ok(())
    }

    #[instrument(skip(self, token))]
    async fn find_user(
        &self,
        realm: &str,
        account_id: &str,
        token: &str,
    ) -> Result<IdentityUser, GatewayError> {
        let mut url = self.admin_url(realm, &["users"])?;
        url.query_pairs_mut()
            .append_pair("username", account_id)
            .append_pair("exact", "true");

        let response = self.http.get(url).bearer_auth(token).send().await?;
        let response = check_status(response, "realm", realm).await?;
        let users: Vec<IdentityUser> = response.json().await?;

        // `exact` is not honoured by every server version.
        users
            .into_iter()
            .find(|u| u.username.as_deref() == Some(account_id))
            .ok_or_else(|| GatewayError::NotFound {
                entity: "user",
                id: account_id.to_string(),
            })
    }

    #[instrument(skip(self, user, token), fields(user_id = ?user.id))]
    async fn put_user(
        &self,
        realm: &str,
        user: &IdentityUser,
        token: &str,
    ) -> Result<(), GatewayError> {
        let id = user.id.as_deref().ok_or_else(|| {
            GatewayError::UnexpectedResponse("user representation has no id".into())
        })?;
        let url = self.admin_url(realm, &["users", id])?;
        let response = self
            .http
            .put(url)
            .bearer_auth(token)
            .json(user)
            .send()
            .await?;
        check_status(response, "user", id).await?;
        Ok(())
    }

    #[instrument(skip(self, token))]
    async fn remove_user(
        &self,
        realm: &str,
        account_id: &str,
        token: &str,
    ) -> Result<(), GatewayError> {
        let user = self.find_user(realm, account_id, token).await?;
        let id = user.id.ok_or_else(|| {
            GatewayError::UnexpectedResponse(format!("user {account_id} has no id"))
        })?;
        let url = self.admin_url(realm, &["users", id.as_str()])?;
        let response = self.http.delete(url).bearer_auth(token).send().await?;
        check_status(response, "user", account_id).await?;
        Ok(())
    }
}

impl IdentityProvider for KeycloakClient {
    async fn create_realm(
        &self,
        name: &str,
        defaults: &RealmDefaults,
        token: &str,
    ) -> TenantryResult<String> {
        self.post_realm(name, defaults, token)
            .await
            .map_err(identity_error)
    }

    async fn delete_realm(&self, realm: &str, token: &str) -> TenantryResult<()> {
        self.remove_realm(realm, token).await.map_err(identity_error)
    }

    async fn login_admin(&self) -> TenantryResult<String> {
        self.password_grant().await.map_err(identity_error)
    }

    async fn create_user(
        &self,
        realm: &str,
        user: &IdentityUser,
        token: &str,
    ) -> TenantryResult<()> {
        self.post_user(realm, user, token)
            .await
            .map_err(identity_error)
    }

    async fn get_user(
        &self,
        realm: &str,
        account_id: &str,
        token: &str,
    ) -> TenantryResult<IdentityUser> {
        self.find_user(realm, account_id, token)
            .await
            .map_err(identity_error)
    }

    async fn update_user(
        &self,
        realm: &str,
        user: &IdentityUser,
        token: &str,
    ) -> TenantryResult<()> {
        self.put_user(realm, user, token)
            .await
            .map_err(identity_error)
    }

    async fn delete_user(&self, realm: &str, account_id: &str, token: &str) -> TenantryResult<()> {
        self.remove_user(realm, account_id, token)
            .await
            .map_err(identity_error)
    }
}
