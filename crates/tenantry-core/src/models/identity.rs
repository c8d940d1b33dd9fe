//! Identity provider representations.
//!
//! These mirror the identity provider's user and realm documents. Every
//! field is optional so partial updates only send what they set.

use serde::{Deserialize, Serialize};

pub const PASSWORD_CREDENTIAL: &str = "password";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temporary: Option<bool>,
}

impl Credential {
    /// A permanent password credential.
    pub fn password(value: impl Into<String>) -> Self {
        Self {
            kind: Some(PASSWORD_CREDENTIAL.into()),
            value: Some(value.into()),
            temporary: Some(false),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials: Option<Vec<Credential>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<String>>,
}

impl IdentityUser {
    /// Representation for a new enabled account with a permanent
    /// password and a single group.
    pub fn new_account(account_id: &str, password: &str, group: String) -> Self {
        Self {
            username: Some(account_id.to_string()),
            enabled: Some(true),
            credentials: Some(vec![Credential::password(password)]),
            groups: Some(vec![group]),
            ..Default::default()
        }
    }

    /// Partial representation that only changes group membership.
    pub fn group_change(id: &str, group: String) -> Self {
        Self {
            id: Some(id.to_string()),
            groups: Some(vec![group]),
            ..Default::default()
        }
    }
}

/// Realm settings applied at creation beyond its name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealmDefaults {
    pub enabled: bool,
    pub display_name: Option<String>,
}

impl Default for RealmDefaults {
    fn default() -> Self {
        Self {
            enabled: true,
            display_name: None,
        }
    }
}

/// Group membership string binding a role to an organization,
/// e.g. `admin@acme-7f3`.
pub fn role_group(role_name: &str, organization_id: &str) -> String {
    format!("{role_name}@{organization_id}")
}
