//! Caller credentials passed explicitly to every orchestrator method.

use serde::{Deserialize, Serialize};

use crate::error::{TenantryError, TenantryResult};

/// The authenticated caller on whose behalf an operation runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub account_id: String,
    pub organization_id: String,
}

/// The caller's bearer token, or BadRequest when it is absent or blank.
pub fn require_token(token: Option<&str>) -> TenantryResult<&str> {
    match token {
        Some(t) if !t.trim().is_empty() => Ok(t),
        _ => Err(TenantryError::BadRequest(
            "actor bearer token is missing".into(),
        )),
    }
}

/// The caller's identity, or BadRequest when it is absent.
pub fn require_actor(actor: Option<&Actor>) -> TenantryResult<&Actor> {
    actor.ok_or_else(|| TenantryError::BadRequest("actor identity is missing".into()))
}
