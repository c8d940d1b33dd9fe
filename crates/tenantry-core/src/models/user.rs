//! User domain model.
//!
//! A user's `id` is always the identifier the identity provider issued
//! for the same account. The store never generates user ids itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::role::RoleRef;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    /// Login name, unique within the organization and immutable.
    pub account_id: String,
    pub name: String,
    /// Argon2id PHC string. The plaintext never reaches the store.
    pub password_hash: String,
    pub role: RoleRef,
    pub organization_id: String,
    pub email: String,
    pub department: String,
    pub description: String,
    pub creator: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied fields for a new user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewUser {
    pub account_id: String,
    /// Plaintext, pushed to the identity provider and hashed for the store.
    pub password: String,
    pub name: String,
    pub role_name: String,
    pub organization_id: String,
    pub email: String,
    pub department: String,
    pub description: String,
    pub creator: Option<Uuid>,
}

/// Caller-supplied profile changes. The account id is not part of it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    pub role_name: String,
    pub email: String,
    pub department: String,
    pub description: String,
}

/// Store input for a new user row, keyed by the identity provider's id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRecord {
    pub id: Uuid,
    pub account_id: String,
    pub name: String,
    pub password_hash: String,
    pub email: String,
    pub department: String,
    pub description: String,
    pub organization_id: String,
    pub role_id: Uuid,
    pub creator: Option<Uuid>,
}

/// Full replacement of a user row's mutable columns.
///
/// `role_id` of `None` leaves the stored role untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUserRecord {
    pub account_id: String,
    pub name: String,
    pub password_hash: String,
    pub email: String,
    pub department: String,
    pub description: String,
    pub role_id: Option<Uuid>,
}

impl UpdateUserRecord {
    /// Carry every column of `user` over unchanged.
    pub fn unchanged(user: &User) -> Self {
        Self {
            account_id: user.account_id.clone(),
            name: user.name.clone(),
            password_hash: user.password_hash.clone(),
            email: user.email.clone(),
            department: user.department.clone(),
            description: user.description.clone(),
            role_id: None,
        }
    }

    /// Apply a profile change on top of `existing`, keeping its account id
    /// and password hash.
    pub fn with_profile(existing: &User, profile: &UserProfile, role_id: Option<Uuid>) -> Self {
        Self {
            name: profile.name.clone(),
            email: profile.email.clone(),
            department: profile.department.clone(),
            description: profile.description.clone(),
            role_id,
            ..Self::unchanged(existing)
        }
    }

    /// Replace only the password hash.
    pub fn with_password_hash(existing: &User, password_hash: String) -> Self {
        Self {
            password_hash,
            ..Self::unchanged(existing)
        }
    }
}
