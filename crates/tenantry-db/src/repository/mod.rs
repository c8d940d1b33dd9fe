//! SurrealDB repository implementations.

mod organization;
mod role;
mod user;

pub use organization::SurrealOrganizationRepository;
pub use user::SurrealUserRepository;

use uuid::Uuid;

use crate::error::DbError;

fn parse_uuid(s: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(s).map_err(|e| DbError::Corrupt(format!("invalid UUID {s}: {e}")))
}

fn parse_optional_uuid(s: Option<&str>) -> Result<Option<Uuid>, DbError> {
    s.map(parse_uuid).transpose()
}
