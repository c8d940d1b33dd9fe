//! Integration tests for schema initialization using in-memory SurrealDB.

use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use tenantry_core::repository::UserRepository;
use tenantry_db::repository::SurrealUserRepository;

#[tokio::test]
async fn schema_migration_applies_successfully() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    tenantry_db::run_migrations(&db).await.unwrap();

    let mut result = db.query("INFO FOR DB").await.unwrap();
    let info: Option<surrealdb_types::Value> = result.take(0).unwrap();
    let info_str = format!("{:?}", info.expect("INFO FOR DB should return a value"));

    assert!(info_str.contains("organization"), "missing organization table");
    assert!(info_str.contains("user"), "missing user table");
    assert!(info_str.contains("role"), "missing role table");
    assert!(info_str.contains("_migration"), "missing _migration table");
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    tenantry_db::run_migrations(&db).await.unwrap();
    tenantry_db::run_migrations(&db).await.unwrap();

    // The role seed must not run twice.
    let roles = SurrealUserRepository::new(db).fetch_roles().await.unwrap();
    assert_eq!(roles.len(), 2);
}

#[tokio::test]
async fn role_catalog_is_seeded() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    tenantry_db::run_migrations(&db).await.unwrap();

    let roles = SurrealUserRepository::new(db).fetch_roles().await.unwrap();
    let names: Vec<&str> = roles.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["admin", "user"]);
    assert_eq!(roles[0].id.to_string(), tenantry_db::ADMIN_ROLE_ID);
    assert_eq!(roles[1].id.to_string(), tenantry_db::USER_ROLE_ID);
}
