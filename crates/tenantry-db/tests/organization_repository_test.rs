//! Integration tests for the Organization repository using in-memory
//! SurrealDB.

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use tenantry_core::error::ErrorKind;
use tenantry_core::models::organization::{
    CreateOrganization, OrganizationStatus, UpdateOrganization,
};
use tenantry_core::repository::OrganizationRepository;
use tenantry_db::repository::SurrealOrganizationRepository;
use uuid::Uuid;

async fn setup() -> SurrealOrganizationRepository<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    tenantry_db::run_migrations(&db).await.unwrap();
    SurrealOrganizationRepository::new(db)
}

fn acme(id: &str) -> CreateOrganization {
    CreateOrganization {
        id: id.into(),
        name: "acme".into(),
        description: "Widgets".into(),
        phone: "555-0100".into(),
        creator: Some(Uuid::new_v4()),
    }
}

#[tokio::test]
async fn create_keeps_the_supplied_id_and_defaults() {
    let repo = setup().await;

    let org = repo.create(acme("acme-7f3")).await.unwrap();
    assert_eq!(org.id, "acme-7f3");
    assert_eq!(org.name, "acme");
    assert_eq!(org.status, OrganizationStatus::Unset);
    assert!(org.workflow_id.is_empty());

    let fetched = repo.get("acme-7f3").await.unwrap();
    assert_eq!(fetched.id, "acme-7f3");
    assert_eq!(fetched.phone, "555-0100");
    assert_eq!(fetched.creator, org.creator);
}

#[tokio::test]
async fn duplicate_id_is_rejected() {
    let repo = setup().await;
    repo.create(acme("acme-7f3")).await.unwrap();

    let err = repo.create(acme("acme-7f3")).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Internal);
    let message = err.to_string();
    assert!(message.contains("Query failed"), "{message}");
    assert!(!message.contains("Migration"), "{message}");
}

#[tokio::test]
async fn get_missing_is_not_found() {
    let repo = setup().await;
    let err = repo.get("missing-id").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn fetch_returns_every_row() {
    let repo = setup().await;
    repo.create(acme("acme-7f3")).await.unwrap();
    repo.create(acme("globex-a01")).await.unwrap();

    let all = repo.fetch().await.unwrap();
    let mut ids: Vec<String> = all.into_iter().map(|o| o.id).collect();
    ids.sort();
    assert_eq!(ids, vec!["acme-7f3", "globex-a01"]);
}

#[tokio::test]
async fn update_touches_only_supplied_fields() {
    let repo = setup().await;
    repo.create(acme("acme-7f3")).await.unwrap();

    let updated = repo
        .update(
            "acme-7f3",
            UpdateOrganization {
                description: None,
                phone: Some("555-0199".into()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.phone, "555-0199");
    assert_eq!(updated.description, "Widgets");
    assert_eq!(updated.name, "acme");
}

#[tokio::test]
async fn update_missing_is_not_found() {
    let repo = setup().await;
    let err = repo
        .update("missing-id", UpdateOrganization::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn init_workflow_sets_pending_and_job_id() {
    let repo = setup().await;
    repo.create(acme("acme-7f3")).await.unwrap();

    repo.init_workflow(
        "acme-7f3",
        "create-contract-repo-x2k9p",
        OrganizationStatus::Pending,
    )
    .await
        .unwrap();

    let org = repo.get("acme-7f3").await.unwrap();
    assert_eq!(org.status, OrganizationStatus::Pending);
    assert_eq!(org.workflow_id, "create-contract-repo-x2k9p");
}

#[tokio::test]
async fn init_workflow_writes_the_given_status() {
    let repo = setup().await;
    repo.create(acme("acme-7f3")).await.unwrap();

    repo.init_workflow("acme-7f3", "wf-1", OrganizationStatus::Creating)
        .await
        .unwrap();

    let org = repo.get("acme-7f3").await.unwrap();
    assert_eq!(org.status, OrganizationStatus::Creating);
    assert_eq!(org.workflow_id, "wf-1");
}

#[tokio::test]
async fn init_workflow_without_row_is_not_found() {
    let repo = setup().await;
    let err = repo
        .init_workflow("missing-id", "wf", OrganizationStatus::Pending)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn delete_removes_row_and_requires_existence() {
    let repo = setup().await;
    repo.create(acme("acme-7f3")).await.unwrap();

    repo.delete("acme-7f3").await.unwrap();
    assert_eq!(
        repo.get("acme-7f3").await.unwrap_err().kind(),
        ErrorKind::NotFound
    );
    assert_eq!(
        repo.delete("acme-7f3").await.unwrap_err().kind(),
        ErrorKind::NotFound
    );
}
