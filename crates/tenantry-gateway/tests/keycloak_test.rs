//! Keycloak adapter tests against a wiremock server.

use serde_json::json;
use tenantry_core::error::ErrorKind;
use tenantry_core::gateway::IdentityProvider;
use tenantry_core::models::identity::{Credential, IdentityUser, RealmDefaults};
use tenantry_gateway::{KeycloakClient, KeycloakConfig};
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> KeycloakClient {
    KeycloakClient::new(KeycloakConfig {
        base_url: server.uri(),
        ..Default::default()
    })
    .unwrap()
}

#[tokio::test]
async fn create_realm_returns_slugged_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/admin/realms"))
        .and(header("authorization", "Bearer tok"))
        .and(body_partial_json(json!({"enabled": true, "displayName": "Acme"})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let defaults = RealmDefaults {
        display_name: Some("Acme".into()),
        ..Default::default()
    };
    let id = client(&server)
        .create_realm("Acme", &defaults, "tok")
        .await
        .unwrap();

    assert!(id.starts_with("acme-"), "unexpected realm id {id}");
    assert_eq!(id.len(), "acme-".len() + 3);
}

#[tokio::test]
async fn create_realm_conflict_maps_to_conflict() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/admin/realms"))
        .respond_with(ResponseTemplate::new(409))
        .mount(&server)
        .await;

    let err = client(&server)
        .create_realm("acme", &RealmDefaults::default(), "tok")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
}

#[tokio::test]
async fn server_error_is_internal() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/admin/realms/acme-7f3"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = client(&server)
        .delete_realm("acme-7f3", "tok")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Internal);
    assert!(err.to_string().contains("boom"));
}

#[tokio::test]
async fn login_admin_uses_password_grant() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/realms/master/protocol/openid-connect/token"))
        .and(body_string_contains("grant_type=password"))
        .and(body_string_contains("client_id=admin-cli"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"access_token": "admin-tok"})),
        )
        .mount(&server)
        .await;

    let token = client(&server).login_admin().await.unwrap();
    assert_eq!(token, "admin-tok");
}

#[tokio::test]
async fn create_user_posts_representation() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/admin/realms/acme-7f3/users"))
        .and(body_partial_json(json!({
            "username": "jdoe",
            "groups": ["admin@acme-7f3"],
            "credentials": [{"type": "password", "value": "pw", "temporary": false}],
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let user = IdentityUser::new_account("jdoe", "pw", "admin@acme-7f3".into());
    client(&server)
        .create_user("acme-7f3", &user, "tok")
        .await
        .unwrap();
}

#[tokio::test]
async fn get_user_filters_exact_username() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/realms/acme-7f3/users"))
        .and(query_param("username", "jdoe"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "11111111-1111-4111-8111-111111111111", "username": "jdoe2"},
            {"id": "22222222-2222-4222-8222-222222222222", "username": "jdoe"},
        ])))
        .mount(&server)
        .await;

    let user = client(&server)
        .get_user("acme-7f3", "jdoe", "tok")
        .await
        .unwrap();
    assert_eq!(
        user.id.as_deref(),
        Some("22222222-2222-4222-8222-222222222222")
    );
}

#[tokio::test]
async fn get_user_absent_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/realms/acme-7f3/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let err = client(&server)
        .get_user("acme-7f3", "ghost", "tok")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn update_user_puts_by_id() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/admin/realms/acme-7f3/users/u-1"))
        .and(body_partial_json(json!({"credentials": [{"value": "new"}]})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let user = IdentityUser {
        id: Some("u-1".into()),
        credentials: Some(vec![Credential::password("new")]),
        ..Default::default()
    };
    client(&server)
        .update_user("acme-7f3", &user, "tok")
        .await
        .unwrap();
}

#[tokio::test]
async fn update_user_without_id_fails() {
    let server = MockServer::start().await;
    let err = client(&server)
        .update_user("acme-7f3", &IdentityUser::default(), "tok")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Internal);
}

#[tokio::test]
async fn delete_user_resolves_id_first() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/realms/acme-7f3/users"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"id": "u-1", "username": "jdoe"}])),
        )
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/admin/realms/acme-7f3/users/u-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .delete_user("acme-7f3", "jdoe", "tok")
        .await
        .unwrap();
}
