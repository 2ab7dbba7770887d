use super::*;
use crate::core::middleware::TokenStore;
use crate::store::{DocumentStore, StoreError};
use httpmock::prelude::*;
use httpmock::Method::PATCH;
use serde_json::json;

fn service(server: &MockServer) -> AdminService {
    AdminService::new(DocumentStore::with_base_url(
        TokenStore::new(),
        server.url("/documents"),
    ))
}

fn user_doc(id: &str, email: &str, role: &str) -> serde_json::Value {
    json!({
        "name": format!("projects/p/databases/(default)/documents/users/{}", id),
        "fields": {
            "uid": { "stringValue": id },
            "email": { "stringValue": email },
            "displayName": { "stringValue": "Pat" },
            "role": { "stringValue": role },
            "permissions": { "arrayValue": { "values": [] } },
            "createdAt": { "stringValue": "2024-01-01T00:00:00Z" },
            "lastLoginAt": { "stringValue": "2024-01-01T00:00:00Z" }
        },
        "createTime": "2024-01-01T00:00:00Z",
        "updateTime": "2024-01-01T00:00:00Z"
    })
}

#[tokio::test]
async fn assign_with_no_matching_user_returns_false() {
    let server = MockServer::start();
    let admin = service(&server);

    let query_mock = server.mock(|when, then| {
        when.method(POST).path("/documents:runQuery");
        then.status(200)
            .json_body(json!([{ "readTime": "2024-01-02T00:00:00Z" }]));
    });

    let assigned = admin
        .assign_admin_role("ghost@example.com", Role::Admin, vec![], "super-1")
        .await
        .unwrap();

    assert!(!assigned);
    query_mock.assert();
}

#[tokio::test]
async fn assign_patches_role_and_records_assignment() {
    let server = MockServer::start();
    let admin = service(&server);

    server.mock(|when, then| {
        when.method(POST)
            .path("/documents:runQuery")
            .body_contains("pat@example.com");
        then.status(200).json_body(json!([
            { "document": user_doc("uid-9", "pat@example.com", "user") }
        ]));
    });

    let patch_mock = server.mock(|when, then| {
        when.method(PATCH)
            .path("/documents/users/uid-9")
            .query_param("updateMask.fieldPaths", "role")
            .body_contains("admin");
        then.status(200).json_body(json!({
            "name": "projects/p/databases/(default)/documents/users/uid-9",
            "fields": {},
            "createTime": "2024-01-01T00:00:00Z",
            "updateTime": "2024-01-01T00:00:00Z"
        }));
    });

    let record_mock = server.mock(|when, then| {
        when.method(PATCH)
            .path("/documents/adminAssignments/uid-9")
            .body_contains("super-1");
        then.status(200).json_body(json!({
            "name": "projects/p/databases/(default)/documents/adminAssignments/uid-9",
            "fields": {},
            "createTime": "2024-01-01T00:00:00Z",
            "updateTime": "2024-01-01T00:00:00Z"
        }));
    });

    let assigned = admin
        .assign_admin_role(
            "pat@example.com",
            Role::Admin,
            vec!["manage_media".into()],
            "super-1",
        )
        .await
        .unwrap();

    assert!(assigned);
    patch_mock.assert();
    record_mock.assert();
}

#[tokio::test]
async fn assign_propagates_record_failure_after_role_patch() {
    let server = MockServer::start();
    let admin = service(&server);

    server.mock(|when, then| {
        when.method(POST).path("/documents:runQuery");
        then.status(200).json_body(json!([
            { "document": user_doc("uid-9", "pat@example.com", "user") }
        ]));
    });

    server.mock(|when, then| {
        when.method(PATCH).path("/documents/users/uid-9");
        then.status(200).json_body(json!({
            "name": "projects/p/databases/(default)/documents/users/uid-9",
            "fields": {},
            "createTime": "2024-01-01T00:00:00Z",
            "updateTime": "2024-01-01T00:00:00Z"
        }));
    });

    server.mock(|when, then| {
        when.method(PATCH).path("/documents/adminAssignments/uid-9");
        then.status(403).json_body(json!({
            "error": { "code": 403, "message": "denied", "status": "PERMISSION_DENIED" }
        }));
    });

    let err = admin
        .assign_admin_role("pat@example.com", Role::Admin, vec![], "super-1")
        .await
        .unwrap_err();
    assert!(matches!(err, AdminError::Store(StoreError::Api(_))));
}

#[tokio::test]
async fn remove_resets_role_and_deactivates_record() {
    let server = MockServer::start();
    let admin = service(&server);

    server.mock(|when, then| {
        when.method(POST).path("/documents:runQuery");
        then.status(200).json_body(json!([
            { "document": user_doc("uid-9", "pat@example.com", "admin") }
        ]));
    });

    let patch_mock = server.mock(|when, then| {
        when.method(PATCH)
            .path("/documents/users/uid-9")
            .body_contains("user");
        then.status(200).json_body(json!({
            "name": "projects/p/databases/(default)/documents/users/uid-9",
            "fields": {},
            "createTime": "2024-01-01T00:00:00Z",
            "updateTime": "2024-01-01T00:00:00Z"
        }));
    });

    let record_mock = server.mock(|when, then| {
        when.method(PATCH)
            .path("/documents/adminAssignments/uid-9")
            .query_param("updateMask.fieldPaths", "isActive");
        then.status(200).json_body(json!({
            "name": "projects/p/databases/(default)/documents/adminAssignments/uid-9",
            "fields": {},
            "createTime": "2024-01-01T00:00:00Z",
            "updateTime": "2024-01-01T00:00:00Z"
        }));
    });

    let removed = admin.remove_admin_role("pat@example.com").await.unwrap();
    assert!(removed);
    patch_mock.assert();
    record_mock.assert();
}

#[tokio::test]
async fn users_by_role_decodes_profiles() {
    let server = MockServer::start();
    let admin = service(&server);

    server.mock(|when, then| {
        when.method(POST)
            .path("/documents:runQuery")
            .body_contains("\"stringValue\":\"admin\"");
        then.status(200).json_body(json!([
            { "document": user_doc("uid-1", "a@example.com", "admin") },
            { "document": user_doc("uid-2", "b@example.com", "admin") }
        ]));
    });

    let admins = admin.users_by_role(Role::Admin).await.unwrap();
    assert_eq!(admins.len(), 2);
    assert!(admins.iter().all(|u| u.role == Role::Admin));
}
