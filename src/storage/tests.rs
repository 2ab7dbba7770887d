use super::*;
use crate::core::middleware::TokenStore;
use httpmock::prelude::*;
use serde_json::json;

fn service(server: &MockServer) -> StorageService {
    StorageService::with_base_url(TokenStore::new(), server.url(""), "test-bucket")
}

#[tokio::test]
async fn upload_profile_image_returns_public_url() {
    let server = MockServer::start();
    let storage = service(&server);

    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/b/test-bucket/o")
            .query_param("uploadType", "media")
            .query_param("name", "profile-images/uid-1.jpg")
            .header("content-type", "image/jpeg");
        then.status(200).json_body(json!({
            "name": "profile-images/uid-1.jpg",
            "bucket": "test-bucket"
        }));
    });

    let url = storage
        .upload_profile_image("uid-1", b"jpegdata".to_vec(), "image/jpeg")
        .await
        .unwrap();

    assert_eq!(
        url,
        format!(
            "{}/b/test-bucket/o/profile-images%2Fuid-1.jpg?alt=media",
            server.base_url()
        )
    );
    mock.assert();
}

#[tokio::test]
async fn content_image_paths_are_timestamped() {
    let server = MockServer::start();
    let storage = service(&server);

    let mock = server.mock(|when, then| {
        when.method(POST).path("/b/test-bucket/o");
        then.status(200).json_body(json!({ "name": "x" }));
    });

    let url = storage
        .upload_content_image("events", "picnic.png", b"png".to_vec(), "image/png")
        .await
        .unwrap();

    assert!(url.contains("content-images%2Fevents%2F"));
    assert!(url.ends_with("_picnic.png?alt=media"));
    mock.assert();
}

#[tokio::test]
async fn delete_percent_encodes_the_object_name() {
    let server = MockServer::start();
    let storage = service(&server);

    let mock = server.mock(|when, then| {
        when.method(DELETE)
            .path("/b/test-bucket/o/thumbnails%2Fsermon.png");
        then.status(204);
    });

    storage.delete("thumbnails/sermon.png").await.unwrap();
    mock.assert();
}

#[tokio::test]
async fn upload_failure_surfaces_backend_message() {
    let server = MockServer::start();
    let storage = service(&server);

    server.mock(|when, then| {
        when.method(POST).path("/b/test-bucket/o");
        then.status(403).json_body(json!({
            "error": { "code": 403, "message": "Permission denied.", "status": "PERMISSION_DENIED" }
        }));
    });

    let err = storage
        .upload("thumbnails/x.png", b"png".to_vec(), "image/png")
        .await
        .unwrap_err();
    match err {
        StorageError::Api(msg) => assert!(msg.contains("Permission denied")),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn download_url_is_pure_construction() {
    let storage = StorageService::new(TokenStore::new(), "congregate.appspot.com");
    let url = storage.download_url("content-images/news/1_banner.png");
    assert_eq!(
        url,
        "https://firebasestorage.googleapis.com/v0/b/congregate.appspot.com/o/content-images%2Fnews%2F1_banner.png?alt=media"
    );
}

#[test]
fn extension_mapping() {
    assert_eq!(extension_for("image/jpeg"), "jpg");
    assert_eq!(extension_for("image/png"), "png");
    assert_eq!(extension_for("image/svg+xml"), "svg+xml");
}
