use super::*;
use httpmock::prelude::*;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[test]
fn generates_sanitized_filename() {
    assert_eq!(
        generate_filename("My Sermon!", "https://x/y.mp3"),
        "My_Sermon.mp3"
    );
}

#[test]
fn filename_edge_cases() {
    // Whitespace runs collapse to one underscore.
    assert_eq!(
        generate_filename("Sunday   Morning  Worship", "https://x/a.mp4"),
        "Sunday_Morning_Worship.mp4"
    );
    // Kept punctuation survives; the rest is stripped.
    assert_eq!(
        generate_filename("Q&A: Faith_2024 (part-1)", "https://x/a.mp3"),
        "QA_Faith_2024_part-1.mp3"
    );
    // URL without an extension falls back to bin.
    assert_eq!(generate_filename("Notes", "https://x/stream"), "Notes.bin");
    // Title with nothing usable falls back to a generic stem.
    assert_eq!(generate_filename("!!!", "https://x/y.pdf"), "download.pdf");
    // Query strings do not leak into the extension.
    assert_eq!(
        generate_filename("Talk", "https://x/audio.mp3?token=abc.def"),
        "Talk.mp3"
    );
    // Extensions are normalized to lowercase.
    assert_eq!(generate_filename("Talk", "https://x/a.MP3"), "Talk.mp3");
}

#[tokio::test]
async fn download_writes_file_and_reports_progress() {
    let server = MockServer::start();
    let body = vec![7u8; 64 * 1024];

    server.mock(|when, then| {
        when.method(GET).path("/media/sermon.mp3");
        then.status(200).body(&body);
    });

    let dir = tempfile::tempdir().unwrap();
    let seen = Arc::new(AtomicU64::new(0));
    let seen_cb = seen.clone();

    let service = DownloadService::new();
    let path = service
        .download(
            &server.url("/media/sermon.mp3"),
            dir.path(),
            "Sunday Sermon",
            move |written, _total| {
                seen_cb.store(written, Ordering::SeqCst);
            },
        )
        .await
        .unwrap();

    assert_eq!(path.file_name().unwrap(), "Sunday_Sermon.mp3");
    let contents = tokio::fs::read(&path).await.unwrap();
    assert_eq!(contents.len(), body.len());
    // The last progress report covers the whole body.
    assert_eq!(seen.load(Ordering::SeqCst), body.len() as u64);
}

#[tokio::test]
async fn failed_download_surfaces_api_error_and_writes_nothing() {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path("/media/missing.mp3");
        then.status(404).json_body(serde_json::json!({
            "error": { "code": 404, "message": "Not found", "status": "NOT_FOUND" }
        }));
    });

    let dir = tempfile::tempdir().unwrap();
    let service = DownloadService::new();
    let err = service
        .download(
            &server.url("/media/missing.mp3"),
            dir.path(),
            "Missing",
            |_, _| {},
        )
        .await
        .unwrap_err();

    assert!(matches!(err, DownloadError::Api(_)));
    assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
}
