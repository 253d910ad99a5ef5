//! Integration tests for the download module.
//!
//! These tests verify the full download flow against local HTTP servers.

mod support;

use std::time::{Duration, Instant};

use support::socket_guard::{should_skip_socket_bound_test, start_mock_server_or_skip};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wallhaven_core::download::{DownloadError, HttpClient, ThrottlePolicy, download_asset};
use wallhaven_core::output::{CaptureBuffer, Console};
use wallhaven_core::progress::ProgressBoard;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

fn fast_client() -> HttpClient {
    HttpClient::with_throttle_policy(ThrottlePolicy::new(Duration::from_millis(50), None))
}

/// Serves one HTTP/1.0-style response with no `Content-Length`; the body ends at EOF.
async fn serve_without_content_length(body: &'static [u8]) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        socket
            .write_all(b"HTTP/1.1 200 OK\r\nContent-Type: image/png\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();
        socket.write_all(body).await.unwrap();
        socket.shutdown().await.unwrap();
    });
    format!("http://{addr}/full/nc/wallhaven-nolength.png")
}

#[tokio::test]
async fn test_download_full_flow_preserves_content() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    let content = b"\x89PNG\r\n\x1a\n fake image payload".to_vec();
    Mock::given(method("GET"))
        .and(path("/full/pk/wallhaven-pkgkkp.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(content.clone()))
        .mount(&mock_server)
        .await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");

    let url = format!("{}/full/pk/wallhaven-pkgkkp.png", mock_server.uri());
    let asset = download_asset(&fast_client(), &url, temp_dir.path(), None)
        .await
        .expect("download should succeed");

    assert_eq!(asset.path, temp_dir.path().join("pkgkkp.png"));
    assert_eq!(std::fs::read(&asset.path).unwrap(), content);
    assert_eq!(asset.content_length, Some(content.len() as u64));
}

#[tokio::test]
async fn test_download_waits_out_throttling_before_streaming() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/wallhaven-slow.jpg"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/wallhaven-slow.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"jpeg".to_vec()))
        .expect(1)
        .mount(&mock_server)
        .await;
    let temp_dir = TempDir::new().unwrap();

    let started = Instant::now();
    let url = format!("{}/wallhaven-slow.jpg", mock_server.uri());
    let asset = download_asset(&fast_client(), &url, temp_dir.path(), None)
        .await
        .unwrap();

    assert!(started.elapsed() >= Duration::from_millis(50));
    assert_eq!(std::fs::read(asset.path).unwrap(), b"jpeg");
}

#[tokio::test]
async fn test_download_gives_up_when_throttling_is_bounded() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&mock_server)
        .await;
    let temp_dir = TempDir::new().unwrap();
    let client =
        HttpClient::with_throttle_policy(ThrottlePolicy::new(Duration::from_millis(5), Some(2)));

    let url = format!("{}/wallhaven-never.jpg", mock_server.uri());
    let result = download_asset(&client, &url, temp_dir.path(), None).await;

    assert!(matches!(result, Err(DownloadError::Throttled { .. })));
    assert!(!temp_dir.path().join("never.jpg").exists());
}

#[tokio::test]
async fn test_missing_content_length_fails_when_progress_is_shown() {
    if should_skip_socket_bound_test() {
        return;
    }
    let url = serve_without_content_length(b"body without length").await;
    let temp_dir = TempDir::new().unwrap();
    let board = ProgressBoard::new(Console::with_writer(CaptureBuffer::new(), false));

    let result = download_asset(&fast_client(), &url, temp_dir.path(), Some(&board)).await;

    assert!(matches!(
        result,
        Err(DownloadError::MissingContentLength { .. })
    ));
    assert!(board.is_empty());
    assert!(!temp_dir.path().join("nolength.png").exists());
}

#[tokio::test]
async fn test_missing_content_length_is_fine_without_progress() {
    if should_skip_socket_bound_test() {
        return;
    }
    let url = serve_without_content_length(b"body without length").await;
    let temp_dir = TempDir::new().unwrap();

    let asset = download_asset(&fast_client(), &url, temp_dir.path(), None)
        .await
        .unwrap();

    assert_eq!(asset.content_length, None);
    assert_eq!(asset.bytes_written, 19);
    assert_eq!(
        std::fs::read(temp_dir.path().join("nolength.png")).unwrap(),
        b"body without length"
    );
}
