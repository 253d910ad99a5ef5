//! Streaming download of a single wallpaper to disk.

use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use reqwest::header::CONTENT_LENGTH;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument};

use super::client::HttpClient;
use super::constants::CHUNK_SIZE;
use super::error::DownloadError;
use super::filename::destination_path;
use crate::progress::ProgressBoard;

/// Result of one completed asset transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedAsset {
    /// Where the asset was written.
    pub path: PathBuf,
    /// Sum of all chunk lengths written.
    pub bytes_written: u64,
    /// Declared `Content-Length`, when the server sent one.
    pub content_length: Option<u64>,
}

/// Downloads one asset into `folder`, truncating any existing file.
///
/// The body is written in chunks of at most [`CHUNK_SIZE`] bytes as it
/// arrives. When `board` is given, an entry named after the destination path
/// is registered with the response's `Content-Length` as its total and is
/// incremented (and the board redrawn) after every chunk.
///
/// # Errors
///
/// - [`DownloadError::InvalidUrl`] if no filename can be derived
/// - [`DownloadError::HttpStatus`] for non-success responses
/// - [`DownloadError::MissingContentLength`] if progress is on and the header is absent
/// - [`DownloadError::Io`] on file creation or write failure
/// - [`DownloadError::Integrity`] if the byte count disagrees with `Content-Length`
/// - any error from [`HttpClient::fetch`]
#[instrument(skip(client, board), fields(url = %url, folder = %folder.display()))]
pub async fn download_asset(
    client: &HttpClient,
    url: &str,
    folder: &Path,
    board: Option<&ProgressBoard>,
) -> Result<DownloadedAsset, DownloadError> {
    let path = destination_path(folder, url)?;
    debug!(path = %path.display(), "resolved output path");

    let response = client.fetch(url).await?;
    let status = response.status();
    if !status.is_success() {
        return Err(DownloadError::http_status(url, status.as_u16()));
    }

    let content_length = declared_content_length(&response);
    let entry = match board {
        Some(board) => {
            let total =
                content_length.ok_or_else(|| DownloadError::missing_content_length(url))?;
            Some(board.register(path.display().to_string(), total))
        }
        None => None,
    };

    let mut file = File::create(&path)
        .await
        .map_err(|e| DownloadError::io(path.clone(), e))?;

    let bytes_written = stream_to_file(&mut file, response, url, &path, |len| {
        if let Some(entry) = &entry {
            entry.increment(len);
        }
    })
    .await?;

    if let Some(expected) = content_length
        && expected != bytes_written
    {
        return Err(DownloadError::integrity(path, expected, bytes_written));
    }

    info!(path = %path.display(), bytes = bytes_written, "asset saved");

    Ok(DownloadedAsset {
        path,
        bytes_written,
        content_length,
    })
}

/// Streams the response body to `file`, returning the bytes written.
///
/// `on_chunk` is called with the length of every piece written, never more
/// than [`CHUNK_SIZE`].
async fn stream_to_file(
    file: &mut File,
    response: reqwest::Response,
    url: &str,
    file_path: &Path,
    mut on_chunk: impl FnMut(u64),
) -> Result<u64, DownloadError> {
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| DownloadError::from_reqwest(url, e))?;

        for piece in chunk.chunks(CHUNK_SIZE) {
            file.write_all(piece)
                .await
                .map_err(|e| DownloadError::io(file_path.to_path_buf(), e))?;

            let len = piece.len() as u64;
            bytes_written += len;
            on_chunk(len);
        }
    }

    file.flush()
        .await
        .map_err(|e| DownloadError::io(file_path.to_path_buf(), e))?;

    Ok(bytes_written)
}

fn declared_content_length(response: &reqwest::Response) -> Option<u64> {
    response
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::download::ThrottlePolicy;
    use crate::output::{CaptureBuffer, Console};
    use crate::test_support::socket_guard::start_mock_server_or_skip;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, ResponseTemplate};

    fn client() -> HttpClient {
        HttpClient::with_throttle_policy(ThrottlePolicy::new(Duration::from_millis(20), None))
    }

    #[tokio::test]
    async fn test_download_asset_writes_file_under_derived_name() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        let temp_dir = TempDir::new().unwrap();
        Mock::given(method("GET"))
            .and(path("/full/pk/wallhaven-pkgkkp.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"png bytes".to_vec()))
            .mount(&mock_server)
            .await;

        let url = format!("{}/full/pk/wallhaven-pkgkkp.png", mock_server.uri());
        let asset = download_asset(&client(), &url, temp_dir.path(), None)
            .await
            .unwrap();

        assert_eq!(asset.path, temp_dir.path().join("pkgkkp.png"));
        assert_eq!(std::fs::read(&asset.path).unwrap(), b"png bytes");
        assert_eq!(asset.bytes_written, 9);
    }

    #[tokio::test]
    async fn test_download_asset_chunks_sum_to_content_length_and_fill_board() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        let temp_dir = TempDir::new().unwrap();
        let body: Vec<u8> = (0..50_000u32).map(|i| (i % 251) as u8).collect();
        Mock::given(method("GET"))
            .and(path("/full/ab/wallhaven-big.jpg"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body.clone()))
            .mount(&mock_server)
            .await;

        let buffer = CaptureBuffer::new();
        let board = ProgressBoard::new(Console::with_writer(buffer.clone(), false));
        let url = format!("{}/full/ab/wallhaven-big.jpg", mock_server.uri());

        let asset = download_asset(&client(), &url, temp_dir.path(), Some(&board))
            .await
            .unwrap();

        assert_eq!(asset.content_length, Some(50_000));
        assert_eq!(asset.bytes_written, 50_000);
        assert_eq!(std::fs::metadata(&asset.path).unwrap().len(), 50_000);
        assert_eq!(std::fs::read(&asset.path).unwrap(), body);

        let entries = board.snapshot();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].total, 50_000);
        assert_eq!(entries[0].current, 50_000);
        let out = buffer.contents();
        assert!(out.contains("| 100%"));

        // One render per increment; every render after the first moves up one line.
        let renders = out.matches("\x1b[1F").count() + 1;
        assert!(
            renders >= 50_000_usize.div_ceil(CHUNK_SIZE),
            "only {renders} renders for 50000 bytes"
        );
    }

    #[tokio::test]
    async fn test_stream_to_file_reports_bounded_chunks() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        let temp_dir = TempDir::new().unwrap();
        let body: Vec<u8> = (0..100_003u32).map(|i| (i % 253) as u8).collect();
        Mock::given(method("GET"))
            .and(path("/full/cc/wallhaven-chunks.jpg"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body.clone()))
            .mount(&mock_server)
            .await;

        let url = format!("{}/full/cc/wallhaven-chunks.jpg", mock_server.uri());
        let response = client().fetch(&url).await.unwrap();
        let file_path = temp_dir.path().join("chunks.jpg");
        let mut file = File::create(&file_path).await.unwrap();

        let mut pieces = Vec::new();
        let written = stream_to_file(&mut file, response, &url, &file_path, |len| {
            pieces.push(len);
        })
        .await
        .unwrap();

        assert_eq!(written, 100_003);
        assert_eq!(pieces.iter().sum::<u64>(), 100_003);
        assert!(pieces.len() >= body.len().div_ceil(CHUNK_SIZE));
        assert!(
            pieces.iter().all(|&len| len > 0 && len <= CHUNK_SIZE as u64),
            "oversized piece in {pieces:?}"
        );
        assert_eq!(std::fs::read(&file_path).unwrap(), body);
    }

    #[tokio::test]
    async fn test_download_asset_keeps_encoded_body_and_length_with_board() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        let temp_dir = TempDir::new().unwrap();
        let body = b"\x1f\x8b stored exactly as sent".to_vec();
        Mock::given(method("GET"))
            .and(path("/full/gz/wallhaven-packed.png"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-encoding", "gzip")
                    .set_body_bytes(body.clone()),
            )
            .mount(&mock_server)
            .await;

        let board = ProgressBoard::new(Console::with_writer(CaptureBuffer::new(), false));
        let url = format!("{}/full/gz/wallhaven-packed.png", mock_server.uri());
        let asset = download_asset(&client(), &url, temp_dir.path(), Some(&board))
            .await
            .unwrap();

        assert_eq!(asset.content_length, Some(body.len() as u64));
        assert_eq!(asset.bytes_written, body.len() as u64);
        assert_eq!(std::fs::read(&asset.path).unwrap(), body);
        assert_eq!(board.snapshot()[0].current, body.len() as u64);
    }

    #[tokio::test]
    async fn test_download_asset_http_error_creates_no_file() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        let temp_dir = TempDir::new().unwrap();
        Mock::given(method("GET"))
            .and(path("/full/zz/wallhaven-gone.png"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let url = format!("{}/full/zz/wallhaven-gone.png", mock_server.uri());
        let result = download_asset(&client(), &url, temp_dir.path(), None).await;

        assert!(matches!(
            result,
            Err(DownloadError::HttpStatus { status: 404, .. })
        ));
        assert!(!temp_dir.path().join("gone.png").exists());
    }

    #[tokio::test]
    async fn test_download_asset_overwrites_existing_file() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("abc.png"), b"an older and longer file").unwrap();
        Mock::given(method("GET"))
            .and(path("/wallhaven-abc.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"new".to_vec()))
            .mount(&mock_server)
            .await;

        let url = format!("{}/wallhaven-abc.png", mock_server.uri());
        download_asset(&client(), &url, temp_dir.path(), None)
            .await
            .unwrap();

        assert_eq!(std::fs::read(temp_dir.path().join("abc.png")).unwrap(), b"new");
    }

    #[test]
    fn test_download_asset_invalid_url_fails_before_request() {
        let temp_dir = TempDir::new().unwrap();
        let client = client();
        let result =
            tokio_test::block_on(download_asset(&client, "not-a-url", temp_dir.path(), None));
        assert!(matches!(result, Err(DownloadError::InvalidUrl { .. })));
    }

    #[tokio::test]
    async fn test_download_asset_missing_folder_is_io_error() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };
        let temp_dir = TempDir::new().unwrap();
        Mock::given(method("GET"))
            .and(path("/wallhaven-x.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"x".to_vec()))
            .mount(&mock_server)
            .await;

        let folder = temp_dir.path().join("does-not-exist");
        let url = format!("{}/wallhaven-x.png", mock_server.uri());
        let result = download_asset(&client(), &url, &folder, None).await;

        assert!(matches!(result, Err(DownloadError::Io { .. })));
    }
}
