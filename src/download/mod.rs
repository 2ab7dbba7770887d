//! File downloads with progress reporting.
//!
//! Streams a remote file to a destination directory under a sanitized
//! filename, invoking a progress callback per chunk. No resume and no
//! collision handling beyond the sanitized name itself.

#[cfg(test)]
mod tests;

use crate::core::parse_error_response;
use futures::StreamExt;
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::io::AsyncWriteExt;

#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("middleware error: {0}")]
    Middleware(#[from] reqwest_middleware::Error),
    #[error("API error: {0}")]
    Api(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub struct DownloadService {
    client: ClientWithMiddleware,
}

impl DownloadService {
    pub fn new() -> Self {
        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(3);

        Self {
            client: ClientBuilder::new(Client::new())
                .with(RetryTransientMiddleware::new_with_policy(retry_policy))
                .build(),
        }
    }

    /// Streams `url` into `dest_dir` under [`generate_filename`]`(title, url)`.
    ///
    /// `progress` is called after every chunk with the bytes written so far
    /// and the total size when the server reported one.
    pub async fn download<F>(
        &self,
        url: &str,
        dest_dir: &Path,
        title: &str,
        progress: F,
    ) -> Result<PathBuf, DownloadError>
    where
        F: Fn(u64, Option<u64>),
    {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(DownloadError::Api(
                parse_error_response(response, "Download failed").await,
            ));
        }

        let total = response.content_length();
        let path = dest_dir.join(generate_filename(title, url));

        let mut file = tokio::fs::File::create(&path).await?;
        let mut stream = response.bytes_stream();
        let mut written: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk: bytes::Bytes = chunk?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
            progress(written, total);
        }
        file.flush().await?;

        tracing::info!(path = %path.display(), bytes = written, "download complete");
        Ok(path)
    }
}

impl Default for DownloadService {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds a safe filename from a human title and the source URL.
///
/// Characters outside `[A-Za-z0-9 _-]` are stripped, runs of whitespace
/// become a single underscore, and the extension is taken from the URL path
/// (`bin` when it has none).
pub fn generate_filename(title: &str, url: &str) -> String {
    let stem: String = title
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ' || *c == '_' || *c == '-')
        .collect();
    let stem = stem.split_whitespace().collect::<Vec<_>>().join("_");
    let stem = if stem.is_empty() { "download".to_string() } else { stem };

    format!("{}.{}", stem, extension_from_url(url))
}

fn extension_from_url(raw: &str) -> String {
    let ext = url::Url::parse(raw)
        .ok()
        .and_then(|u| {
            u.path()
                .rsplit('/')
                .next()
                .and_then(|segment| segment.rsplit_once('.'))
                .map(|(_, ext)| ext.to_string())
        })
        .unwrap_or_default();

    let valid = !ext.is_empty()
        && ext.len() <= 5
        && ext.chars().all(|c| c.is_ascii_alphanumeric());
    if valid {
        ext.to_ascii_lowercase()
    } else {
        "bin".to_string()
    }
}
