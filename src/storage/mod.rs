//! Object storage uploads for images and media binaries.
//!
//! Thin wrapper over the Firebase Storage REST surface. Uploads land under
//! fixed path prefixes (`profile-images/`, `content-images/<kind>/`,
//! `thumbnails/`) and return a public download URL. No dedup, no checksums,
//! no resumable uploads.

#[cfg(test)]
mod tests;

use crate::core::middleware::{TokenMiddleware, TokenStore};
use crate::core::parse_error_response;
use chrono::Utc;
use reqwest::{header, Client};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use thiserror::Error;

const STORAGE_V0_API: &str = "https://firebasestorage.googleapis.com/v0";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("middleware error: {0}")]
    Middleware(#[from] reqwest_middleware::Error),
    #[error("API error: {0}")]
    Api(String),
}

pub struct StorageService {
    client: ClientWithMiddleware,
    base_url: String,
    bucket: String,
}

impl StorageService {
    pub fn new(tokens: TokenStore, bucket: &str) -> Self {
        Self::with_base_url(tokens, STORAGE_V0_API.to_string(), bucket)
    }

    /// As `new`, with the API base URL overridden for tests.
    pub fn with_base_url(tokens: TokenStore, base_url: String, bucket: &str) -> Self {
        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(3);

        let client = ClientBuilder::new(Client::new())
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .with(TokenMiddleware::new(tokens))
            .build();

        Self {
            client,
            base_url,
            bucket: bucket.to_string(),
        }
    }

    /// Uploads a user's profile image under `profile-images/` and returns
    /// its public URL. One object per user; a re-upload replaces it.
    pub async fn upload_profile_image(
        &self,
        uid: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError> {
        let path = format!("profile-images/{}.{}", uid, extension_for(content_type));
        self.upload(&path, bytes, content_type).await
    }

    /// Uploads a content image under `content-images/<kind>/`. Object names
    /// are timestamped, so repeated uploads of the same name do not collide.
    pub async fn upload_content_image(
        &self,
        kind: &str,
        name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError> {
        let path = format!(
            "content-images/{}/{}_{}",
            kind,
            Utc::now().timestamp_millis(),
            name
        );
        self.upload(&path, bytes, content_type).await
    }

    /// Uploads a thumbnail under `thumbnails/` with a timestamped name.
    pub async fn upload_thumbnail(
        &self,
        name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError> {
        let path = format!("thumbnails/{}_{}", Utc::now().timestamp_millis(), name);
        self.upload(&path, bytes, content_type).await
    }

    /// Uploads raw bytes to the given object path and returns the public
    /// download URL.
    pub async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, StorageError> {
        let url = format!("{}/b/{}/o", self.base_url, self.bucket);

        let response = self
            .client
            .post(&url)
            .query(&[("uploadType", "media"), ("name", path)])
            .header(header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StorageError::Api(
                parse_error_response(response, "Upload failed").await,
            ));
        }

        tracing::info!(%path, "object uploaded");
        Ok(self.download_url(path))
    }

    pub async fn delete(&self, path: &str) -> Result<(), StorageError> {
        let url = format!("{}/b/{}/o/{}", self.base_url, self.bucket, encode_name(path));

        let response = self.client.delete(&url).send().await?;

        if !response.status().is_success() {
            return Err(StorageError::Api(
                parse_error_response(response, "Delete failed").await,
            ));
        }

        tracing::info!(%path, "object deleted");
        Ok(())
    }

    /// The public download URL for an object path. Pure construction,
    /// no network call.
    pub fn download_url(&self, path: &str) -> String {
        format!(
            "{}/b/{}/o/{}?alt=media",
            self.base_url,
            self.bucket,
            encode_name(path)
        )
    }
}

// Firebase object names are a single URL segment; slashes in the path must
// be percent-encoded.
fn encode_name(path: &str) -> String {
    url::form_urlencoded::byte_serialize(path.as_bytes()).collect()
}

fn extension_for(content_type: &str) -> &str {
    match content_type {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        _ => content_type.rsplit('/').next().unwrap_or("bin"),
    }
}
