//! Firestore REST client.
//!
//! Thin document verbs over the Firestore v1 API: get/set/update/delete on
//! documents, add on collections and structured queries. Requests carry the
//! signed-in user's ID token via [`TokenMiddleware`]; the backend's security
//! rules are the authorization layer.

pub mod query;
pub mod value;


use self::query::Query;
use self::value::{to_fields, Document};
use crate::core::middleware::{TokenMiddleware, TokenStore};
use crate::core::parse_error_response;
use reqwest::{header, Client};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const FIRESTORE_V1_API: &str =
    "https://firestore.googleapis.com/v1/projects/{project_id}/databases/(default)/documents";

/// Errors that can occur during document store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("middleware error: {0}")]
    Middleware(#[from] reqwest_middleware::Error),
    #[error("API error: {0}")]
    Api(String),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Client for the app's Firestore database.
#[derive(Clone)]
pub struct DocumentStore {
    client: ClientWithMiddleware,
    base_url: String,
}

/// A decoded query row together with its document id.
#[derive(Debug, Clone)]
pub struct QueryHit<T> {
    pub id: String,
    pub data: T,
}

fn build_client(tokens: TokenStore) -> ClientWithMiddleware {
    let retry_policy = ExponentialBackoff::builder().build_with_max_retries(3);

    ClientBuilder::new(Client::new())
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .with(TokenMiddleware::new(tokens))
        .build()
}

impl DocumentStore {
    pub fn new(tokens: TokenStore, project_id: &str) -> Self {
        Self {
            client: build_client(tokens),
            base_url: FIRESTORE_V1_API.replace("{project_id}", project_id),
        }
    }

    /// Creates a store pointed at a custom base URL (useful for testing).
    pub fn with_base_url(tokens: TokenStore, base_url: String) -> Self {
        Self {
            client: build_client(tokens),
            base_url,
        }
    }

    pub fn collection(&self, collection_id: &str) -> CollectionRef<'_> {
        CollectionRef {
            client: &self.client,
            path: format!("{}/{}", self.base_url, collection_id),
        }
    }

    /// A reference to the document at the slash-separated path,
    /// e.g. `users/abc123`.
    pub fn doc(&self, document_path: &str) -> DocumentRef<'_> {
        DocumentRef {
            client: &self.client,
            path: format!("{}/{}", self.base_url, document_path),
        }
    }

    /// Runs a structured query and decodes every matched document.
    pub async fn query<T: DeserializeOwned>(
        &self,
        query: Query,
    ) -> Result<Vec<QueryHit<T>>, StoreError> {
        let url = format!("{}:runQuery", self.base_url);
        let body = serde_json::to_vec(&serde_json::json!({
            "structuredQuery": query.structured()
        }))?;

        let response = self
            .client
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StoreError::Api(
                parse_error_response(response, "Run query failed").await,
            ));
        }

        let rows: Vec<RunQueryRow> = response.json().await?;

        let mut hits = Vec::new();
        for row in rows {
            // Rows without a document carry only a read time.
            if let Some(doc) = row.document {
                let id = doc.id().to_string();
                hits.push(QueryHit {
                    id,
                    data: doc.decode()?,
                });
            }
        }
        Ok(hits)
    }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct RunQueryRow {
    document: Option<Document>,
    #[allow(dead_code)]
    read_time: Option<String>,
}

pub struct CollectionRef<'a> {
    client: &'a ClientWithMiddleware,
    path: String,
}

impl<'a> CollectionRef<'a> {
    pub fn doc(&self, document_id: &str) -> DocumentRef<'a> {
        DocumentRef {
            client: self.client,
            path: format!("{}/{}", self.path, document_id),
        }
    }

    /// Adds a document with a server-assigned id and returns it.
    pub async fn add<T: Serialize>(&self, value: &T) -> Result<Document, StoreError> {
        let fields = to_fields(value)?;
        let body = serde_json::to_vec(&serde_json::json!({ "fields": fields }))?;

        let response = self
            .client
            .post(&self.path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StoreError::Api(
                parse_error_response(response, "Add document failed").await,
            ));
        }

        Ok(response.json().await?)
    }
}

pub struct DocumentRef<'a> {
    client: &'a ClientWithMiddleware,
    path: String,
}

impl<'a> DocumentRef<'a> {
    /// Fetches and decodes the document, `None` when it does not exist.
    pub async fn get<T: DeserializeOwned>(&self) -> Result<Option<T>, StoreError> {
        let response = self.client.get(&self.path).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            return Err(StoreError::Api(
                parse_error_response(response, "Get document failed").await,
            ));
        }

        let doc: Document = response.json().await?;
        Ok(Some(doc.decode()?))
    }

    /// Writes the full document, creating it if necessary.
    pub async fn set<T: Serialize>(&self, value: &T) -> Result<(), StoreError> {
        let fields = to_fields(value)?;
        let body = serde_json::to_vec(&serde_json::json!({ "fields": fields }))?;

        let response = self
            .client
            .patch(&self.path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StoreError::Api(
                parse_error_response(response, "Set document failed").await,
            ));
        }

        Ok(())
    }

    /// Patches only the fields named in the mask, leaving the rest intact.
    pub async fn update<T: Serialize>(
        &self,
        value: &T,
        mask: &[&str],
    ) -> Result<(), StoreError> {
        let fields = to_fields(value)?;
        let body = serde_json::to_vec(&serde_json::json!({ "fields": fields }))?;

        let params: Vec<(&str, &str)> = mask
            .iter()
            .map(|field| ("updateMask.fieldPaths", *field))
            .collect();

        let response = self
            .client
            .patch(&self.path)
            .query(&params)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StoreError::Api(
                parse_error_response(response, "Update document failed").await,
            ));
        }

        Ok(())
    }

    pub async fn delete(&self) -> Result<(), StoreError> {
        let response = self.client.delete(&self.path).send().await?;

        if !response.status().is_success() {
            return Err(StoreError::Api(
                parse_error_response(response, "Delete document failed").await,
            ));
        }

        Ok(())
    }
}
