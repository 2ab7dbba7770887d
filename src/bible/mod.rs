//! Bible text service.
//!
//! Book and translation lists are hardcoded constants; chapter text comes
//! from a public REST API (`GET /<book>+<chapter>?translation=<id>`), no
//! authentication. Verse search is not implemented and deliberately returns
//! an empty result rather than an error.

pub mod books;

#[cfg(test)]
mod tests;

use self::books::{find_book, find_translation, BOOKS, TRANSLATIONS};
pub use self::books::{BibleBook, Testament, Translation};
use crate::core::parse_error_response;
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use serde::Deserialize;
use thiserror::Error;

const BIBLE_API: &str = "https://bible-api.com";

#[derive(Error, Debug)]
pub enum BibleError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("middleware error: {0}")]
    Middleware(#[from] reqwest_middleware::Error),
    #[error("API error: {0}")]
    Api(String),
    #[error("unknown book: {0}")]
    UnknownBook(String),
    #[error("unknown translation: {0}")]
    UnknownTranslation(String),
    #[error("{book} has {max} chapters, requested chapter {requested}")]
    ChapterOutOfRange {
        book: &'static str,
        max: u32,
        requested: u32,
    },
}

/// One verse of chapter text as returned by the public API.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Verse {
    pub book_id: String,
    pub book_name: String,
    pub chapter: u32,
    pub verse: u32,
    pub text: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Chapter {
    pub reference: String,
    pub verses: Vec<Verse>,
    pub translation_id: String,
}

pub struct BibleService {
    client: ClientWithMiddleware,
    base_url: String,
}

impl BibleService {
    pub fn new() -> Self {
        Self::with_base_url(BIBLE_API.to_string())
    }

    /// As `new`, with the API base URL overridden for tests.
    pub fn with_base_url(base_url: String) -> Self {
        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(3);

        let client = ClientBuilder::new(Client::new())
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Self { client, base_url }
    }

    pub fn books(&self) -> &'static [BibleBook] {
        BOOKS
    }

    pub fn book(&self, id: &str) -> Option<&'static BibleBook> {
        find_book(id)
    }

    pub fn translations(&self) -> &'static [Translation] {
        TRANSLATIONS
    }

    /// Fetches one chapter of text.
    ///
    /// Book id, chapter range and translation are validated locally before
    /// any request goes out.
    pub async fn chapter(
        &self,
        book_id: &str,
        chapter: u32,
        translation: &str,
    ) -> Result<Chapter, BibleError> {
        let book =
            find_book(book_id).ok_or_else(|| BibleError::UnknownBook(book_id.to_string()))?;
        if chapter == 0 || chapter > book.chapters {
            return Err(BibleError::ChapterOutOfRange {
                book: book.name,
                max: book.chapters,
                requested: chapter,
            });
        }
        let translation = find_translation(translation)
            .ok_or_else(|| BibleError::UnknownTranslation(translation.to_string()))?;

        // The API addresses chapters as "Book+Name+<chapter>".
        let reference = format!("{}+{}", book.name.replace(' ', "+"), chapter);
        let url = format!("{}/{}", self.base_url, reference);

        let response = self
            .client
            .get(&url)
            .query(&[("translation", translation.id)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(BibleError::Api(
                parse_error_response(response, "Chapter fetch failed").await,
            ));
        }

        Ok(response.json().await?)
    }

    /// Verse search is not implemented; always resolves to an empty list.
    pub async fn search_verses(&self, query: &str) -> Result<Vec<Verse>, BibleError> {
        tracing::debug!(%query, "verse search not implemented; returning no results");
        Ok(Vec::new())
    }
}

impl Default for BibleService {
    fn default() -> Self {
        Self::new()
    }
}
