//! Service clients for a church community app.
//!
//! Everything here is a thin async client over managed backends: account and
//! profile management via Firebase Auth and Firestore, admin role
//! management, media metadata CRUD, object storage uploads, Bible text from
//! a public API, and file downloads. An [`App`] is created once with a
//! [`ProjectConfig`] and hands out the per-concern services; they share one
//! token store and one session context.

pub mod admin;
pub mod auth;
pub mod bible;
pub mod core;
pub mod download;
pub mod media;
pub mod session;
pub mod storage;
pub mod store;

use crate::admin::AdminService;
use crate::auth::AuthService;
use crate::bible::BibleService;
use crate::core::middleware::TokenStore;
use crate::download::DownloadService;
use crate::media::MediaService;
use crate::session::Session;
use crate::storage::StorageService;
use crate::store::DocumentStore;
use serde::Deserialize;

/// Backend project settings, supplied by the embedding application.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    pub api_key: String,
    pub project_id: String,
    pub storage_bucket: String,
}

/// Root object wiring the services together.
///
/// Construct once at startup; the services it hands out are cheap to create
/// and share the same [`TokenStore`] and [`Session`].
pub struct App {
    config: ProjectConfig,
    tokens: TokenStore,
    session: Session,
}

impl App {
    pub fn new(config: ProjectConfig) -> Self {
        Self {
            config,
            tokens: TokenStore::new(),
            session: Session::new(),
        }
    }

    pub fn session(&self) -> Session {
        self.session.clone()
    }

    pub fn store(&self) -> DocumentStore {
        DocumentStore::new(self.tokens.clone(), &self.config.project_id)
    }

    pub fn auth(&self) -> AuthService {
        AuthService::new(
            self.config.api_key.clone(),
            self.store(),
            self.tokens.clone(),
            self.session.clone(),
        )
    }

    pub fn admin(&self) -> AdminService {
        AdminService::new(self.store())
    }

    pub fn media(&self) -> MediaService {
        MediaService::new(self.store())
    }

    pub fn storage(&self) -> StorageService {
        StorageService::new(self.tokens.clone(), &self.config.storage_bucket)
    }

    pub fn bible(&self) -> BibleService {
        BibleService::new()
    }

    pub fn downloads(&self) -> DownloadService {
        DownloadService::new()
    }
}
