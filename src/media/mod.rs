//! Media metadata CRUD over the `media` collection.

pub mod models;


use self::models::{MediaFile, MediaFilter, MediaKind, MediaStats, MediaUpdate, NewMediaFile};
use crate::store::query::{Direction, FieldOp, Query};
use crate::store::{DocumentStore, StoreError};
use chrono::Utc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MediaError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub struct MediaService {
    store: DocumentStore,
}

impl MediaService {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    /// Lists media documents, most recent upload first.
    pub async fn list(&self, filter: MediaFilter) -> Result<Vec<MediaFile>, MediaError> {
        let mut query = Query::collection("media");
        if let Some(kind) = filter.kind {
            query = query.filter("type", FieldOp::Equal, kind)?;
        }
        if let Some(category) = &filter.category {
            query = query.filter("category", FieldOp::Equal, category)?;
        }
        if !filter.include_inactive {
            query = query.filter("isActive", FieldOp::Equal, true)?;
        }
        query = query.order_by("uploadedAt", Direction::Descending);

        let hits = self.store.query::<MediaFile>(query).await?;
        Ok(hits
            .into_iter()
            .map(|hit| MediaFile {
                id: hit.id,
                ..hit.data
            })
            .collect())
    }

    pub async fn get(&self, id: &str) -> Result<Option<MediaFile>, MediaError> {
        let file: Option<MediaFile> = self.store.doc(&format!("media/{}", id)).get().await?;
        Ok(file.map(|data| MediaFile {
            id: id.to_string(),
            ..data
        }))
    }

    /// Adds a media document and returns it with the server-assigned id.
    pub async fn create(&self, new: NewMediaFile) -> Result<MediaFile, MediaError> {
        if new.name.trim().is_empty() {
            return Err(MediaError::InvalidInput("media name is required".into()));
        }

        let file = MediaFile {
            id: String::new(),
            name: new.name,
            kind: new.kind,
            url: new.url,
            size: new.size,
            uploaded_at: Utc::now().to_rfc3339(),
            category: new.category,
            tags: new.tags,
            uploaded_by: new.uploaded_by,
            is_active: true,
        };

        let doc = self.store.collection("media").add(&file).await?;
        tracing::info!(id = %doc.id(), name = %file.name, "media created");
        Ok(MediaFile {
            id: doc.id().to_string(),
            ..file
        })
    }

    pub async fn update(&self, id: &str, update: MediaUpdate) -> Result<(), MediaError> {
        let mask = update.field_mask();
        if mask.is_empty() {
            return Err(MediaError::InvalidInput("no media fields to update".into()));
        }
        self.store
            .doc(&format!("media/{}", id))
            .update(&update, &mask)
            .await?;
        Ok(())
    }

    /// Hard delete of the metadata document. The underlying binary in object
    /// storage is the storage service's concern.
    pub async fn delete(&self, id: &str) -> Result<(), MediaError> {
        self.store.doc(&format!("media/{}", id)).delete().await?;
        tracing::info!(%id, "media deleted");
        Ok(())
    }

    /// Soft delete: hides the file from default listings.
    pub async fn deactivate(&self, id: &str) -> Result<(), MediaError> {
        self.store
            .doc(&format!("media/{}", id))
            .update(&serde_json::json!({ "isActive": false }), &["isActive"])
            .await
            .map_err(MediaError::from)?;
        Ok(())
    }

    /// Counts over the currently active media set.
    pub async fn stats(&self) -> Result<MediaStats, MediaError> {
        let files = self.list(MediaFilter::default()).await?;
        Ok(compute_stats(&files))
    }
}

pub(crate) fn compute_stats(files: &[MediaFile]) -> MediaStats {
    let mut stats = MediaStats {
        total_files: files.len(),
        ..Default::default()
    };
    for file in files {
        match file.kind {
            MediaKind::Image => stats.images += 1,
            MediaKind::Video => stats.videos += 1,
            MediaKind::Audio => stats.audio += 1,
        }
        stats.total_size += file.size;
    }
    stats
}
