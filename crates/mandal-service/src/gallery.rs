//! Gallery service: uploads to object storage plus the listing rows.

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use serde_json::json;
use tracing::info;

use mandal_core::traits::{ObjectStore, RowStore};
use mandal_core::types::filter::TableFilter;
use mandal_core::{AppError, AppResult};
use mandal_entity::{GalleryItem, gallery};

/// Community photo gallery over the hosted object store.
#[derive(Debug, Clone)]
pub struct GalleryService {
    rows: Arc<dyn RowStore>,
    objects: Arc<dyn ObjectStore>,
}

impl GalleryService {
    /// A gallery over the given row and object stores.
    pub fn new(rows: Arc<dyn RowStore>, objects: Arc<dyn ObjectStore>) -> Self {
        Self { rows, objects }
    }

    /// All gallery items, newest first.
    pub async fn list(&self) -> AppResult<Vec<GalleryItem>> {
        let rows = self.rows.select(&GalleryItem::list_filter()).await?;
        rows.iter().map(|row| row.decode()).collect()
    }

    /// Upload a photo: store the bytes, then record the public URL.
    ///
    /// The object path is prefixed with an upload timestamp so repeated
    /// file names cannot overwrite each other.
    pub async fn upload(
        &self,
        file_name: &str,
        data: Bytes,
        caption: Option<&str>,
    ) -> AppResult<GalleryItem> {
        if file_name.trim().is_empty() {
            return Err(AppError::validation("File name is required"));
        }
        if data.is_empty() {
            return Err(AppError::validation("File is empty"));
        }
        let path = format!("{}-{}", Utc::now().timestamp_millis(), file_name.trim());
        let url = self.objects.put(&path, data).await?;
        info!(path, "Gallery object stored");
        let row = self
            .rows
            .insert(
                gallery::TABLE,
                json!({ "url": url, "path": path, "caption": caption }),
            )
            .await?;
        row.decode()
    }

    /// Remove a gallery item: the row first, then the stored object.
    pub async fn remove(&self, item: &GalleryItem) -> AppResult<()> {
        self.rows
            .delete(&TableFilter::table(gallery::TABLE).eq("id", item.id.to_string()))
            .await?;
        self.objects.remove(&item.path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mandal_provider::memory::{MemoryObjectStore, MemoryRowStore};

    fn service() -> (Arc<MemoryObjectStore>, GalleryService) {
        let rows = Arc::new(MemoryRowStore::new());
        let objects = Arc::new(MemoryObjectStore::new());
        let service = GalleryService::new(
            rows as Arc<dyn RowStore>,
            Arc::clone(&objects) as Arc<dyn ObjectStore>,
        );
        (objects, service)
    }

    #[tokio::test]
    async fn test_upload_stores_object_and_row_with_public_url() {
        let (objects, service) = service();
        let item = service
            .upload("aarti.jpg", Bytes::from_static(b"jpeg"), Some("Evening aarti"))
            .await
            .unwrap();
        assert!(item.url.starts_with("memory://gallery/"));
        assert!(item.path.ends_with("aarti.jpg"));
        assert!(objects.contains(&item.path));
    }

    #[tokio::test]
    async fn test_remove_deletes_row_and_object() {
        let (objects, service) = service();
        let item = service
            .upload("aarti.jpg", Bytes::from_static(b"jpeg"), None)
            .await
            .unwrap();
        service.remove(&item).await.unwrap();
        assert!(service.list().await.unwrap().is_empty());
        assert!(!objects.contains(&item.path));
    }

    #[tokio::test]
    async fn test_empty_upload_is_rejected() {
        let (objects, service) = service();
        let err = service.upload("a.jpg", Bytes::new(), None).await.unwrap_err();
        assert_eq!(err.kind, mandal_core::ErrorKind::Validation);
        assert!(objects.is_empty());
    }
}
