//! Object storage adapter.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Method;

use mandal_core::traits::ObjectStore;
use mandal_core::{AppError, AppResult};

use super::client::ProviderClient;

/// [`ObjectStore`] implementation over the hosted storage API.
///
/// Objects land in the configured gallery bucket; the bucket is public,
/// so the returned URL needs no signing.
#[derive(Debug)]
pub struct HttpObjectStore {
    client: ProviderClient,
    bucket: String,
}

impl HttpObjectStore {
    /// Build the adapter over a shared provider client.
    pub fn new(client: ProviderClient) -> Self {
        let bucket = client.config().gallery_bucket.clone();
        Self { client, bucket }
    }

    fn public_url(&self, path: &str) -> String {
        self.client
            .endpoint(&format!("storage/v1/object/public/{}/{path}", self.bucket))
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn put(&self, path: &str, data: Bytes) -> AppResult<String> {
        let url = self
            .client
            .endpoint(&format!("storage/v1/object/{}/{path}", self.bucket));
        let response = self
            .client
            .request(Method::POST, &url)
            .await
            .body(data)
            .send()
            .await
            .map_err(|e| AppError::provider(e.to_string()))?;
        self.client.check(response).await?;
        Ok(self.public_url(path))
    }

    async fn remove(&self, path: &str) -> AppResult<()> {
        let url = self
            .client
            .endpoint(&format!("storage/v1/object/{}/{path}", self.bucket));
        let response = self
            .client
            .request(Method::DELETE, &url)
            .await
            .send()
            .await
            .map_err(|e| AppError::provider(e.to_string()))?;
        self.client.check(response).await.map(|_| ())
    }
}
