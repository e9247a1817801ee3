//! Object storage trait.

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// The hosted object store: put bytes, get a public URL back.
#[async_trait]
pub trait ObjectStore: Send + Sync + std::fmt::Debug + 'static {
    /// Upload an object and return its public URL.
    async fn put(&self, path: &str, data: Bytes) -> AppResult<String>;

    /// Remove an object.
    async fn remove(&self, path: &str) -> AppResult<()>;
}
