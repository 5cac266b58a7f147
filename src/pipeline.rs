// src/pipeline.rs
//! Capability traits for the two ends of a transfer.
//!
//! The content end is defined here; the document end is
//! [`DocumentStore`](crate::docs::DocumentStore). Each can be faked in tests.

use crate::api::{PageBundle, PageFetcher};
use crate::error::AppError;
use crate::model::Page;
use crate::types::{NotionId, PageId};

/// Retrieves Notion pages ready for compilation.
#[async_trait::async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch_page(&self, id: &PageId) -> Result<PageBundle, AppError>;

    /// Row pages of a database, without their blocks.
    async fn database_rows(&self, database: &NotionId) -> Result<Vec<Page>, AppError>;
}

#[async_trait::async_trait]
impl ContentSource for PageFetcher {
    async fn fetch_page(&self, id: &PageId) -> Result<PageBundle, AppError> {
        self.fetch(id).await
    }

    async fn database_rows(&self, database: &NotionId) -> Result<Vec<Page>, AppError> {
        self.rows(database).await
    }
}
