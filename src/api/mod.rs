// src/api/mod.rs
//! Notion API interaction: the ability to read pages, blocks and rows.
//!
//! HTTP, parsing and conversion to the domain model are kept apart;
//! everything above this module depends only on [`NotionRepository`].

pub mod cache;
pub mod client;
pub mod fetcher;
pub mod notion_client_adapter;
pub mod parser;
mod responses;
mod simple_pagination;

use crate::error::AppError;
use crate::model::{Block, Page};
use crate::types::NotionId;

/// The ability to retrieve content from a Notion workspace.
///
/// Business logic depends on this trait, never on HTTP details.
#[async_trait::async_trait]
pub trait NotionRepository: Send + Sync {
    async fn retrieve_page(&self, id: &NotionId) -> Result<Page, AppError>;
    /// Direct children of a page or block, in order, without their own
    /// children filled in.
    async fn retrieve_children(&self, parent: &NotionId) -> Result<Vec<Block>, AppError>;
    async fn query_rows(&self, database: &NotionId) -> Result<Vec<Page>, AppError>;
}

pub use cache::{CachedNotionClient, DiskCache};
pub use client::NotionHttpClient;
pub use fetcher::{PageBundle, PageFetcher};
pub use responses::PaginatedResponse;
