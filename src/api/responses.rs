// src/api/responses.rs
//! Response envelopes, parsed with notion-client's serde types.

use crate::error::AppError;
use crate::model::{Block, Page};
use serde::{Deserialize, Serialize};

pub use notion_client::objects::{
    block::Block as NotionBlock, error::Error as NotionError, page::Page as NotionPage,
};

/// One page of a paginated list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub object: String,
    pub results: Vec<T>,
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

impl<T> PaginatedResponse<T> {
    /// Converts every result, keeping the cursor.
    pub fn try_map<U>(
        self,
        convert: impl FnMut(T) -> Result<U, AppError>,
    ) -> Result<PaginatedResponse<U>, AppError> {
        Ok(PaginatedResponse {
            object: self.object,
            results: self.results.into_iter().map(convert).collect::<Result<_, _>>()?,
            next_cursor: self.next_cursor,
            has_more: self.has_more,
        })
    }
}

/// Database query response
pub type QueryDatabaseResponse = PaginatedResponse<NotionPage>;

/// Block children response
pub type RetrieveBlockChildrenResponse = PaginatedResponse<NotionBlock>;

/// Conversion from notion-client types into the domain model.
pub trait ToDomain<T> {
    fn to_domain(self) -> Result<T, AppError>;
}

impl ToDomain<Page> for NotionPage {
    fn to_domain(self) -> Result<Page, AppError> {
        super::notion_client_adapter::convert_page(self)
    }
}

impl ToDomain<Block> for NotionBlock {
    fn to_domain(self) -> Result<Block, AppError> {
        super::notion_client_adapter::convert_block(self)
    }
}
