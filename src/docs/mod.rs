// src/docs/mod.rs
//! Google Docs side: the operation vocabulary, document snapshots and the
//! stores that apply operations.

pub mod buffer;
pub mod client;
pub mod operation;
pub mod snapshot;
pub mod style;

pub use buffer::{DocumentBuffer, ParagraphMark};
pub use client::DocsHttpClient;
pub use operation::{batch_update_body, BulletPreset, Operation, Range};
pub use snapshot::{DocumentSnapshot, ParagraphText};
pub use style::{NamedStyle, ParagraphStyle, RgbColor, TextStyle};

use crate::error::AppError;
use crate::types::DocumentId;
use parking_lot::Mutex;
use std::collections::HashMap;

/// Length of `text` in the units Google Docs indexes by.
pub fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// What a successful `batchUpdate` reports back.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmitReceipt {
    /// Revision the document reached, when the service reports one.
    pub revision_id: Option<String>,
}

/// A destination document service.
///
/// A submitted batch is applied atomically or not at all. Concurrent
/// writers to overlapping ranges of one document are not coordinated.
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    async fn snapshot(&self, document: &DocumentId) -> Result<DocumentSnapshot, AppError>;
    async fn submit(
        &self,
        document: &DocumentId,
        operations: &[Operation],
    ) -> Result<SubmitReceipt, AppError>;
}

/// Documents held in memory as [`DocumentBuffer`]s.
///
/// Used by the tests; unknown documents start out empty.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    documents: Mutex<HashMap<DocumentId, DocumentBuffer>>,
    batches: Mutex<Vec<usize>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds `document` with existing content.
    pub fn insert(&self, document: DocumentId, buffer: DocumentBuffer) {
        self.documents.lock().insert(document, buffer);
    }

    /// Current state of `document`.
    pub fn buffer(&self, document: &DocumentId) -> DocumentBuffer {
        self.documents
            .lock()
            .get(document)
            .cloned()
            .unwrap_or_default()
    }

    /// Operation count of every accepted batch, in submission order.
    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batches.lock().clone()
    }
}

#[async_trait::async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn snapshot(&self, document: &DocumentId) -> Result<DocumentSnapshot, AppError> {
        Ok(self.buffer(document).snapshot(document.as_str()))
    }

    async fn submit(
        &self,
        document: &DocumentId,
        operations: &[Operation],
    ) -> Result<SubmitReceipt, AppError> {
        let mut documents = self.documents.lock();
        let buffer = documents.entry(document.clone()).or_default();
        buffer.apply_all(operations)?;
        self.batches.lock().push(operations.len());
        Ok(SubmitReceipt {
            revision_id: Some(buffer.revision_id()),
        })
    }
}
