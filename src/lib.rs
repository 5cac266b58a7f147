// src/lib.rs
//! notion2gdocs library: compiles Notion pages into Google Docs `batchUpdate`
//! operations and places them in a target document.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling**: `AppError`, `ValidationError`
//! - **Configuration**: `CommandLineInput`, `TransferConfig`
//! - **Domain model**: `Page`, `Block`, `BlockCommon`, `PropertyValue`, etc.
//! - **Domain types**: `NotionId`, `PageId`, `BlockId`, `DocumentId`, etc.
//! - **Notion side**: `PageFetcher`, `NotionHttpClient`, `CachedNotionClient`
//! - **Docs side**: `Operation`, `DocumentBuffer`, `DocumentStore`, `DocsHttpClient`
//! - **Compilation**: `compile_page`, `dispatch`, `compile_children`
//! - **Placement**: `find_section`, `plan_placement`, `SectionLedger`
//! - **Orchestration**: `Transfer`, `TransferOptions`, `preview`

pub mod api;
pub mod compiler;
mod config;
pub mod constants;
pub mod docs;
mod error;
mod error_recovery;
pub mod model;
mod pipeline;
pub mod placement;
mod transfer;
pub mod types;

// --- Error Handling ---
pub use crate::error::{AppError, DatabaseFetchFailure, NotionClientError, NotionErrorCode, Result};
pub use crate::error_recovery::retry_with_backoff;
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{CommandLineInput, RunMode, TransferConfig};

// --- Domain Model ---
pub use crate::model::{
    Block, BlockCommon, ChildDatabaseBlock, CodeBlock, ColumnBlock, ColumnListBlock,
    DividerBlock, Page, PageTitle, PropertyValue, SyncedBlock, SyncedFrom, TableBlock,
    TableRowBlock, TextBlock, TextBlockContent, ToDoBlock, UnsupportedBlock,
};

// --- Domain Types ---
pub use crate::types::{
    AccessToken, Annotations, ApiKey, BlockId, Color, DocumentId, Link, NotionId, PageId,
    PropertyName, RichTextItem, RichTextType,
};

// --- Notion Side ---
pub use crate::api::{
    parser::{parse_blocks_pagination, parse_page_response, parse_pages_pagination},
    CachedNotionClient, DiskCache, NotionHttpClient, NotionRepository, PageBundle, PageFetcher,
};

// --- Docs Side ---
pub use crate::docs::{
    batch_update_body, utf16_len, BulletPreset, DocsHttpClient, DocumentBuffer, DocumentSnapshot,
    DocumentStore, MemoryDocumentStore, NamedStyle, Operation, ParagraphStyle, ParagraphText,
    Range, RgbColor, SubmitReceipt, TextStyle,
};

// --- Compilation ---
pub use crate::compiler::{
    compile_children, compile_page, dispatch, page_marker, ChildStrategy, CompileContext,
    Compiled, DatabaseRowSource, PageProgram, ReferenceResolver,
};

// --- Placement ---
pub use crate::placement::{
    find_section, plan_placement, PlacementKind, PlacementPlan, Section, SectionLedger,
};

// --- Orchestration ---
pub use crate::pipeline::ContentSource;
pub use crate::transfer::{
    compile_bundle, preview, Preview, SubmissionPolicy, Transfer, TransferOptions,
    TransferOutcome, TransferReport,
};
