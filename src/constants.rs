// src/constants.rs
//! Domain constants that define the operational boundaries of the system.
//!
//! Each constant is named for the domain concept it constrains, not its
//! technical role.

// ---------------------------------------------------------------------------
// Notion API boundaries
// ---------------------------------------------------------------------------

/// How many objects the Notion API returns per page of results.
///
/// The Notion API maximum is 100. We use the maximum to minimize
/// round-trips during recursive fetching.
pub const NOTION_API_PAGE_SIZE: usize = 100;

/// Maximum nesting depth when recursively fetching block children.
pub const NOTION_MAX_FETCH_DEPTH: u8 = 50;

// ---------------------------------------------------------------------------
// Compilation boundaries
// ---------------------------------------------------------------------------

/// Maximum nesting depth the block compiler descends into.
///
/// Synced blocks can reference each other; this stops a cycle that slipped
/// past the fetcher from recursing forever.
pub const BLOCK_MAX_COMPILE_DEPTH: usize = 64;

/// Indent applied to quote paragraphs, in points.
pub const QUOTE_INDENT_PT: f64 = 36.0;

/// Font used for code blocks, inline code and the properties table.
pub const MONOSPACE_FONT: &str = "Consolas";

/// Prefix of the line that identifies a transferred page inside a document.
pub const PAGE_MARKER_PREFIX: &str = "Notion Page ID: ";

// ---------------------------------------------------------------------------
// Google Docs API
// ---------------------------------------------------------------------------

/// Base URL of the Google Docs REST API.
pub const DOCS_API_BASE_URL: &str = "https://docs.googleapis.com/v1/documents";

/// Attempts made for a snapshot or batch update before giving up.
pub const DOCS_MAX_ATTEMPTS: u32 = 4;

/// First retry delay; doubled per attempt.
pub const DOCS_RETRY_INITIAL_DELAY_MS: u64 = 500;

/// Upper bound on a single retry delay.
pub const DOCS_RETRY_MAX_DELAY_MS: u64 = 8_000;

// ---------------------------------------------------------------------------
// Error display
// ---------------------------------------------------------------------------

/// Maximum characters shown when previewing error response bodies.
pub const ERROR_BODY_PREVIEW_LENGTH: usize = 200;
