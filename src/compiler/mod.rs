// src/compiler/mod.rs
//! Block-to-document compiler.
//!
//! Every compiler takes a block and the absolute index it is written at,
//! and returns the operations together with the number of UTF-16 units
//! those operations leave behind. Siblings and parents place themselves
//! using that length, so it must match what replaying the operations
//! actually inserts, including tabs consumed by bullet creation.
//!
//! Compilers never fail and never perform I/O. Content that lives
//! elsewhere (synced originals, linked database rows) comes in through
//! the capabilities on [`CompileContext`].

mod blocks;
mod children;
mod dispatch;
mod page;
mod properties;
pub mod rich_text;

pub use children::{compile_children, ChildStrategy};
pub use dispatch::dispatch;
pub use page::{compile_page, page_marker, PageProgram};

use crate::docs::{utf16_len, Operation};
use crate::model::{Block, Page};
use crate::types::BlockId;
use std::collections::HashMap;

// --- Core Types ---

/// Operations for one block and the units they add to the document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Compiled {
    pub operations: Vec<Operation>,
    pub length: usize,
    /// Set when the block put bullets on its own first paragraph. Those
    /// bullets swallow an indent tab sitting at the start of that paragraph.
    pub bullets_first_paragraph: bool,
}

impl Compiled {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty() && self.length == 0
    }

    /// Inserts `text` at `index` and counts it.
    pub fn insert(&mut self, index: usize, text: impl Into<String>) {
        let text = text.into();
        self.length += utf16_len(&text);
        self.operations.push(Operation::insert_text(index, text));
    }

    /// Adds an operation that leaves the length unchanged.
    pub fn push(&mut self, operation: Operation) {
        self.operations.push(operation);
    }

    /// Appends another result compiled right after the current content.
    pub fn append(&mut self, other: Compiled) {
        self.operations.extend(other.operations);
        self.length += other.length;
    }

    /// The same result compiled `delta` units further into the document.
    pub fn shifted(&self, delta: usize) -> Self {
        Self {
            operations: self.operations.iter().map(|op| op.shifted(delta)).collect(),
            length: self.length,
            bullets_first_paragraph: self.bullets_first_paragraph,
        }
    }
}

/// Something that can return the content of a synced block original.
pub trait ReferenceResolver {
    fn resolve(&self, id: &BlockId) -> Option<&[Block]>;
}

impl ReferenceResolver for HashMap<BlockId, Vec<Block>> {
    fn resolve(&self, id: &BlockId) -> Option<&[Block]> {
        self.get(id).map(Vec::as_slice)
    }
}

/// Something that can return the row pages of a linked database block.
pub trait DatabaseRowSource {
    fn rows(&self, database_block: &BlockId) -> Option<&[Page]>;
}

impl DatabaseRowSource for HashMap<BlockId, Vec<Page>> {
    fn rows(&self, database_block: &BlockId) -> Option<&[Page]> {
        self.get(database_block).map(Vec::as_slice)
    }
}

/// Capabilities passed down the compiler.
#[derive(Clone, Copy, Default)]
pub struct CompileContext<'a> {
    /// Resolves synced block references.
    pub references: Option<&'a dyn ReferenceResolver>,
    /// Row pages for linked databases.
    pub database_rows: Option<&'a dyn DatabaseRowSource>,
    /// Whether tables may be emitted as real `insertTable` structures.
    pub structural_tables: bool,
    /// Set while compiling a block written right after an indent tab at the
    /// start of a paragraph. Bullets created over the block's first
    /// paragraph remove that tab.
    after_indent_marker: bool,
}

impl<'a> CompileContext<'a> {
    pub fn with_references(mut self, references: &'a dyn ReferenceResolver) -> Self {
        self.references = Some(references);
        self
    }

    pub fn with_database_rows(mut self, rows: &'a dyn DatabaseRowSource) -> Self {
        self.database_rows = Some(rows);
        self
    }

    pub fn with_structural_tables(mut self, enabled: bool) -> Self {
        self.structural_tables = enabled;
        self
    }

    pub(crate) fn with_indent_marker(mut self, marker: bool) -> Self {
        self.after_indent_marker = marker;
        self
    }

    pub(crate) fn follows_indent_marker(&self) -> bool {
        self.after_indent_marker
    }
}

impl std::fmt::Debug for CompileContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompileContext")
            .field("references", &self.references.is_some())
            .field("database_rows", &self.database_rows.is_some())
            .field("structural_tables", &self.structural_tables)
            .field("after_indent_marker", &self.after_indent_marker)
            .finish()
    }
}
