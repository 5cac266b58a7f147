// src/api/fetcher.rs
//! Materializes a page and everything its compilation reads.
//!
//! The block tree is fetched depth-first. Synced references are resolved
//! afterwards through a queue, since a synced original may itself contain
//! references. Linked-database rows are optional decoration: a failed
//! query is logged and the table is left out.

use super::NotionRepository;
use crate::constants::NOTION_MAX_FETCH_DEPTH;
use crate::error::{classify_database_fetch_failure, AppError, DatabaseFetchFailure};
use crate::model::{Block, Page};
use crate::types::{BlockId, NotionId, PageId};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

/// A page together with the content its blocks refer to.
#[derive(Debug, Clone, PartialEq)]
pub struct PageBundle {
    pub page: Page,
    /// Children of synced originals, keyed by the original's block ID.
    pub references: HashMap<BlockId, Vec<Block>>,
    /// Rows of linked databases, keyed by the database block's ID.
    pub database_rows: HashMap<BlockId, Vec<Page>>,
}

impl PageBundle {
    /// Page IDs of every linked-database row in the bundle.
    pub fn row_page_ids(&self) -> Vec<PageId> {
        self.database_rows
            .values()
            .flatten()
            .map(|row| row.id.clone())
            .collect()
    }
}

/// Fetches [`PageBundle`]s from a [`NotionRepository`].
#[derive(Clone)]
pub struct PageFetcher {
    repository: Arc<dyn NotionRepository>,
    include_database_rows: bool,
    max_depth: u8,
}

impl PageFetcher {
    pub fn new(repository: Arc<dyn NotionRepository>) -> Self {
        Self {
            repository,
            include_database_rows: false,
            max_depth: NOTION_MAX_FETCH_DEPTH,
        }
    }

    /// Also query the rows of every linked database on the page.
    pub fn with_database_rows(mut self, enabled: bool) -> Self {
        self.include_database_rows = enabled;
        self
    }

    pub fn with_max_depth(mut self, depth: u8) -> Self {
        self.max_depth = depth.min(NOTION_MAX_FETCH_DEPTH);
        self
    }

    pub async fn fetch(&self, id: &PageId) -> Result<PageBundle, AppError> {
        let mut page = self.repository.retrieve_page(&NotionId::from(id)).await?;
        page.blocks = self.fetch_children(NotionId::from(id), 0).await?;
        log::info!("Fetched page {} ({} top-level blocks)", id, page.blocks.len());

        let references = self.resolve_references(&page.blocks).await;

        let database_rows = if self.include_database_rows {
            let mut databases = Vec::new();
            collect_databases(&page.blocks, &mut databases);
            for blocks in references.values() {
                collect_databases(blocks, &mut databases);
            }
            self.fetch_database_rows(databases).await
        } else {
            HashMap::new()
        };

        Ok(PageBundle {
            page,
            references,
            database_rows,
        })
    }

    /// Rows of a database, newest first.
    pub async fn rows(&self, database: &NotionId) -> Result<Vec<Page>, AppError> {
        self.repository.query_rows(database).await
    }

    /// Children of `parent`, with their own children filled in.
    ///
    /// A failure below the first level keeps the block without children.
    fn fetch_children(&self, parent: NotionId, depth: u8) -> BoxFuture<'_, Result<Vec<Block>, AppError>> {
        async move {
            let mut blocks = self.repository.retrieve_children(&parent).await?;
            log::debug!("Fetched {} children of {} at depth {}", blocks.len(), parent, depth);

            for block in blocks.iter_mut().filter(|block| block.expands_children()) {
                if depth + 1 >= self.max_depth {
                    log::warn!(
                        "Not descending into block {}: fetch depth limit {} reached",
                        block.id(),
                        self.max_depth
                    );
                    continue;
                }
                match self.fetch_children(NotionId::from(block.id()), depth + 1).await {
                    Ok(children) => block.set_children(children),
                    Err(e) => log::warn!("Failed to fetch children of {}: {}", block.id(), e),
                }
            }
            Ok(blocks)
        }
        .boxed()
    }

    /// Fetches the content behind every synced reference reachable from
    /// `blocks`. Unreachable sources are left out; the compiler writes a
    /// placeholder for them.
    async fn resolve_references(&self, blocks: &[Block]) -> HashMap<BlockId, Vec<Block>> {
        let mut resolved = HashMap::new();
        let mut pending = VecDeque::new();
        collect_synced(blocks, &mut resolved, &mut pending);

        let mut visited: HashSet<BlockId> = resolved.keys().cloned().collect();
        while let Some(source) = pending.pop_front() {
            if !visited.insert(source.clone()) {
                continue;
            }
            match self.fetch_children(NotionId::from(&source), 1).await {
                Ok(content) => {
                    collect_synced(&content, &mut resolved, &mut pending);
                    resolved.insert(source, content);
                }
                Err(e) => log::warn!("Failed to resolve synced block {}: {}", source, e),
            }
        }
        resolved
    }

    async fn fetch_database_rows(&self, databases: Vec<BlockId>) -> HashMap<BlockId, Vec<Page>> {
        let mut rows = HashMap::new();
        for database in databases {
            if rows.contains_key(&database) {
                continue;
            }
            match self.repository.query_rows(&NotionId::from(&database)).await {
                Ok(pages) => {
                    log::debug!("Queried {} rows of database {}", pages.len(), database);
                    rows.insert(database, pages);
                }
                Err(e) => match classify_database_fetch_failure(&e) {
                    DatabaseFetchFailure::LinkedDatabase => log::warn!(
                        "Skipping rows of {}: linked databases cannot be queried through the API",
                        database
                    ),
                    failure => log::warn!("Skipping rows of {}: {}", database, failure),
                },
            }
        }
        rows
    }
}

/// Records synced originals found in `blocks` and queues the sources of
/// references not seen yet.
fn collect_synced(
    blocks: &[Block],
    resolved: &mut HashMap<BlockId, Vec<Block>>,
    pending: &mut VecDeque<BlockId>,
) {
    for block in blocks {
        match (block, block.synced_source()) {
            (_, Some(source)) => {
                if !resolved.contains_key(source) {
                    pending.push_back(source.clone());
                }
            }
            (Block::Synced(original), None) if !original.common.children.is_empty() => {
                resolved.insert(original.common.id.clone(), original.common.children.clone());
            }
            _ => {}
        }
        collect_synced(block.children(), resolved, pending);
    }
}

fn collect_databases(blocks: &[Block], found: &mut Vec<BlockId>) {
    for block in blocks {
        if let Block::ChildDatabase(database) = block {
            found.push(database.common.id.clone());
        }
        collect_databases(block.children(), found);
    }
}
