// tests/transfer.rs
//! Transfers from an in-memory Notion workspace into an in-memory document,
//! through the same fetcher and orchestration the binary uses.

use indexmap::IndexMap;
use notion2gdocs::{
    page_marker, AppError, Block, BlockCommon, BlockId, ChildDatabaseBlock, DocumentId,
    MemoryDocumentStore, NotionId, NotionRepository, Page, PageFetcher, PageId, PageTitle,
    RichTextItem, SectionLedger, SubmissionPolicy, SyncedBlock, SyncedFrom, TextBlock, Transfer,
    TransferOptions, TransferOutcome,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

const ROADMAP: &str = "11111111111111111111111111111111";
const ROW: &str = "22222222222222222222222222222222";
const TASKS: &str = "33333333333333333333333333333333";
const SHARED: &str = "44444444444444444444444444444444";

/// Pages, children and rows keyed the way the API addresses them.
#[derive(Default)]
struct Workspace {
    pages: Mutex<HashMap<NotionId, Page>>,
    children: Mutex<HashMap<NotionId, Vec<Block>>>,
    rows: HashMap<NotionId, Vec<Page>>,
}

impl Workspace {
    fn set_children(&self, parent: &str, blocks: Vec<Block>) {
        self.children
            .lock()
            .insert(NotionId::parse(parent).unwrap(), blocks);
    }
}

#[async_trait::async_trait]
impl NotionRepository for Workspace {
    async fn retrieve_page(&self, id: &NotionId) -> Result<Page, AppError> {
        self.pages
            .lock()
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::InvalidId(id.to_string()))
    }

    async fn retrieve_children(&self, parent: &NotionId) -> Result<Vec<Block>, AppError> {
        Ok(self
            .children
            .lock()
            .get(parent)
            .cloned()
            .unwrap_or_default())
    }

    async fn query_rows(&self, database: &NotionId) -> Result<Vec<Page>, AppError> {
        self.rows
            .get(database)
            .cloned()
            .ok_or_else(|| AppError::InvalidId(database.to_string()))
    }
}

fn page(id: &str, title: &str) -> Page {
    Page {
        id: PageId::parse(id).unwrap(),
        title: PageTitle::new(title),
        url: String::new(),
        blocks: Vec::new(),
        properties: IndexMap::new(),
        archived: false,
        last_edited_time: None,
    }
}

fn paragraph(text: &str) -> Block {
    Block::Paragraph(TextBlock::new(
        BlockCommon::default(),
        vec![RichTextItem::plain_text(text)],
    ))
}

/// A roadmap page with a linked task database holding one row page.
fn workspace() -> Arc<Workspace> {
    let workspace = Workspace {
        rows: HashMap::from([(NotionId::parse(TASKS).unwrap(), vec![page(ROW, "Ship v1")])]),
        ..Workspace::default()
    };
    workspace.pages.lock().extend([
        (NotionId::parse(ROADMAP).unwrap(), page(ROADMAP, "Roadmap")),
        (NotionId::parse(ROW).unwrap(), page(ROW, "Ship v1")),
    ]);

    let mut database = BlockCommon::new(BlockId::parse(TASKS).unwrap());
    database.has_children = true;
    workspace.set_children(
        ROADMAP,
        vec![
            paragraph("Goals for the quarter"),
            Block::ChildDatabase(ChildDatabaseBlock {
                common: database,
                title: "Tasks".to_string(),
            }),
        ],
    );
    workspace.set_children(ROW, vec![paragraph("Cut the release branch")]);
    Arc::new(workspace)
}

fn document() -> DocumentId {
    DocumentId::parse("1AbCdEfGhIjKlMnOpQrStUvWxYz").unwrap()
}

fn occurrences(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

#[tokio::test]
async fn test_follows_linked_database_rows() {
    let workspace = workspace();
    let fetcher = PageFetcher::new(workspace).with_database_rows(true);
    let store = MemoryDocumentStore::new();
    let options = TransferOptions {
        follow_child_databases: true,
        include_database_rows: true,
        ..TransferOptions::default()
    };
    let mut transfer = Transfer::new(&fetcher, &store, document(), SectionLedger::in_memory(), options);

    let report = transfer.run([PageId::parse(ROADMAP).unwrap()]).await;

    assert_eq!(report.succeeded(), 2);
    assert_eq!(report.failed(), 0);
    assert_eq!(report.outcomes[1].page(), &PageId::parse(ROW).unwrap());

    let text = store.buffer(&document()).text();
    let roadmap = text.find(&page_marker(&PageId::parse(ROADMAP).unwrap())).unwrap();
    let row = text.find(&page_marker(&PageId::parse(ROW).unwrap())).unwrap();
    assert!(roadmap < row);
    assert!(text.contains("Tasks (linked database)\n"));
    assert!(text.contains("| Ship v1 |\n"));
    assert!(text.contains("Cut the release branch\n"));
}

#[tokio::test]
async fn test_second_run_updates_in_place() {
    let workspace = workspace();
    let fetcher = PageFetcher::new(workspace.clone());
    let store = MemoryDocumentStore::new();
    let mut transfer = Transfer::new(
        &fetcher,
        &store,
        document(),
        SectionLedger::in_memory(),
        TransferOptions::default(),
    );
    let roadmap = PageId::parse(ROADMAP).unwrap();
    let row = PageId::parse(ROW).unwrap();

    transfer.run([roadmap.clone(), row.clone()]).await;
    workspace.set_children(ROADMAP, vec![paragraph("Goals, revised")]);
    let report = transfer.run([roadmap.clone()]).await;

    assert!(matches!(report.outcomes[0], TransferOutcome::Updated { .. }));
    let buffer = store.buffer(&document());
    let text = buffer.text();
    assert_eq!(occurrences(&text, &page_marker(&roadmap)), 1);
    assert_eq!(occurrences(&text, &page_marker(&row)), 1);
    assert!(text.contains("Goals, revised\n"));
    assert!(!text.contains("Goals for the quarter"));
    assert!(text.find("Goals, revised").unwrap() < text.find("Cut the release branch").unwrap());

    // The ledger followed the update, so the row is found where it now is.
    let sections = transfer.ledger().sections(&document());
    let (_, row_section) = sections.iter().find(|(id, _)| id == &row).unwrap();
    assert!(buffer
        .text_in(row_section.range())
        .starts_with("Ship v1\n"));
}

#[tokio::test]
async fn test_per_block_submission_reaches_same_text() {
    let roadmap = PageId::parse(ROADMAP).unwrap();

    let batched_store = MemoryDocumentStore::new();
    let fetcher = PageFetcher::new(workspace());
    Transfer::new(
        &fetcher,
        &batched_store,
        document(),
        SectionLedger::in_memory(),
        TransferOptions::default(),
    )
    .run([roadmap.clone()])
    .await;

    let per_block_store = MemoryDocumentStore::new();
    let options = TransferOptions {
        policy: SubmissionPolicy::PerBlock,
        ..TransferOptions::default()
    };
    Transfer::new(
        &fetcher,
        &per_block_store,
        document(),
        SectionLedger::in_memory(),
        options,
    )
    .run([roadmap])
    .await;

    assert_eq!(batched_store.batch_sizes().len(), 1);
    assert_eq!(per_block_store.batch_sizes().len(), 3);
    assert_eq!(
        per_block_store.buffer(&document()).text(),
        batched_store.buffer(&document()).text()
    );
}

#[tokio::test]
async fn test_synced_reference_resolved_through_fetcher() {
    let workspace = workspace();
    let reference = Block::Synced(SyncedBlock {
        common: BlockCommon {
            has_children: true,
            ..BlockCommon::default()
        },
        synced_from: Some(SyncedFrom {
            block_id: BlockId::parse(SHARED).unwrap(),
        }),
    });
    workspace.set_children(ROADMAP, vec![reference]);
    workspace.set_children(SHARED, vec![paragraph("Shared status line")]);

    let fetcher = PageFetcher::new(workspace);
    let store = MemoryDocumentStore::new();
    let report = Transfer::new(
        &fetcher,
        &store,
        document(),
        SectionLedger::in_memory(),
        TransferOptions::default(),
    )
    .run([PageId::parse(ROADMAP).unwrap()])
    .await;

    assert_eq!(report.succeeded(), 1);
    assert!(store
        .buffer(&document())
        .text()
        .contains("Shared status line\n"));
}
