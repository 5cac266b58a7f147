// src/transfer.rs
//! Moves pages from a content source into one destination document.
//!
//! Pages are handled one at a time from a FIFO worklist. A page that fails
//! is reported and the rest of the worklist still runs.

use crate::api::PageBundle;
use crate::compiler::{compile_page, CompileContext, PageProgram};
use crate::constants::{DOCS_MAX_ATTEMPTS, DOCS_RETRY_INITIAL_DELAY_MS, DOCS_RETRY_MAX_DELAY_MS};
use crate::docs::{DocumentBuffer, DocumentStore, Operation, SubmitReceipt};
use crate::error::AppError;
use crate::error_recovery::retry_with_backoff;
use crate::pipeline::ContentSource;
use crate::placement::{plan_placement, PlacementKind, PlacementPlan, Section, SectionLedger};
use crate::types::{DocumentId, PageId};
use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::time::Duration;

/// How a compiled page is split into `batchUpdate` calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionPolicy {
    /// Prelude and the whole page in one call.
    #[default]
    Batched,
    /// Prelude and header in one call, then one call per top-level block.
    PerBlock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferOptions {
    pub policy: SubmissionPolicy,
    /// Queue the row pages of linked databases after the page itself.
    pub follow_child_databases: bool,
    /// Emit tables as real document tables.
    pub structural_tables: bool,
    /// Query linked-database rows and list them under the database title.
    pub include_database_rows: bool,
}

impl Default for TransferOptions {
    fn default() -> Self {
        Self {
            policy: SubmissionPolicy::Batched,
            follow_child_databases: false,
            structural_tables: true,
            include_database_rows: false,
        }
    }
}

/// What happened to one page.
#[derive(Debug)]
pub enum TransferOutcome {
    Created {
        page: PageId,
        title: String,
        section: Section,
    },
    Updated {
        page: PageId,
        title: String,
        section: Section,
    },
    Failed {
        page: PageId,
        error: AppError,
    },
}

impl TransferOutcome {
    pub fn page(&self) -> &PageId {
        match self {
            TransferOutcome::Created { page, .. }
            | TransferOutcome::Updated { page, .. }
            | TransferOutcome::Failed { page, .. } => page,
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, TransferOutcome::Failed { .. })
    }
}

impl fmt::Display for TransferOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferOutcome::Created { title, section, .. } => {
                write!(f, "✓ Created \"{}\" at [{}, {})", title, section.start, section.end)
            }
            TransferOutcome::Updated { title, section, .. } => {
                write!(f, "✓ Updated \"{}\" at [{}, {})", title, section.start, section.end)
            }
            TransferOutcome::Failed { page, error } => write!(f, "✗ Failed {}: {}", page, error),
        }
    }
}

/// Outcomes of a run, in processing order.
#[derive(Debug, Default)]
pub struct TransferReport {
    pub outcomes: Vec<TransferOutcome>,
}

impl TransferReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

impl fmt::Display for TransferReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for outcome in &self.outcomes {
            writeln!(f, "{}", outcome)?;
        }
        write!(
            f,
            "{} page(s) transferred, {} failed",
            self.succeeded(),
            self.failed()
        )
    }
}

/// Transfers pages into `document`.
///
/// Callers must not run two transfers into the same document at once.
pub struct Transfer<'a> {
    source: &'a dyn ContentSource,
    store: &'a dyn DocumentStore,
    document: DocumentId,
    ledger: SectionLedger,
    options: TransferOptions,
}

impl<'a> Transfer<'a> {
    pub fn new(
        source: &'a dyn ContentSource,
        store: &'a dyn DocumentStore,
        document: DocumentId,
        ledger: SectionLedger,
        options: TransferOptions,
    ) -> Self {
        Self {
            source,
            store,
            document,
            ledger,
            options,
        }
    }

    pub fn ledger(&self) -> &SectionLedger {
        &self.ledger
    }

    /// Transfers every page of `worklist`, plus the pages they queue.
    /// No page is transferred twice.
    pub async fn run(&mut self, worklist: impl IntoIterator<Item = PageId>) -> TransferReport {
        let mut queue: VecDeque<PageId> = worklist.into_iter().collect();
        let mut processed = HashSet::new();
        let mut report = TransferReport::default();

        while let Some(page) = queue.pop_front() {
            if !processed.insert(page.clone()) {
                continue;
            }
            log::info!("Transferring page {} ({} queued)", page, queue.len());

            match self.transfer_page(&page).await {
                Ok((outcome, follow_ups)) => {
                    log::info!("{}", outcome);
                    queue.extend(follow_ups.into_iter().filter(|id| !processed.contains(id)));
                    report.outcomes.push(outcome);
                }
                Err(error) => {
                    log::error!("Failed to transfer page {}: {}", page, error);
                    report.outcomes.push(TransferOutcome::Failed { page, error });
                }
            }
        }
        report
    }

    /// Fetches, places, compiles and submits one page.
    ///
    /// Returns the outcome and the pages it asks to be transferred next.
    pub async fn transfer_page(
        &mut self,
        page: &PageId,
    ) -> Result<(TransferOutcome, Vec<PageId>), AppError> {
        let bundle = self.source.fetch_page(page).await?;

        let store = self.store;
        let document = &self.document;
        let snapshot = retry_with_backoff(
            || store.snapshot(document),
            DOCS_MAX_ATTEMPTS,
            Duration::from_millis(DOCS_RETRY_INITIAL_DELAY_MS),
            Duration::from_millis(DOCS_RETRY_MAX_DELAY_MS),
        )
        .await?;

        let plan = plan_placement(&snapshot, &self.document, page, &mut self.ledger);
        let program = compile_bundle(&bundle, plan.start, self.options.structural_tables);
        let receipt = self.submit(&plan, &program).await?;

        let section = plan.written_section(program.length);
        self.ledger.record(
            &self.document,
            receipt.revision_id,
            page,
            plan.replaced,
            section,
        );
        if let Err(e) = self.ledger.save().await {
            log::warn!("Could not save section ledger: {}", e);
        }

        let title = bundle.page.title().display_or_untitled().to_string();
        let outcome = match plan.kind {
            PlacementKind::Update => TransferOutcome::Updated {
                page: page.clone(),
                title,
                section,
            },
            PlacementKind::Append => TransferOutcome::Created {
                page: page.clone(),
                title,
                section,
            },
        };

        let follow_ups = if self.options.follow_child_databases {
            bundle.row_page_ids()
        } else {
            Vec::new()
        };
        Ok((outcome, follow_ups))
    }

    async fn submit(
        &self,
        plan: &PlacementPlan,
        program: &PageProgram,
    ) -> Result<SubmitReceipt, AppError> {
        let batches: Vec<Vec<Operation>> = match self.options.policy {
            SubmissionPolicy::Batched => {
                let mut operations = plan.prelude.clone();
                operations.extend(program.operations());
                vec![operations]
            }
            SubmissionPolicy::PerBlock => {
                let mut first = plan.prelude.clone();
                first.extend(program.header().operations.iter().cloned());
                std::iter::once(first)
                    .chain(
                        program
                            .blocks()
                            .iter()
                            .filter(|segment| !segment.is_empty())
                            .map(|segment| segment.operations.clone()),
                    )
                    .collect()
            }
        };

        let mut receipt = SubmitReceipt::default();
        for (number, operations) in batches.iter().enumerate() {
            log::debug!(
                "Submitting batch {}/{} ({} operations)",
                number + 1,
                batches.len(),
                operations.len()
            );
            receipt = self.submit_with_retry(operations).await?;
        }
        Ok(receipt)
    }

    async fn submit_with_retry(&self, operations: &[Operation]) -> Result<SubmitReceipt, AppError> {
        let store = self.store;
        let document = &self.document;
        retry_with_backoff(
            || store.submit(document, operations),
            DOCS_MAX_ATTEMPTS,
            Duration::from_millis(DOCS_RETRY_INITIAL_DELAY_MS),
            Duration::from_millis(DOCS_RETRY_MAX_DELAY_MS),
        )
        .await
    }
}

/// Compiles a fetched page at `offset`, with everything the bundle
/// resolved available to the compiler.
pub fn compile_bundle(bundle: &PageBundle, offset: usize, structural_tables: bool) -> PageProgram {
    let ctx = CompileContext::default()
        .with_references(&bundle.references)
        .with_database_rows(&bundle.database_rows)
        .with_structural_tables(structural_tables);
    compile_page(&bundle.page, offset, &ctx)
}

/// A page compiled against an empty document.
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    pub operations: Vec<Operation>,
    /// Plain text of the document after replay.
    pub text: String,
}

/// Compiles `bundle` into an empty document without touching any store.
pub fn preview(bundle: &PageBundle, structural_tables: bool) -> Result<Preview, AppError> {
    let program = compile_bundle(bundle, 1, structural_tables);
    let operations = program.operations();
    let mut buffer = DocumentBuffer::new();
    buffer.apply_all(&operations)?;
    log::debug!("Preview of {}:\n{}", bundle.page.id, buffer.text());
    Ok(Preview {
        operations,
        text: buffer.text(),
    })
}
