//! A single cancellable pagination pass

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crate::error::PaginationError;
use crate::layout::block::BlockBuilder;
use crate::layout::compositor::PageCompositor;
use crate::pagination::result::{Page, Pagination, TitlePage};
use crate::script::ScriptSnapshot;
use crate::style::{PageSize, StyleProvider};

/// Process-wide start order for staleness comparison
static OPERATION_SEQ: AtomicU64 = AtomicU64::new(1);

/// Shared cancellation flag checked between blocks
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; a running pass stops at the next block boundary
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_canceled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Settings shared by every pass a manager runs
#[derive(Debug, Clone, Copy, Default)]
pub struct PaginationSettings {
    pub page_size: PageSize,
    /// Lay out lines normally omitted from print (notes, sections)
    pub include_invisible: bool,
}

/// Lifecycle of a pagination operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationState {
    Pending,
    Running,
    Finished,
    Canceled,
}

/// One queued unit of pagination work
pub struct PaginationOperation {
    snapshot: ScriptSnapshot,
    title_page: TitlePage,
    settings: PaginationSettings,
    provider: Arc<dyn StyleProvider>,
    /// Edit location that triggered this pass, for page reuse
    change_at: Option<usize>,
    previous: Option<Arc<Pagination>>,
    cancel: CancelFlag,
    state: OperationState,
    started_at: Instant,
    sequence: u64,
}

/// Where a live pass picks up after its reused prefix
struct ResumePoint {
    pages: Vec<Arc<Page>>,
    line_index: usize,
    prev_end: Option<usize>,
}

impl PaginationOperation {
    /// Create a full pass over the whole snapshot
    pub fn new(
        snapshot: ScriptSnapshot,
        title_page: TitlePage,
        settings: PaginationSettings,
        provider: Arc<dyn StyleProvider>,
    ) -> Self {
        Self {
            snapshot,
            title_page,
            settings,
            provider,
            change_at: None,
            previous: None,
            cancel: CancelFlag::new(),
            state: OperationState::Pending,
            started_at: Instant::now(),
            sequence: OPERATION_SEQ.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Create a live pass that reuses pages unaffected by an edit at `change_at`
    pub fn live(
        snapshot: ScriptSnapshot,
        title_page: TitlePage,
        settings: PaginationSettings,
        provider: Arc<dyn StyleProvider>,
        change_at: usize,
        previous: Arc<Pagination>,
    ) -> Self {
        let mut op = Self::new(snapshot, title_page, settings, provider);
        op.change_at = Some(change_at);
        op.previous = Some(previous);
        op
    }

    /// Get the shared flag used to cancel this operation
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    pub fn state(&self) -> OperationState {
        self.state
    }

    /// Get the start order of this operation
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Run to completion; a canceled pass produces no result
    pub fn run(mut self) -> Result<Pagination, PaginationError> {
        self.state = OperationState::Running;
        log::trace!(
            "pagination {} running over {} lines",
            self.sequence,
            self.snapshot.len()
        );

        let outcome = self.paginate();
        match &outcome {
            Ok(result) => {
                self.state = OperationState::Finished;
                log::debug!(
                    "pagination {} finished: {} pages in {:?}",
                    self.sequence,
                    result.page_count(),
                    self.started_at.elapsed()
                );
            }
            Err(PaginationError::Canceled) => {
                self.state = OperationState::Canceled;
                log::trace!("pagination {} canceled", self.sequence);
            }
            Err(error) => {
                self.state = OperationState::Finished;
                log::debug!("pagination {} failed: {}", self.sequence, error);
            }
        }
        outcome
    }

    fn paginate(&self) -> Result<Pagination, PaginationError> {
        if self.cancel.is_canceled() {
            return Err(PaginationError::Canceled);
        }

        let frame = self.provider.page_frame(self.settings.page_size);
        let max_height = frame.content_height();
        let mut compositor = PageCompositor::new(max_height);
        let builder = BlockBuilder::new(
            self.provider.as_ref(),
            self.settings.page_size,
            self.settings.include_invisible,
        );

        let lines = self.snapshot.lines();
        let mut index = 0usize;
        let mut prev_end: Option<usize> = None;

        if let Some(resume) = self.reusable_prefix() {
            compositor.preload(&resume.pages);
            index = resume.line_index;
            prev_end = resume.prev_end;
            log::trace!(
                "pagination {} reusing {} pages, resuming at line {}",
                self.sequence,
                compositor.sealed_count(),
                resume.line_index
            );
        }

        while let Some(next) = builder.next_relevant(lines, index) {
            if self.cancel.is_canceled() {
                return Err(PaginationError::Canceled);
            }

            let line = &lines[next];
            if line.forced_page_break {
                compositor.forced_break();
                index = next + 1;
                continue;
            }

            let Some((block, after)) = builder.next_block(lines, next) else {
                return Err(PaginationError::NoProgress { index: next });
            };
            if after <= next {
                return Err(PaginationError::NoProgress { index: next });
            }

            if !block.range.is_empty() {
                if let Some(end) = prev_end {
                    if block.range.start < end {
                        return Err(PaginationError::InconsistentRange {
                            at: block.range.start,
                        });
                    }
                }
                prev_end = Some(block.range.end());
            }

            compositor.place(block);
            index = after;
        }

        Ok(Pagination {
            pages: compositor.finish(),
            title_page: self.title_page.clone(),
            success: true,
            started_at: self.started_at,
            sequence: self.sequence,
            snapshot: self.snapshot.clone(),
            max_height,
        })
    }

    /// Pages before the edited page that can be reused by reference
    ///
    /// One extra page is rebuilt ahead of the edit so grouping decisions at
    /// the seam are recomputed. Any mismatch falls back to a full pass.
    fn reusable_prefix(&self) -> Option<ResumePoint> {
        let change_at = self.change_at?;
        let previous = self.previous.as_ref()?;
        if !previous.success || previous.pages.is_empty() {
            return None;
        }

        // An edit can land between pages (the separator after a page's last
        // line), so resolve it to the first page whose content ends past it
        let edit_page = previous
            .pages
            .iter()
            .position(|page| {
                !page.represented_range.is_empty() && change_at < page.represented_range.end()
            })
            .unwrap_or(previous.pages.len() - 1);
        let reuse = edit_page.saturating_sub(1);
        if reuse == 0 {
            return None;
        }

        let boundary = previous.pages[reuse].represented_range;
        if boundary.is_empty() {
            return None;
        }

        // The resumed line must still look like the one the boundary page
        // was built from
        let line_index = self.snapshot.line_index_starting_at(boundary.start)?;
        let old_index = previous.snapshot.line_index_starting_at(boundary.start)?;
        let old_line = previous.snapshot.get(old_index)?;
        let new_line = self.snapshot.get(line_index)?;
        if old_line.kind != new_line.kind || old_line.text != new_line.text {
            return None;
        }

        let prefix = &previous.pages[..reuse];
        let prev_end = prefix.iter().rev().find_map(|page| {
            (!page.represented_range.is_empty()).then(|| page.represented_range.end())
        });

        Some(ResumePoint {
            pages: prefix.to_vec(),
            line_index,
            prev_end,
        })
    }
}
