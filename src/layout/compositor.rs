//! Page composition: fit tests, sealing, forced breaks

use std::sync::Arc;

use crate::layout::block::Block;
use crate::pagination::result::Page;

/// Outcome of a fit test against the open page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Fits,
    Overflows,
}

/// Fills fixed-height pages with blocks, sealing them as they fill up
pub struct PageCompositor {
    max_height: f32,
    open: Page,
    sealed: Vec<Arc<Page>>,
    /// A forced break just sealed the open page
    pending_break: bool,
}

impl PageCompositor {
    pub fn new(max_height: f32) -> Self {
        Self {
            max_height,
            open: Page::new(0, max_height),
            sealed: Vec::new(),
            pending_break: false,
        }
    }

    /// Test whether a block fits on the open page
    ///
    /// The block's top margin counts only when the page already has content
    /// or the style forces it.
    pub fn try_place(&self, block: &Block) -> Placement {
        let needed = block.top_margin_on(self.open.is_empty()) + block.height;
        if needed > self.open.remaining() && !self.open.is_empty() {
            Placement::Overflows
        } else {
            Placement::Fits
        }
    }

    /// Place a block, sealing the open page first when it does not fit
    ///
    /// Blocks are never split: an overflowing block moves to the next page
    /// whole, and a block taller than a page overflows its own page alone.
    pub fn place(&mut self, block: Block) {
        if block.begins_page && !self.open.is_empty() {
            self.seal_and_start_new();
        }
        if self.try_place(&block) == Placement::Overflows {
            self.seal_and_start_new();
        }
        self.open.push(block);
        self.pending_break = false;
    }

    /// Seal the open page and start a fresh one
    pub fn seal_and_start_new(&mut self) -> Arc<Page> {
        let next_index = self.sealed.len() + 1;
        let full = std::mem::replace(&mut self.open, Page::new(next_index, self.max_height));
        let sealed = Arc::new(full);
        self.sealed.push(Arc::clone(&sealed));
        sealed
    }

    /// Seal immediately on an explicit page break, even when nearly empty
    pub fn forced_break(&mut self) {
        self.seal_and_start_new();
        self.pending_break = true;
    }

    /// Seed already-composed pages before resuming mid-stream
    pub fn preload(&mut self, pages: &[Arc<Page>]) {
        debug_assert!(self.sealed.is_empty() && self.open.is_empty());
        self.sealed.extend(pages.iter().cloned());
        self.open = Page::new(self.sealed.len(), self.max_height);
    }

    /// Get the count of pages sealed so far
    pub fn sealed_count(&self) -> usize {
        self.sealed.len()
    }

    /// Finish composition and return all pages
    ///
    /// The open page is kept when it has content, when it is the only page,
    /// or when a forced break explicitly requested it.
    pub fn finish(mut self) -> Vec<Arc<Page>> {
        if !self.open.is_empty() || self.sealed.is_empty() || self.pending_break {
            let last = std::mem::replace(&mut self.open, Page::new(0, 0.0));
            self.sealed.push(Arc::new(last));
        }
        self.sealed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::SourceRange;

    fn block(start: usize, len: usize, height: f32, top_margin: f32) -> Block {
        Block {
            elements: Vec::new(),
            right_column: Vec::new(),
            height,
            top_margin,
            forced_margin: false,
            begins_page: false,
            range: SourceRange::new(start, len),
        }
    }

    #[test]
    fn test_blocks_fill_then_overflow() {
        let mut compositor = PageCompositor::new(100.0);
        compositor.place(block(0, 10, 60.0, 0.0));
        assert_eq!(compositor.try_place(&block(10, 10, 60.0, 0.0)), Placement::Overflows);

        compositor.place(block(10, 10, 60.0, 0.0));
        let pages = compositor.finish();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].blocks.len(), 1);
        assert_eq!(pages[1].blocks.len(), 1);
    }

    #[test]
    fn test_top_margin_ignored_on_empty_page() {
        let mut compositor = PageCompositor::new(100.0);
        // 90 + 20 margin would overflow, but the margin drops at page top
        compositor.place(block(0, 10, 90.0, 20.0));
        let pages = compositor.finish();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].used_height, 90.0);
    }

    #[test]
    fn test_top_margin_counts_on_filled_page() {
        let mut compositor = PageCompositor::new(100.0);
        compositor.place(block(0, 10, 40.0, 0.0));
        // 40 + 20 + 50 > 100, so the margin pushes this block over
        compositor.place(block(10, 10, 50.0, 20.0));
        let pages = compositor.finish();
        assert_eq!(pages.len(), 2);
    }

    #[test]
    fn test_forced_margin_applies_at_page_top() {
        let mut compositor = PageCompositor::new(100.0);
        let mut forced = block(0, 10, 90.0, 20.0);
        forced.forced_margin = true;
        compositor.place(forced);
        let pages = compositor.finish();
        // Tolerated overflow: the margin still applies on the empty page
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].used_height, 110.0);
    }

    #[test]
    fn test_oversized_block_sits_alone() {
        let mut compositor = PageCompositor::new(100.0);
        compositor.place(block(0, 10, 150.0, 0.0));
        compositor.place(block(10, 10, 50.0, 0.0));
        let pages = compositor.finish();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].blocks.len(), 1);
        assert_eq!(pages[0].used_height, 150.0);
        assert_eq!(pages[1].blocks.len(), 1);
    }

    #[test]
    fn test_forced_break_seals_even_empty() {
        let mut compositor = PageCompositor::new(100.0);
        compositor.forced_break();
        let pages = compositor.finish();
        // One blank sealed page, one blank final page the break opened
        assert_eq!(pages.len(), 2);
        assert!(pages[0].is_empty());
        assert!(pages[1].is_empty());
    }

    #[test]
    fn test_no_trailing_blank_without_break() {
        let mut compositor = PageCompositor::new(100.0);
        compositor.place(block(0, 10, 60.0, 0.0));
        compositor.place(block(10, 10, 60.0, 0.0));
        // Second block sealed page 0; page 1 holds it, nothing opened after
        let pages = compositor.finish();
        assert_eq!(pages.len(), 2);
        assert!(!pages[1].is_empty());
    }

    #[test]
    fn test_begins_page_seals_first() {
        let mut compositor = PageCompositor::new(100.0);
        compositor.place(block(0, 10, 30.0, 0.0));
        let mut opener = block(10, 10, 30.0, 0.0);
        opener.begins_page = true;
        compositor.place(opener);
        let pages = compositor.finish();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[1].blocks.len(), 1);
    }

    #[test]
    fn test_preload_resumes_numbering() {
        let mut first = PageCompositor::new(100.0);
        first.place(block(0, 10, 60.0, 0.0));
        first.place(block(10, 10, 60.0, 0.0));
        let pages = first.finish();

        let mut resumed = PageCompositor::new(100.0);
        resumed.preload(&pages[..1]);
        resumed.place(block(10, 10, 60.0, 0.0));
        let repaged = resumed.finish();
        assert_eq!(repaged.len(), 2);
        assert!(Arc::ptr_eq(&repaged[0], &pages[0]));
        assert_eq!(repaged[1].index, 1);
    }

    #[test]
    fn test_empty_run_yields_single_page() {
        let compositor = PageCompositor::new(100.0);
        let pages = compositor.finish();
        assert_eq!(pages.len(), 1);
        assert!(pages[0].is_empty());
    }
}
