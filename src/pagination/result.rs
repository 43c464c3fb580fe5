//! Finished pagination results shared across threads

use std::sync::Arc;
use std::time::Instant;

use crate::layout::block::{Block, PlacedLine};
use crate::script::{ScriptSnapshot, SourceRange};
use crate::Rect;

/// A block fixed at a vertical position on a page
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedBlock {
    /// Top edge in page content coordinates, top margin included
    pub y: f32,
    pub block: Block,
}

/// One composed page
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Page index (0-based)
    pub index: usize,
    /// Usable content height
    pub max_height: f32,
    /// Blocks in placement order
    pub blocks: Vec<PlacedBlock>,
    /// Content height consumed so far
    pub used_height: f32,
    /// Source characters represented on this page
    pub represented_range: SourceRange,
}

impl Page {
    /// Create an empty page
    pub fn new(index: usize, max_height: f32) -> Self {
        Self {
            index,
            max_height,
            blocks: Vec::new(),
            used_height: 0.0,
            represented_range: SourceRange::default(),
        }
    }

    /// Check if nothing has been placed yet
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Get the unused content height
    pub fn remaining(&self) -> f32 {
        self.max_height - self.used_height
    }

    /// Place a block at the current fill height
    pub(crate) fn push(&mut self, block: Block) {
        let y = self.used_height + block.top_margin_on(self.is_empty());
        self.used_height = y + block.height;
        if !block.range.is_empty() {
            self.represented_range.extend_to(block.range);
        }
        self.blocks.push(PlacedBlock { y, block });
    }

    /// Iterate placed elements with frames in page content coordinates
    pub fn elements(&self) -> impl Iterator<Item = (&PlacedLine, Rect)> + '_ {
        self.blocks.iter().flat_map(|placed| {
            placed
                .block
                .elements
                .iter()
                .chain(placed.block.right_column.iter())
                .map(move |element| {
                    let mut frame = element.frame;
                    frame.y += placed.y;
                    (element, frame)
                })
        })
    }

    /// Vertical extent of `range` on this page: (top, bottom) in content
    /// coordinates, or `None` when nothing of the range sits here
    pub(crate) fn extent_of(&self, range: SourceRange) -> Option<(f32, f32)> {
        let mut top: Option<f32> = None;
        let mut bottom: Option<f32> = None;

        for (element, frame) in self.elements() {
            if !element.range.intersects(&range) {
                continue;
            }
            let element_top = frame.y;
            let element_bottom = frame.y + frame.height;
            top = Some(top.map_or(element_top, |t: f32| t.min(element_top)));
            bottom = Some(bottom.map_or(element_bottom, |b: f32| b.max(element_bottom)));
        }

        top.zip(bottom)
    }
}

/// One entry of title page content, e.g. `Title` with its value lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitlePageEntry {
    pub key: String,
    pub values: Vec<String>,
}

impl TitlePageEntry {
    pub fn new(key: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            key: key.into(),
            values,
        }
    }
}

/// Title page content carried through pagination untouched
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TitlePage {
    pub entries: Vec<TitlePageEntry>,
}

impl TitlePage {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The immutable output of one pagination pass
#[derive(Debug, Clone)]
pub struct Pagination {
    /// Composed pages in order
    pub pages: Vec<Arc<Page>>,
    /// Title page content supplied with the operation
    pub title_page: TitlePage,
    /// Whether the pass ran to completion
    pub success: bool,
    /// When the producing operation was created
    pub started_at: Instant,
    /// Start order of the producing operation, newer is larger
    pub sequence: u64,
    /// The line stream this result was computed from
    pub(crate) snapshot: ScriptSnapshot,
    /// Content height the pages were composed against
    pub(crate) max_height: f32,
}

impl Pagination {
    /// Get the page count
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Get the content height the pages were composed against
    pub fn max_page_height(&self) -> f32 {
        self.max_height
    }

    /// Check if this result supersedes another by start order
    pub fn is_newer_than(&self, other: &Pagination) -> bool {
        self.sequence > other.sequence
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::block::Block;

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
    fn test_push_tracks_height_and_range() {
        let mut page = Page::new(0, 648.0);
        assert!(page.is_empty());
        assert_eq!(page.remaining(), 648.0);

        page.push(block(0, 10, 24.0, 12.0));
        // Top margin is dropped at the top of the page
        assert_eq!(page.used_height, 24.0);

        page.push(block(10, 5, 36.0, 12.0));
        assert_eq!(page.used_height, 72.0);
        assert_eq!(page.represented_range, SourceRange::new(0, 15));
    }

    #[test]
    fn test_title_page_entries() {
        let title = TitlePage {
            entries: vec![
                TitlePageEntry::new("Title", vec!["STORM WARNING".into()]),
                TitlePageEntry::new("Author", vec!["A. Writer".into()]),
            ],
        };
        assert!(!title.is_empty());
        assert!(TitlePage::default().is_empty());
    }
}
