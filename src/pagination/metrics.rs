//! Derived measurements over a finished pagination

use crate::pagination::result::Pagination;
use crate::script::SourceRange;

impl Pagination {
    /// Index of the page representing this source offset
    pub fn page_index_for(&self, offset: usize) -> Option<usize> {
        self.pages
            .iter()
            .position(|page| page.represented_range.contains(offset))
    }

    /// Vertical extent of a source range in page heights
    ///
    /// A range spanning pages counts the rest of the first page, every page
    /// between and the used top of the last. Unplaced ranges measure zero.
    pub fn relative_height_for(&self, range: SourceRange) -> f32 {
        if range.is_empty() || self.max_height <= 0.0 {
            return 0.0;
        }

        let mut first: Option<(usize, f32, f32)> = None;
        let mut last: Option<(usize, f32, f32)> = None;
        for (index, page) in self.pages.iter().enumerate() {
            let Some((top, bottom)) = page.extent_of(range) else {
                continue;
            };
            if first.is_none() {
                first = Some((index, top, bottom));
            }
            last = Some((index, top, bottom));
        }

        let Some((first_index, first_top, first_bottom)) = first else {
            return 0.0;
        };
        let (last_index, _, last_bottom) =
            last.unwrap_or((first_index, first_top, first_bottom));

        let height = if last_index == first_index {
            first_bottom - first_top
        } else {
            let whole = (last_index - first_index).saturating_sub(1) as f32;
            (self.max_height - first_top) + whole * self.max_height + last_bottom
        };
        (height / self.max_height).max(0.0)
    }

    /// Length of a source range in whole pages and eighths of a page
    pub fn length_in_eighths(&self, range: SourceRange) -> (usize, usize) {
        eighths_of(self.relative_height_for(range))
    }
}

/// Screenplay convention: any presence counts at least one eighth, and a
/// remainder rounding up to a full page carries over
pub(crate) fn eighths_of(height: f32) -> (usize, usize) {
    if height <= 0.0 {
        return (0, 0);
    }
    let mut pages = height.floor() as usize;
    let mut eighths = ((height - height.floor()) * 8.0).ceil() as usize;
    if eighths == 8 {
        pages += 1;
        eighths = 0;
    }
    if pages == 0 && eighths == 0 {
        eighths = 1;
    }
    (pages, eighths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::pagination::operation::{PaginationOperation, PaginationSettings};
    use crate::pagination::result::TitlePage;
    use crate::script::{Line, ScriptSnapshot};
    use crate::style::ScreenplayStylesheet;

    fn paginated(count: usize) -> Pagination {
        let mut lines = Vec::with_capacity(count);
        let mut offset = 0;
        for i in 0..count {
            let line = Line::action(format!("Action beat number {:04} lands here.", i), offset);
            offset = line.end_offset() + 1;
            lines.push(line);
        }
        PaginationOperation::new(
            ScriptSnapshot::new(lines),
            TitlePage::default(),
            PaginationSettings::default(),
            Arc::new(ScreenplayStylesheet::default()),
        )
        .run()
        .unwrap()
    }

    // Each generated action line is 35 chars starting at a multiple of 36
    fn line_range(first: usize, last: usize) -> SourceRange {
        SourceRange::new(first * 36, (last - first) * 36 + 35)
    }

    #[test]
    fn test_page_index_for_maps_offsets() {
        let result = paginated(60);
        assert_eq!(result.page_count(), 3);
        assert_eq!(result.page_index_for(0), Some(0));
        assert_eq!(result.page_index_for(30 * 36), Some(1));
        assert_eq!(result.page_index_for(59 * 36), Some(2));
        assert_eq!(result.page_index_for(60 * 36), None);
    }

    #[test]
    fn test_relative_height_of_single_line() {
        let result = paginated(30);
        let rel = result.relative_height_for(line_range(0, 0));
        assert!((rel - 12.0 / 648.0).abs() < 1e-6);
    }

    #[test]
    fn test_relative_height_across_pages() {
        // Lines 0..=29 cover all of page one down to 636pt and the first
        // 60pt of page two
        let result = paginated(60);
        let rel = result.relative_height_for(line_range(0, 29));
        assert!((rel - 708.0 / 648.0).abs() < 1e-6);
        assert_eq!(result.length_in_eighths(line_range(0, 29)), (1, 1));
    }

    #[test]
    fn test_relative_height_of_unplaced_range() {
        let result = paginated(10);
        assert_eq!(result.relative_height_for(SourceRange::new(0, 0)), 0.0);
        assert_eq!(result.relative_height_for(SourceRange::new(100_000, 5)), 0.0);
    }

    #[test]
    fn test_eighths_rounding() {
        assert_eq!(eighths_of(0.0), (0, 0));
        assert_eq!(eighths_of(0.05), (0, 1));
        assert_eq!(eighths_of(0.5), (0, 4));
        assert_eq!(eighths_of(0.99), (1, 0));
        assert_eq!(eighths_of(1.0), (1, 0));
        assert_eq!(eighths_of(2.125), (2, 1));
    }
}
