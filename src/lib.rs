//! Script-Press: a screenplay pagination engine
//!
//! This crate turns a parsed screenplay into US-industry pages with:
//! - Line grouping into unbreakable blocks (dialogue runs, dual dialogue, glued scene headings)
//! - Page composition with whole-block overflow and forced breaks
//! - Live repagination that reuses untouched pages across edits
//! - Scene length reporting in eighths of a page

pub mod error;
pub mod layout;
pub mod pagination;
pub mod script;
pub mod style;

// Re-export primary types
pub use error::PaginationError;
pub use layout::{Block, BlockBuilder, PageCompositor, PlacedLine};
pub use pagination::{
    CancelFlag, OperationState, Page, Pagination, PaginationManager, PaginationOperation,
    PaginationSettings, PlacedBlock, TitlePage, TitlePageEntry,
};
pub use script::{Line, LineKind, ScriptSnapshot, SourceRange};
pub use style::{
    FontMetrics, PageFrame, PageSize, RenderStyle, ScreenplayStylesheet, StyleProvider, TextAlign,
};

/// Layout coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// Layout rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains_point(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }
}
