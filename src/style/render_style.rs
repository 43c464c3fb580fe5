//! Per-kind render styles resolved by the style provider

use serde::{Deserialize, Serialize};

/// Default line height in points
pub const DEFAULT_LINE_HEIGHT: f32 = 12.0;

/// Standard screenplay page margins in points
pub const MARGIN_TOP: f32 = 72.0;
pub const MARGIN_BOTTOM: f32 = 72.0;
pub const MARGIN_LEFT: f32 = 108.0;
pub const MARGIN_RIGHT: f32 = 72.0;

/// Target paper size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PageSize {
    #[default]
    UsLetter,
    A4,
}

impl PageSize {
    /// Paper dimensions in points (width, height)
    pub fn dimensions(&self) -> (f32, f32) {
        match self {
            PageSize::UsLetter => (612.0, 792.0),
            PageSize::A4 => (595.0, 842.0),
        }
    }
}

/// Text alignment within the line width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Printable area of a page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageFrame {
    pub size: PageSize,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub margin_right: f32,
}

impl PageFrame {
    /// Standard screenplay frame for the given paper size
    pub fn for_size(size: PageSize) -> Self {
        Self {
            size,
            margin_top: MARGIN_TOP,
            margin_bottom: MARGIN_BOTTOM,
            margin_left: MARGIN_LEFT,
            margin_right: MARGIN_RIGHT,
        }
    }

    /// Get usable content width
    pub fn content_width(&self) -> f32 {
        let (width, _) = self.size.dimensions();
        width - self.margin_left - self.margin_right
    }

    /// Get usable content height per page
    pub fn content_height(&self) -> f32 {
        let (_, height) = self.size.dimensions();
        height - self.margin_top - self.margin_bottom
    }
}

/// Resolved style for one line kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderStyle {
    /// Space above the element when the page already has content
    pub margin_top: f32,
    /// Indent from the left content edge
    pub margin_left: f32,
    /// Height of one printed line
    pub line_height: f32,
    /// Text width on US Letter pages
    pub width_letter: f32,
    /// Text width on A4 pages
    pub width_a4: f32,
    pub text_align: TextAlign,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    /// Element always starts a fresh page
    pub begins_page: bool,
    /// Top margin applies even at the top of a page
    pub forced_margin: bool,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            margin_top: 0.0,
            margin_left: 0.0,
            line_height: DEFAULT_LINE_HEIGHT,
            width_letter: PageFrame::for_size(PageSize::UsLetter).content_width(),
            width_a4: PageFrame::for_size(PageSize::A4).content_width(),
            text_align: TextAlign::Left,
            bold: false,
            italic: false,
            underline: false,
            begins_page: false,
            forced_margin: false,
        }
    }
}

impl RenderStyle {
    /// Get the text width for a paper size
    pub fn width(&self, size: PageSize) -> f32 {
        match size {
            PageSize::UsLetter => self.width_letter,
            PageSize::A4 => self.width_a4,
        }
    }

    /// Top margin that applies when placed on a page in the given state
    pub fn top_margin_on(&self, page_empty: bool) -> f32 {
        if page_empty && !self.forced_margin {
            0.0
        } else {
            self.margin_top
        }
    }

    /// Zero-margin style used when a lookup finds no entry
    pub fn fallback(content_width: f32) -> Self {
        Self {
            width_letter: content_width,
            width_a4: content_width,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_frames() {
        let letter = PageFrame::for_size(PageSize::UsLetter);
        assert_eq!(letter.content_width(), 432.0); // 612 - 108 - 72
        assert_eq!(letter.content_height(), 648.0); // 792 - 72 - 72

        let a4 = PageFrame::for_size(PageSize::A4);
        assert_eq!(a4.content_width(), 415.0);
        assert_eq!(a4.content_height(), 698.0);
    }

    #[test]
    fn test_width_by_size() {
        let style = RenderStyle {
            width_letter: 432.0,
            width_a4: 415.0,
            ..RenderStyle::default()
        };
        assert_eq!(style.width(PageSize::UsLetter), 432.0);
        assert_eq!(style.width(PageSize::A4), 415.0);
    }

    #[test]
    fn test_top_margin_on_page() {
        let style = RenderStyle {
            margin_top: 24.0,
            ..RenderStyle::default()
        };
        assert_eq!(style.top_margin_on(true), 0.0);
        assert_eq!(style.top_margin_on(false), 24.0);

        let forced = RenderStyle {
            margin_top: 24.0,
            forced_margin: true,
            ..RenderStyle::default()
        };
        assert_eq!(forced.top_margin_on(true), 24.0);
    }

    #[test]
    fn test_style_from_json() {
        let style: RenderStyle =
            serde_json::from_str(r#"{"margin_top": 24.0, "bold": true}"#).unwrap();
        assert_eq!(style.margin_top, 24.0);
        assert!(style.bold);
        assert_eq!(style.line_height, DEFAULT_LINE_HEIGHT);
    }
}
