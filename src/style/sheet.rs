//! Style provider contract and the built-in screenplay stylesheet

use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::script::{Line, LineKind};
use crate::style::font::FontMetrics;
use crate::style::render_style::{
    PageFrame, PageSize, RenderStyle, TextAlign, MARGIN_BOTTOM, MARGIN_LEFT, MARGIN_RIGHT,
    MARGIN_TOP,
};

/// Resolves styles for the pagination engine
///
/// Implementations must be pure: the same input always yields the same style.
pub trait StyleProvider: Send + Sync {
    /// Style for a line kind, or `None` when the kind has no entry
    ///
    /// The concrete line is passed along so providers can specialize on
    /// content; the built-in stylesheet ignores it.
    fn style_for(&self, kind: LineKind, line: Option<&Line>) -> Option<RenderStyle>;

    /// Printable area for the given paper size
    fn page_frame(&self, size: PageSize) -> PageFrame;

    /// Metrics of the measuring font
    fn font_metrics(&self) -> &FontMetrics;
}

/// Built-in stylesheet following standard screenplay format
///
/// Loadable from JSON so productions can override individual entries.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScreenplayStylesheet {
    /// Style table keyed by line kind
    pub styles: FxHashMap<LineKind, RenderStyle>,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub margin_right: f32,
    #[serde(skip)]
    pub font: FontMetrics,
}

impl Default for ScreenplayStylesheet {
    fn default() -> Self {
        Self {
            styles: standard_styles(),
            margin_top: MARGIN_TOP,
            margin_bottom: MARGIN_BOTTOM,
            margin_left: MARGIN_LEFT,
            margin_right: MARGIN_RIGHT,
            font: FontMetrics::default(),
        }
    }
}

impl ScreenplayStylesheet {
    /// Load a stylesheet from JSON, with absent entries falling back to defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut sheet: ScreenplayStylesheet = serde_json::from_str(json)?;
        // Entries absent from the file keep their standard values
        for (kind, style) in standard_styles() {
            sheet.styles.entry(kind).or_insert(style);
        }
        Ok(sheet)
    }
}

impl StyleProvider for ScreenplayStylesheet {
    fn style_for(&self, kind: LineKind, _line: Option<&Line>) -> Option<RenderStyle> {
        self.styles.get(&kind).copied()
    }

    fn page_frame(&self, size: PageSize) -> PageFrame {
        PageFrame {
            size,
            margin_top: self.margin_top,
            margin_bottom: self.margin_bottom,
            margin_left: self.margin_left,
            margin_right: self.margin_right,
        }
    }

    fn font_metrics(&self) -> &FontMetrics {
        &self.font
    }
}

/// Standard screenplay element table, widths in points
fn standard_styles() -> FxHashMap<LineKind, RenderStyle> {
    let full = RenderStyle::default();
    let mut styles = FxHashMap::default();

    styles.insert(
        LineKind::SceneHeading,
        RenderStyle {
            margin_top: 24.0,
            bold: true,
            ..full
        },
    );
    styles.insert(
        LineKind::Action,
        RenderStyle {
            margin_top: 12.0,
            ..full
        },
    );
    styles.insert(
        LineKind::Character,
        RenderStyle {
            margin_top: 12.0,
            margin_left: 158.4,
            width_letter: 273.6,
            width_a4: 256.6,
            ..full
        },
    );
    styles.insert(
        LineKind::Parenthetical,
        RenderStyle {
            margin_left: 108.0,
            width_letter: 180.0,
            width_a4: 180.0,
            ..full
        },
    );
    styles.insert(
        LineKind::Dialogue,
        RenderStyle {
            margin_left: 72.0,
            width_letter: 252.0,
            width_a4: 252.0,
            ..full
        },
    );
    styles.insert(
        LineKind::Transition,
        RenderStyle {
            margin_top: 12.0,
            text_align: TextAlign::Right,
            ..full
        },
    );
    styles.insert(
        LineKind::Lyrics,
        RenderStyle {
            margin_top: 12.0,
            italic: true,
            ..full
        },
    );
    styles.insert(
        LineKind::Centered,
        RenderStyle {
            margin_top: 12.0,
            text_align: TextAlign::Center,
            ..full
        },
    );
    styles.insert(
        LineKind::Section,
        RenderStyle {
            margin_top: 24.0,
            bold: true,
            ..full
        },
    );
    styles.insert(
        LineKind::Synopsis,
        RenderStyle {
            margin_top: 12.0,
            italic: true,
            ..full
        },
    );
    styles.insert(
        LineKind::Note,
        RenderStyle {
            margin_top: 12.0,
            italic: true,
            ..full
        },
    );
    styles.insert(
        LineKind::DualDialogueCharacter,
        RenderStyle {
            margin_top: 12.0,
            margin_left: 60.0,
            width_letter: 138.0,
            width_a4: 138.0,
            ..full
        },
    );
    styles.insert(
        LineKind::DualDialogueParenthetical,
        RenderStyle {
            margin_left: 24.0,
            width_letter: 156.0,
            width_a4: 156.0,
            ..full
        },
    );
    styles.insert(
        LineKind::DualDialogue,
        RenderStyle {
            width_letter: 180.0,
            width_a4: 180.0,
            ..full
        },
    );

    styles
}
