//! Text measurement for styled script lines

use unicode_linebreak::{linebreaks, BreakOpportunity};
use unicode_segmentation::UnicodeSegmentation;

use crate::style::{FontMetrics, PageSize, RenderStyle};

/// Count the printed lines `text` occupies at `max_width`
///
/// Greedy wrapping: break at the last opportunity before overflow, with an
/// emergency break mid-word when a single fragment exceeds the width.
/// Trailing whitespace hangs past the right edge.
pub fn wrapped_line_count(text: &str, max_width: f32, metrics: &FontMetrics) -> usize {
    if text.is_empty() {
        return 1;
    }

    let mut breaks = linebreaks(text).peekable();
    let mut count = 1;
    let mut x: f32 = 0.0;
    let mut on_line = 0usize;
    let mut last_allowed: Option<f32> = None;

    for (byte_idx, grapheme) in text.grapheme_indices(true) {
        while let Some(&(offset, kind)) = breaks.peek() {
            if offset > byte_idx {
                break;
            }
            breaks.next();
            if offset == byte_idx {
                match kind {
                    BreakOpportunity::Mandatory => {
                        count += 1;
                        x = 0.0;
                        on_line = 0;
                        last_allowed = None;
                    }
                    BreakOpportunity::Allowed => {
                        last_allowed = Some(x);
                    }
                }
            }
        }

        let is_whitespace = grapheme.chars().all(|c| c.is_whitespace());
        let advance: f32 = if grapheme.chars().all(|c| c.is_control()) {
            0.0
        } else {
            grapheme.chars().map(|c| metrics.width(c)).sum()
        };
        x += advance;
        on_line += 1;

        if !is_whitespace && x > max_width && on_line > 1 {
            count += 1;
            match last_allowed.take() {
                Some(break_x) => x -= break_x,
                None => x = advance,
            }
            on_line = 1;
        }
    }

    count
}

/// Height in points of `text` under `style` on the given paper size
pub fn styled_height(
    text: &str,
    style: &RenderStyle,
    size: PageSize,
    metrics: &FontMetrics,
) -> f32 {
    wrapped_line_count(text, style.width(size), metrics) as f32 * style.line_height
}
