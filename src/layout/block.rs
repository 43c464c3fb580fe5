//! Block building: grouping script lines into unsplittable units

use smallvec::SmallVec;

use crate::layout::measure;
use crate::script::{Line, LineKind, SourceRange};
use crate::style::{PageSize, RenderStyle, StyleProvider};
use crate::Rect;

/// One styled line placed inside a block
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    /// Kind after dual-column substitution
    pub kind: LineKind,
    pub text: String,
    /// Source characters this element represents
    pub range: SourceRange,
    pub style: RenderStyle,
    /// Frame relative to the block origin, below the block's top margin
    pub frame: Rect,
}

/// An unsplittable run of placed lines that always stays on one page
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Placed elements in source order; the left column of a dual block
    pub elements: Vec<PlacedLine>,
    /// Right-column elements of a dual-dialogue block
    pub right_column: Vec<PlacedLine>,
    /// Cached content height, top margin excluded
    pub height: f32,
    /// Top margin requested by the opening element's style
    pub top_margin: f32,
    /// Whether the top margin also applies at the top of a page
    pub forced_margin: bool,
    /// Whether this block must start a fresh page
    pub begins_page: bool,
    /// Source characters this block represents
    pub range: SourceRange,
}

impl Block {
    /// Check if this block holds two dialogue columns
    pub fn is_dual(&self) -> bool {
        !self.right_column.is_empty()
    }

    /// Top margin that applies for a page in the given state
    pub fn top_margin_on(&self, page_empty: bool) -> f32 {
        if page_empty && !self.forced_margin {
            0.0
        } else {
            self.top_margin
        }
    }

    /// Placed element count across both columns
    pub fn element_count(&self) -> usize {
        self.elements.len() + self.right_column.len()
    }
}

/// Groups the line stream into blocks
pub struct BlockBuilder<'a> {
    provider: &'a dyn StyleProvider,
    page_size: PageSize,
    content_width: f32,
    include_invisible: bool,
}

impl<'a> BlockBuilder<'a> {
    pub fn new(
        provider: &'a dyn StyleProvider,
        page_size: PageSize,
        include_invisible: bool,
    ) -> Self {
        let content_width = provider.page_frame(page_size).content_width();
        Self {
            provider,
            page_size,
            content_width,
            include_invisible,
        }
    }

    /// Check if a line takes no part in layout
    fn skipped(&self, line: &Line) -> bool {
        if line.forced_page_break {
            return false;
        }
        if line.kind == LineKind::Empty {
            return true;
        }
        if line.invisible && !self.include_invisible {
            return true;
        }
        line.text.is_empty()
    }

    /// Find the first index at or after `start` that the builder lays out
    ///
    /// Forced page break markers count as relevant; callers handle them
    /// before asking for a block.
    pub fn next_relevant(&self, lines: &[Line], start: usize) -> Option<usize> {
        let mut idx = start;
        while let Some(line) = lines.get(idx) {
            if !self.skipped(line) {
                return Some(idx);
            }
            idx += 1;
        }
        None
    }

    /// Build the block starting at `start` and return the first unconsumed index
    pub fn next_block(&self, lines: &[Line], start: usize) -> Option<(Block, usize)> {
        let first = lines.get(start)?;
        if self.skipped(first) || first.forced_page_break {
            return None;
        }
        match first.kind {
            LineKind::SceneHeading => self.heading_block(lines, start),
            kind if kind.is_character_cue() => self.dialogue_block(lines, start),
            _ => Some((self.single_block(first), start + 1)),
        }
    }

    /// Single-line block for transitions, action, lyrics and other lone kinds
    fn single_block(&self, line: &Line) -> Block {
        let (elements, height) = self.place_column(&[line], false, 0.0);
        self.assemble(elements, Vec::new(), height, 0.0)
    }

    /// Scene heading, glued to the following block when one exists and the
    /// glued line is not the last content of the stream
    fn heading_block(&self, lines: &[Line], start: usize) -> Option<(Block, usize)> {
        let heading = self.single_block(&lines[start]);

        let glue_target = match self.next_relevant(lines, start + 1) {
            Some(next)
                if !lines[next].forced_page_break
                    && self.next_relevant(lines, next + 1).is_some() =>
            {
                Some(next)
            }
            _ => None,
        };

        match glue_target {
            Some(next) => {
                let (glued, after) = self.next_block(lines, next)?;
                Some((self.merge_glued(heading, glued), after))
            }
            None => Some((heading, start + 1)),
        }
    }

    /// Dialogue block opened by a character cue, dual columns included
    fn dialogue_block(&self, lines: &[Line], start: usize) -> Option<(Block, usize)> {
        let opening = &lines[start];
        let dual_requested = opening.dual_dialogue_start;
        let mut consumed: SmallVec<[usize; 8]> = SmallVec::new();
        consumed.push(start);
        let mut cues = 1usize;
        let mut idx = start + 1;

        while let Some(line) = lines.get(idx) {
            if line.forced_page_break {
                break;
            }
            if self.skipped(line) {
                if line.kind == LineKind::Empty {
                    break;
                }
                // Notes and blank elements are transparent to grouping
                idx += 1;
                continue;
            }
            let consumes = if dual_requested {
                if line.kind.is_character_cue() {
                    // The third cue belongs to a new block
                    if cues == 2 {
                        false
                    } else {
                        cues += 1;
                        true
                    }
                } else {
                    line.kind.is_dialogue_element() || line.kind.is_dual_dialogue_element()
                }
            } else {
                line.kind.is_dialogue_element()
            };
            if !consumes {
                break;
            }
            consumed.push(idx);
            idx += 1;
        }

        // Partition at the second cue into side-by-side columns
        let second_cue = consumed[1..]
            .iter()
            .position(|&i| lines[i].kind.is_character_cue())
            .map(|p| p + 1);

        let block = match second_cue {
            Some(split) if dual_requested => {
                let left: Vec<&Line> = consumed[..split].iter().map(|&i| &lines[i]).collect();
                let right: Vec<&Line> = consumed[split..].iter().map(|&i| &lines[i]).collect();
                let (left_placed, left_h) = self.place_column(&left, true, 0.0);
                let (right_placed, right_h) =
                    self.place_column(&right, true, self.content_width / 2.0);
                self.assemble(left_placed, right_placed, left_h, right_h)
            }
            _ => {
                let column: Vec<&Line> = consumed.iter().map(|&i| &lines[i]).collect();
                let (placed, height) = self.place_column(&column, false, 0.0);
                self.assemble(placed, Vec::new(), height, 0.0)
            }
        };

        Some((block, idx))
    }

    /// Measure and stack one column of lines from y = 0
    fn place_column(&self, column: &[&Line], dualize: bool, x_shift: f32) -> (Vec<PlacedLine>, f32) {
        let metrics = self.provider.font_metrics();
        let mut placed = Vec::with_capacity(column.len());
        let mut y: f32 = 0.0;

        for (i, line) in column.iter().enumerate() {
            let kind = if dualize {
                line.kind.dual_equivalent()
            } else {
                line.kind
            };
            let style = self.resolved_style(kind, line);
            // The opening element's margin becomes the block's top margin
            if i > 0 {
                y += style.margin_top;
            }
            let x = x_shift + style.margin_left;
            let width = style
                .width(self.page_size)
                .min((self.content_width - x).max(0.0));
            let rows = measure::wrapped_line_count(&line.text, width, metrics);
            let height = rows as f32 * style.line_height;
            placed.push(PlacedLine {
                kind,
                text: line.text.clone(),
                range: SourceRange::new(line.source_offset, line.source_len),
                style,
                frame: Rect::new(x, y, width, height),
            });
            y += height;
        }

        (placed, y)
    }

    /// Finish a block from its placed columns
    fn assemble(
        &self,
        elements: Vec<PlacedLine>,
        right_column: Vec<PlacedLine>,
        left_height: f32,
        right_height: f32,
    ) -> Block {
        let (top_margin, forced_margin, begins_page) = match elements.first() {
            Some(first) => (
                first.style.margin_top,
                first.style.forced_margin,
                first.style.begins_page,
            ),
            None => (0.0, false, false),
        };

        let mut range = SourceRange::default();
        for element in elements.iter().chain(right_column.iter()) {
            range.extend_to(element.range);
        }

        Block {
            elements,
            right_column,
            height: left_height.max(right_height),
            top_margin,
            forced_margin,
            begins_page,
            range,
        }
    }

    /// Append a glued block below a scene heading
    fn merge_glued(&self, heading: Block, mut glued: Block) -> Block {
        let offset = heading.height + glued.top_margin;
        for element in glued
            .elements
            .iter_mut()
            .chain(glued.right_column.iter_mut())
        {
            element.frame.y += offset;
        }

        let mut elements = heading.elements;
        elements.extend(glued.elements);

        let mut range = heading.range;
        range.extend_to(glued.range);

        Block {
            elements,
            right_column: glued.right_column,
            height: offset + glued.height,
            top_margin: heading.top_margin,
            forced_margin: heading.forced_margin,
            begins_page: heading.begins_page || glued.begins_page,
            range,
        }
    }

    fn resolved_style(&self, kind: LineKind, line: &Line) -> RenderStyle {
        match self.provider.style_for(kind, Some(line)) {
            Some(style) => style,
            None => {
                log::debug!("no style entry for {:?}, using fallback", kind);
                RenderStyle::fallback(self.content_width)
            }
        }
    }
}
