//! Immutable script snapshots shared with the pagination worker

use std::sync::Arc;

use crate::script::line::Line;

/// Character range in the source document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceRange {
    /// First character offset
    pub start: usize,
    /// Number of characters
    pub len: usize,
}

impl SourceRange {
    /// Create a new range
    pub fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    /// Get the exclusive end offset
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// Check if the range covers no characters
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Check if `offset` falls inside this range
    pub fn contains(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end()
    }

    /// Check if two ranges overlap
    pub fn intersects(&self, other: &SourceRange) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.start < other.end()
            && other.start < self.end()
    }

    /// Grow this range to cover `other` as well
    pub fn extend_to(&mut self, other: SourceRange) {
        if other.is_empty() {
            return;
        }
        if self.is_empty() {
            *self = other;
            return;
        }
        let end = self.end().max(other.end());
        self.start = self.start.min(other.start);
        self.len = end - self.start;
    }
}

/// Immutable, shareable view of the parsed line stream
#[derive(Debug, Clone, Default)]
pub struct ScriptSnapshot {
    lines: Arc<[Line]>,
}

impl ScriptSnapshot {
    /// Create a snapshot from parsed lines, in source order
    pub fn new(lines: Vec<Line>) -> Self {
        Self {
            lines: lines.into(),
        }
    }

    /// Get all lines
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Get the line count
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Check if the snapshot has no lines
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Get a line by index
    pub fn get(&self, index: usize) -> Option<&Line> {
        self.lines.get(index)
    }

    /// Find the line that starts exactly at `offset`
    pub fn line_index_starting_at(&self, offset: usize) -> Option<usize> {
        self.lines
            .binary_search_by_key(&offset, |line| line.source_offset)
            .ok()
    }

    /// Get the exclusive end offset of the last line
    pub fn source_len(&self) -> usize {
        self.lines.last().map_or(0, |line| line.end_offset())
    }
}
