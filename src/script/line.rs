//! Typed script lines produced by the upstream parser

use serde::{Deserialize, Serialize};

/// The kind of script line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineKind {
    SceneHeading,
    Action,
    Character,
    DualDialogueCharacter,
    Parenthetical,
    DualDialogueParenthetical,
    Dialogue,
    DualDialogue,
    Transition,
    Lyrics,
    Centered,
    Section,
    Synopsis,
    PageBreak,
    Empty,
    Note,
}

impl LineKind {
    /// Check if this opens a dialogue block
    pub fn is_character_cue(&self) -> bool {
        matches!(self, LineKind::Character | LineKind::DualDialogueCharacter)
    }

    /// Check if this is consumed into an open dialogue block
    pub fn is_dialogue_element(&self) -> bool {
        matches!(self, LineKind::Parenthetical | LineKind::Dialogue)
    }

    /// Check if this is a dual-dialogue column element
    pub fn is_dual_dialogue_element(&self) -> bool {
        matches!(
            self,
            LineKind::DualDialogueParenthetical | LineKind::DualDialogue
        )
    }

    /// Check if lines of this kind are omitted from print by default
    pub fn invisible_by_default(&self) -> bool {
        matches!(self, LineKind::Section | LineKind::Synopsis | LineKind::Note)
    }

    /// Column-width counterpart used inside dual dialogue blocks
    pub fn dual_equivalent(&self) -> LineKind {
        match self {
            LineKind::Character => LineKind::DualDialogueCharacter,
            LineKind::Parenthetical => LineKind::DualDialogueParenthetical,
            LineKind::Dialogue => LineKind::DualDialogue,
            other => *other,
        }
    }
}

/// One parsed line of the script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// The kind of line
    pub kind: LineKind,
    /// Visible text content
    pub text: String,
    /// Character offset where this line starts in the source document
    pub source_offset: usize,
    /// Length of this line in source characters
    pub source_len: usize,
    /// Opens a dual-dialogue pair
    pub dual_dialogue_start: bool,
    /// Omitted from print unless explicitly requested
    pub invisible: bool,
    /// Explicit page break marker
    pub forced_page_break: bool,
}

impl Line {
    /// Create a line, deriving the flag defaults from its kind
    pub fn new(kind: LineKind, text: impl Into<String>, source_offset: usize) -> Self {
        let text = text.into();
        let source_len = text.chars().count();
        Self {
            invisible: kind.invisible_by_default(),
            forced_page_break: kind == LineKind::PageBreak,
            dual_dialogue_start: false,
            kind,
            text,
            source_offset,
            source_len,
        }
    }

    /// Create a scene heading line
    pub fn scene_heading(text: impl Into<String>, source_offset: usize) -> Self {
        Self::new(LineKind::SceneHeading, text, source_offset)
    }

    /// Create an action line
    pub fn action(text: impl Into<String>, source_offset: usize) -> Self {
        Self::new(LineKind::Action, text, source_offset)
    }

    /// Create a character cue
    pub fn character(text: impl Into<String>, source_offset: usize) -> Self {
        Self::new(LineKind::Character, text, source_offset)
    }

    /// Create a dialogue line
    pub fn dialogue(text: impl Into<String>, source_offset: usize) -> Self {
        Self::new(LineKind::Dialogue, text, source_offset)
    }

    /// Create a parenthetical line
    pub fn parenthetical(text: impl Into<String>, source_offset: usize) -> Self {
        Self::new(LineKind::Parenthetical, text, source_offset)
    }

    /// Create a transition line
    pub fn transition(text: impl Into<String>, source_offset: usize) -> Self {
        Self::new(LineKind::Transition, text, source_offset)
    }

    /// Create a character cue that opens a dual dialogue pair
    pub fn dual_starter(text: impl Into<String>, source_offset: usize) -> Self {
        let mut line = Self::new(LineKind::Character, text, source_offset);
        line.dual_dialogue_start = true;
        line
    }

    /// Create a right-column character cue
    pub fn dual_character(text: impl Into<String>, source_offset: usize) -> Self {
        Self::new(LineKind::DualDialogueCharacter, text, source_offset)
    }

    /// Create a right-column dialogue line
    pub fn dual_dialogue(text: impl Into<String>, source_offset: usize) -> Self {
        Self::new(LineKind::DualDialogue, text, source_offset)
    }

    /// Create an empty separator line
    pub fn empty(source_offset: usize) -> Self {
        Self::new(LineKind::Empty, "", source_offset)
    }

    /// Create an explicit page break marker
    pub fn page_break(source_offset: usize) -> Self {
        Self::new(LineKind::PageBreak, "", source_offset)
    }

    /// Get the exclusive end offset of this line in the source
    pub fn end_offset(&self) -> usize {
        self.source_offset + self.source_len
    }
}
