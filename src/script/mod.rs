//! Typed script lines and immutable snapshots

pub mod line;
pub mod snapshot;

pub use line::{Line, LineKind};
pub use snapshot::{ScriptSnapshot, SourceRange};
