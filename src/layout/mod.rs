//! Block building and page composition

pub mod block;
pub mod compositor;
pub mod measure;

pub use block::{Block, BlockBuilder, PlacedLine};
pub use compositor::{PageCompositor, Placement};
