//! Pagination error types

use thiserror::Error;

/// Reasons a pagination pass can fail to produce a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PaginationError {
    /// The pass was canceled before it finished
    #[error("pagination canceled")]
    Canceled,
    /// A block's source range did not follow its predecessor
    #[error("inconsistent source range at offset {at}")]
    InconsistentRange { at: usize },
    /// The block builder failed to consume any line
    #[error("no progress at line index {index}")]
    NoProgress { index: usize },
}
