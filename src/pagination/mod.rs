//! Pagination passes, their manager and derived measurements

pub mod manager;
pub mod metrics;
pub mod operation;
pub mod result;

pub use manager::PaginationManager;
pub use operation::{CancelFlag, OperationState, PaginationOperation, PaginationSettings};
pub use result::{Page, Pagination, PlacedBlock, TitlePage, TitlePageEntry};
