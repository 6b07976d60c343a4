//! Top-level list state: the asset collection, the filter/search/sort inputs,
//! and the visible projection recomputed from them.

pub mod controller;
pub mod format;
pub mod project;
pub mod sort;

pub use controller::{EmptyState, ListState, SeriesListController};
pub use format::{AssetRow, Trend};
pub use project::{FilterMode, project};
pub use sort::{SortDirection, SortKey, SortState};
