//! Client-side refinement for the book listing view.
//!
//! This crate provides:
//! - FilterCriteria, the category/status selections held by the client
//! - Filter trait and the category/status implementations
//! - FilterPipeline for composing filters
//! - Category extraction for the category selector
//!
//! ## Architecture
//! Whatever path a search run takes (remote search or full-catalog
//! fallback), its result passes through the same refinement:
//! 1. CategoryFilter keeps books in the selected category
//! 2. StatusFilter keeps books with the selected status
//!
//! Both are independent predicates, so their order does not matter.
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{refine, extract_categories, FilterCriteria};
//!
//! let criteria = FilterCriteria::new().with_category("Fiction");
//! let visible = refine(&books, &criteria);
//! let selector = extract_categories(&books);
//! ```

pub mod categories;
pub mod criteria;
pub mod filter_pipeline;
pub mod filters;
pub mod traits;

// Re-export main types
pub use categories::extract_categories;
pub use criteria::FilterCriteria;
pub use filter_pipeline::{refine, FilterPipeline};
pub use traits::Filter;
