//! Filter implementations for the refinement pipeline.
//!
//! This module contains all the concrete filter implementations
//! that can be composed into a FilterPipeline.

pub mod category;
pub mod status;

// Re-export for convenience
pub use category::CategoryFilter;
pub use status::StatusFilter;
