//! Core traits for the refinement pipeline.
//!
//! This module defines the Filter trait that allows composable,
//! extensible filters to be applied to a list of books.

use catalog::Book;

use crate::criteria::FilterCriteria;

/// Core trait for refining a result set on the client.
///
/// All filters must implement this trait to be used in the FilterPipeline.
///
/// ## Design Note
/// - `Send + Sync` allows filters to be shared with the search event loop
/// - Filters take ownership of the Vec<Book> and return a filtered Vec
/// - Filters must keep the relative order of the books they retain
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Apply this filter to a set of books.
    ///
    /// # Arguments
    /// * `books` - The books to filter (takes ownership)
    /// * `criteria` - Current category/status selections
    fn apply(&self, books: Vec<Book>, criteria: &FilterCriteria) -> Vec<Book>;
}
