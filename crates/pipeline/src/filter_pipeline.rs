//! The FilterPipeline chains refinement filters.
//!
//! This module provides the main FilterPipeline struct that chains
//! multiple filters together using the builder pattern, plus the
//! `refine` entry point the live search applies after every dispatch.

use catalog::Book;
use tracing;

use crate::criteria::FilterCriteria;
use crate::filters::{CategoryFilter, StatusFilter};
use crate::traits::Filter;

/// Chains multiple filters together into a processing pipeline.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(CategoryFilter)
///     .add_filter(StatusFilter);
///
/// let visible = pipeline.refine(&books, &criteria);
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    /// Create a new empty FilterPipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// The category + status pipeline used by the listing view.
    pub fn refinement() -> Self {
        Self::new().add_filter(CategoryFilter).add_filter(StatusFilter)
    }

    /// Add a filter to the pipeline (builder pattern).
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Apply all filters in sequence, consuming the input.
    pub fn apply(&self, books: Vec<Book>, criteria: &FilterCriteria) -> Vec<Book> {
        let mut current = books;
        for filter in &self.filters {
            tracing::debug!(
                "Applying filter: {} (input count: {})",
                filter.name(),
                current.len()
            );
            current = filter.apply(current, criteria);
            tracing::debug!(
                "Filter applied: {} (output count: {})",
                filter.name(),
                current.len()
            );
        }
        current
    }

    /// Apply all filters to a borrowed slice.
    ///
    /// The input is never touched; the result is always a fresh Vec, even
    /// when no criteria are set.
    pub fn refine(&self, books: &[Book], criteria: &FilterCriteria) -> Vec<Book> {
        self.apply(books.to_vec(), criteria)
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Refine `books` by category and status.
pub fn refine(books: &[Book], criteria: &FilterCriteria) -> Vec<Book> {
    FilterPipeline::refinement().refine(books, criteria)
}
