//! Filter to keep only books with the selected status.

use catalog::Book;

use crate::criteria::FilterCriteria;
use crate::traits::Filter;

/// Keeps books whose status equals the selected one exactly.
pub struct StatusFilter;

impl Filter for StatusFilter {
    fn name(&self) -> &str {
        "StatusFilter"
    }

    fn apply(&self, books: Vec<Book>, criteria: &FilterCriteria) -> Vec<Book> {
        match criteria.status.as_deref() {
            None => books,
            Some(selected) => books
                .into_iter()
                .filter(|book| book.status() == Some(selected))
                .collect(),
        }
    }
}
