//! Filter to keep only books in the selected category.

use catalog::Book;

use crate::criteria::FilterCriteria;
use crate::traits::Filter;

/// Keeps books whose category equals the selected one exactly.
///
/// ## Algorithm
/// 1. No category selected: pass everything through untouched
/// 2. Otherwise keep books whose `category` is `Some` and byte-equal to the
///    selection (case-sensitive)
pub struct CategoryFilter;

impl Filter for CategoryFilter {
    fn name(&self) -> &str {
        "CategoryFilter"
    }

    fn apply(&self, books: Vec<Book>, criteria: &FilterCriteria) -> Vec<Book> {
        let Some(selected) = criteria.category.as_deref() else {
            return books;
        };
        books
            .into_iter()
            .filter(|book| book.category() == Some(selected))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_filter() {
        let books = vec![
            Book::new("1", "Dune").with_category("Fiction"),
            Book::new("2", "SPQR").with_category("History"),
            Book::new("3", "Emma").with_category("Fiction"),
            Book::new("4", "Untitled"),
        ];

        let criteria = FilterCriteria::new().with_category("Fiction");
        let filtered = CategoryFilter.apply(books, &criteria);

        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].id, "1");
        assert_eq!(filtered[1].id, "3");
    }

    #[test]
    fn test_category_filter_is_case_sensitive() {
        let books = vec![Book::new("1", "Dune").with_category("fiction")];

        let criteria = FilterCriteria::new().with_category("Fiction");
        assert!(CategoryFilter.apply(books, &criteria).is_empty());
    }

    #[test]
    fn test_category_filter_without_selection() {
        let books = vec![Book::new("1", "Dune"), Book::new("2", "SPQR").with_category("History")];

        let filtered = CategoryFilter.apply(books.clone(), &FilterCriteria::new());
        assert_eq!(filtered, books);
    }
}
