//! Category extraction for the category selector.

use catalog::Book;
use std::collections::BTreeSet;

/// Distinct, non-empty categories present in `books`.
///
/// Missing and empty categories are skipped. The set is sorted, so the same
/// catalog always yields the same selector contents.
pub fn extract_categories(books: &[Book]) -> BTreeSet<String> {
    books
        .iter()
        .filter_map(|book| book.category())
        .filter(|category| !category.is_empty())
        .map(str::to_string)
        .collect()
}
