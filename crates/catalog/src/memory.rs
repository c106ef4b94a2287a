//! In-memory catalog loaded from a JSON snapshot.
//!
//! Snapshot files are either a bare array of books or the backend's
//! response envelope wrapping one, so a saved `GET /admin/books` response
//! can be used directly for offline work.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{CatalogError, Result, TransportError};
use crate::source::CatalogSource;
use crate::types::{ApiResponse, Book, CatalogPage, SearchScope};

#[derive(Deserialize)]
#[serde(untagged)]
enum SnapshotFile {
    Books(Vec<Book>),
    Envelope(CatalogPage),
}

/// A catalog held entirely in memory.
///
/// Searches are case-insensitive substring matches over the fields the
/// scope names. `SearchScope::All` covers title, author, category and
/// description.
#[derive(Debug, Clone)]
pub struct InMemoryCatalog {
    name: String,
    books: Vec<Book>,
}

impl InMemoryCatalog {
    /// Create a catalog from a list of books, keeping their order.
    pub fn new(books: Vec<Book>) -> Self {
        Self {
            name: "in-memory catalog".to_string(),
            books,
        }
    }

    /// Configure the name reported in logs and notifications
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Load a snapshot file from disk.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading catalog snapshot from {:?}", path);
        let contents = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => CatalogError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => CatalogError::IoError(e),
        })?;

        let catalog = Self::from_json_str(&contents, &path.display().to_string())?
            .with_name(format!("catalog file {}", path.display()));
        info!("Loaded {} books", catalog.books.len());
        Ok(catalog)
    }

    /// Parse a snapshot from a JSON string.
    ///
    /// `origin` is only used in error messages.
    pub fn from_json_str(json: &str, origin: &str) -> Result<Self> {
        let parsed: SnapshotFile =
            serde_json::from_str(json).map_err(|e| CatalogError::ParseError {
                path: origin.to_string(),
                reason: e.to_string(),
            })?;

        let books = match parsed {
            SnapshotFile::Books(books) => books,
            SnapshotFile::Envelope(envelope) => envelope.data.unwrap_or_default(),
        };

        let mut seen = HashSet::new();
        for book in &books {
            if !seen.insert(book.id.as_str()) {
                return Err(CatalogError::DuplicateId(book.id.clone()));
            }
        }

        Ok(Self::new(books))
    }

    /// All books, in snapshot order
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    /// Look up a single book by id
    pub fn get_book(&self, id: &str) -> Option<&Book> {
        self.books.iter().find(|book| book.id == id)
    }

    /// Books matching `term` within `scope`, in snapshot order.
    ///
    /// An empty term matches everything.
    pub fn search_books(&self, term: &str, scope: SearchScope) -> Vec<Book> {
        let needle = term.to_lowercase();
        let matches: Vec<Book> = self
            .books
            .iter()
            .filter(|book| matches_scope(book, &needle, scope))
            .cloned()
            .collect();
        debug!(
            "Searched '{}' in scope {}: {} of {} books match",
            term,
            scope,
            matches.len(),
            self.books.len()
        );
        matches
    }
}

fn contains(field: &str, needle: &str) -> bool {
    field.to_lowercase().contains(needle)
}

fn matches_scope(book: &Book, needle: &str, scope: SearchScope) -> bool {
    let title = || contains(&book.title, needle);
    let author = || contains(&book.author, needle);
    let category = || book.category().is_some_and(|c| contains(c, needle));
    let description = || {
        book.description
            .as_deref()
            .is_some_and(|d| contains(d, needle))
    };

    match scope {
        SearchScope::All => title() || author() || category() || description(),
        SearchScope::Title => title(),
        SearchScope::Author => author(),
        SearchScope::Category => category(),
    }
}

#[async_trait]
impl CatalogSource for InMemoryCatalog {
    fn name(&self) -> &str {
        &self.name
    }

    async fn search(&self, term: &str, scope: SearchScope) -> std::result::Result<CatalogPage, TransportError> {
        Ok(ApiResponse::with_data(self.search_books(term, scope)))
    }

    async fn list_all(&self) -> std::result::Result<CatalogPage, TransportError> {
        Ok(ApiResponse::with_data(self.books.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample_catalog() -> InMemoryCatalog {
        InMemoryCatalog::new(vec![
            Book::new("1", "The Hobbit")
                .with_author("J.R.R. Tolkien")
                .with_category("Fiction"),
            Book::new("2", "A Brief History of Time")
                .with_author("Stephen Hawking")
                .with_category("Science"),
            Book::new("3", "SPQR")
                .with_author("Mary Beard")
                .with_category("History")
                .with_description("A history of ancient Rome"),
        ])
    }

    #[test]
    fn test_search_all_fields_case_insensitive() {
        let catalog = sample_catalog();

        let by_title = catalog.search_books("hobbit", SearchScope::All);
        assert_eq!(by_title.len(), 1);
        assert_eq!(by_title[0].id, "1");

        let by_description = catalog.search_books("ROME", SearchScope::All);
        assert_eq!(by_description.len(), 1);
        assert_eq!(by_description[0].id, "3");

        // "history" hits a title, a category and a description, in snapshot order
        let ids: Vec<_> = catalog
            .search_books("history", SearchScope::All)
            .into_iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(ids, vec!["2", "3"]);
    }

    #[test]
    fn test_search_respects_scope() {
        let catalog = sample_catalog();

        assert!(catalog.search_books("tolkien", SearchScope::Title).is_empty());
        assert_eq!(catalog.search_books("tolkien", SearchScope::Author).len(), 1);
        assert_eq!(catalog.search_books("history", SearchScope::Category).len(), 1);
    }

    #[test]
    fn test_empty_term_matches_everything() {
        let catalog = sample_catalog();
        assert_eq!(catalog.search_books("", SearchScope::All).len(), 3);
    }

    #[test]
    fn test_parse_bare_array_and_envelope() {
        let bare = r#"[{"id": "a", "title": "Dune", "category": "Fiction"}]"#;
        let catalog = InMemoryCatalog::from_json_str(bare, "bare").unwrap();
        assert_eq!(catalog.books().len(), 1);
        assert_eq!(catalog.books()[0].category(), Some("Fiction"));

        let envelope = r#"{"sussess": "true", "message": "ok",
            "data": [{"id": "a"}, {"id": "b", "category": null}]}"#;
        let catalog = InMemoryCatalog::from_json_str(envelope, "envelope").unwrap();
        assert_eq!(catalog.books().len(), 2);
        assert_eq!(catalog.books()[1].category(), None);
    }

    #[test]
    fn test_parse_rejects_duplicates_and_garbage() {
        let dupes = r#"[{"id": "a"}, {"id": "a"}]"#;
        assert!(matches!(
            InMemoryCatalog::from_json_str(dupes, "dupes"),
            Err(CatalogError::DuplicateId(id)) if id == "a"
        ));

        assert!(matches!(
            InMemoryCatalog::from_json_str("not json", "garbage"),
            Err(CatalogError::ParseError { .. })
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"id": "1", "title": "Emma", "status": "ACTIVE"}}]"#).unwrap();

        let catalog = InMemoryCatalog::load_from_file(file.path()).unwrap();
        assert_eq!(catalog.books().len(), 1);
        assert_eq!(catalog.get_book("1").and_then(|b| b.status()), Some("ACTIVE"));
        assert!(catalog.name().contains("catalog file"));
    }

    #[test]
    fn test_load_missing_file() {
        let result = InMemoryCatalog::load_from_file(Path::new("/definitely/not/here.json"));
        assert!(matches!(result, Err(CatalogError::FileNotFound { .. })));
    }

    #[tokio::test]
    async fn test_catalog_source_impl() {
        let catalog = sample_catalog();

        let all = catalog.list_all().await.unwrap();
        assert_eq!(all.data.map(|d| d.len()), Some(3));

        let found = catalog.search("beard", SearchScope::All).await.unwrap();
        assert_eq!(found.data.unwrap()[0].id, "3");
    }
}
