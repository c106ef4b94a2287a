//! # Catalog Crate
//!
//! Domain types and the source abstraction for the library book catalog.
//!
//! ## Main Components
//!
//! - **types**: Book, the backend response envelope, search scopes
//! - **source**: the `CatalogSource` trait the live search talks to
//! - **memory**: an in-memory catalog loaded from a JSON snapshot
//! - **error**: snapshot loading errors and the transport failure kind
//!
//! ## Example Usage
//!
//! ```ignore
//! use catalog::{CatalogSource, InMemoryCatalog, SearchScope};
//! use std::path::Path;
//!
//! let catalog = InMemoryCatalog::load_from_file(Path::new("books.json"))?;
//! let page = catalog.search("tolkien", SearchScope::All).await?;
//! println!("{} matches", page.data.unwrap_or_default().len());
//! ```

// Public modules
pub mod error;
pub mod memory;
pub mod source;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{CatalogError, Result, TransportError};
pub use memory::InMemoryCatalog;
pub use source::CatalogSource;
pub use types::{ApiResponse, Availability, Book, BookId, CatalogPage, SearchScope};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_decodes_camel_case() {
        let json = r#"{
            "id": "42",
            "title": "Dune",
            "author": "Frank Herbert",
            "category": "Fiction",
            "imageUrl": "http://img/dune.png",
            "totalCopies": 4,
            "availableCopies": 1,
            "active": true,
            "availabilityStatus": "Available",
            "createdDate": "2024-05-01T10:00:00"
        }"#;

        let book: Book = serde_json::from_str(json).unwrap();
        assert_eq!(book.id, "42");
        assert_eq!(book.image_url.as_deref(), Some("http://img/dune.png"));
        assert_eq!(book.total_copies, 4);
        assert_eq!(book.available_copies, 1);
        assert_eq!(book.status(), None);
        assert_eq!(book.updated_date, None);
    }

    #[test]
    fn test_envelope_with_and_without_data() {
        let with: CatalogPage =
            serde_json::from_str(r#"{"sussess": "true", "message": "ok", "data": [{"id": "1"}]}"#)
                .unwrap();
        assert_eq!(with.message.as_deref(), Some("ok"));
        assert_eq!(with.data.map(|d| d.len()), Some(1));

        let without: CatalogPage = serde_json::from_str(r#"{"success": false}"#).unwrap();
        assert!(without.data.is_none());

        let null_data: CatalogPage = serde_json::from_str(r#"{"data": null}"#).unwrap();
        assert!(null_data.data.is_none());
    }

    #[test]
    fn test_envelope_with_both_flag_spellings() {
        let both: CatalogPage = serde_json::from_str(
            r#"{"success": true, "sussess": "true", "data": [{"id": "1"}, {"id": "2"}]}"#,
        )
        .unwrap();
        assert_eq!(both.data.as_ref().map(|d| d.len()), Some(2));
        assert_eq!(both.success_flag(), Some(&serde_json::json!(true)));

        let legacy: CatalogPage = serde_json::from_str(r#"{"sussess": "true"}"#).unwrap();
        assert_eq!(legacy.success_flag(), Some(&serde_json::json!("true")));
    }

    #[test]
    fn test_availability() {
        let on_shelf = Book::new("1", "A").with_copies(3, 2);
        assert_eq!(on_shelf.availability(), Availability::Available);

        let loaned = Book::new("2", "B").with_copies(3, 0);
        assert_eq!(loaned.availability(), Availability::OnLoan);

        let no_copies = Book::new("3", "C");
        assert_eq!(no_copies.availability(), Availability::Unavailable);

        let mut retired = Book::new("4", "D").with_copies(1, 1);
        retired.active = false;
        assert_eq!(retired.availability(), Availability::Unavailable);
    }

    #[test]
    fn test_search_scope_wire_values() {
        assert_eq!(SearchScope::default(), SearchScope::All);
        assert_eq!(SearchScope::All.as_str(), "all");
        assert_eq!(SearchScope::Author.to_string(), "author");
    }
}
