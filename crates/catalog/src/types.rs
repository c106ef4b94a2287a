//! Core domain types for the library catalog.
//!
//! This module defines the records exchanged with the library backend:
//! - Type aliases for domain clarity (BookId)
//! - The Book record shown in the listing view
//! - The ApiResponse envelope the backend wraps payloads in
//! - SearchScope, the field set a remote search runs against

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a book (opaque string issued by the backend)
pub type BookId = String;

/// A catalog page as returned by list and search calls
pub type CatalogPage = ApiResponse<Vec<Book>>;

// =============================================================================
// Book
// =============================================================================

/// A book in the library catalog.
///
/// Only `category` and `status` are interpreted by the search pipeline;
/// everything else is carried through for display. Every field except `id`
/// tolerates being absent so partial payloads still decode.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: BookId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    /// `None` when the backend sends `null` or omits the field
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub total_copies: u32,
    #[serde(default)]
    pub available_copies: u32,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub availability_status: Option<String>,
    #[serde(default)]
    pub created_date: Option<String>,
    #[serde(default)]
    pub updated_date: Option<String>,
}

impl Book {
    /// Create a book with just an id and title; remaining fields default.
    pub fn new(id: impl Into<BookId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            active: true,
            ..Self::default()
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_copies(mut self, total: u32, available: u32) -> Self {
        self.total_copies = total;
        self.available_copies = available;
        self
    }

    /// Category as a plain `&str`, if present
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Status as a plain `&str`, if present
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Availability badge used by the listing view.
    ///
    /// Inactive books and books without copies are unavailable; books with
    /// copies on the shelf are available; everything else is fully loaned out.
    pub fn availability(&self) -> Availability {
        if !self.active || self.total_copies == 0 {
            Availability::Unavailable
        } else if self.available_copies > 0 {
            Availability::Available
        } else {
            Availability::OnLoan
        }
    }
}

/// Shelf state derived from copy counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Availability {
    Available,
    OnLoan,
    Unavailable,
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Availability::Available => "available",
            Availability::OnLoan => "on loan",
            Availability::Unavailable => "unavailable",
        };
        f.write_str(label)
    }
}

// =============================================================================
// Envelope
// =============================================================================

/// Response envelope used by the library backend.
///
/// Some backend endpoints spell the flag `sussess`; it decodes into its own
/// field so an envelope carrying both keys still parses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub success: Option<serde_json::Value>,
    #[serde(default, rename = "sussess", skip_serializing_if = "Option::is_none")]
    pub legacy_success: Option<serde_json::Value>,
    pub message: Option<String>,
    /// Missing and `null` both decode to `None`
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Wrap a payload in a successful envelope
    pub fn with_data(data: T) -> Self {
        Self {
            success: Some(serde_json::Value::Bool(true)),
            legacy_success: None,
            message: None,
            data: Some(data),
        }
    }

    /// The success flag under whichever spelling the backend used
    pub fn success_flag(&self) -> Option<&serde_json::Value> {
        self.success.as_ref().or(self.legacy_success.as_ref())
    }

    /// An envelope that carries no payload
    pub fn empty() -> Self {
        Self {
            success: None,
            legacy_success: None,
            message: None,
            data: None,
        }
    }
}

// =============================================================================
// Search scope
// =============================================================================

/// Which book fields a search term is matched against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchScope {
    #[default]
    All,
    Title,
    Author,
    Category,
}

impl SearchScope {
    /// Value sent as the `searchType` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchScope::All => "all",
            SearchScope::Title => "title",
            SearchScope::Author => "author",
            SearchScope::Category => "category",
        }
    }
}

impl fmt::Display for SearchScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
