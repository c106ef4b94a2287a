//! Error types for the catalog crate.
//!
//! Two families live here:
//! - `CatalogError` for loading a catalog snapshot from disk
//! - `TransportError`, the single failure kind a `CatalogSource` reports

use thiserror::Error;

/// Errors that can occur while loading a catalog snapshot file
#[derive(Error, Debug)]
pub enum CatalogError {
    /// File could not be found or opened
    #[error("Failed to open catalog file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// File contents were not a book array or response envelope
    #[error("Invalid catalog JSON in {path}: {reason}")]
    ParseError { path: String, reason: String },

    /// Two books in the snapshot share an id
    #[error("Duplicate book id in catalog: {0}")]
    DuplicateId(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, CatalogError>;

/// A remote call was rejected or never completed.
///
/// This is the only failure the search pipeline has to deal with; it is
/// reported to the user and otherwise swallowed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Connection could not be established or was dropped
    #[error("Connection to {source_name} failed: {reason}")]
    Connection { source_name: String, reason: String },

    /// Backend answered with a non-success status
    #[error("{source_name} returned HTTP {status}: {body}")]
    Status {
        source_name: String,
        status: u16,
        body: String,
    },

    /// Response body could not be decoded
    #[error("Invalid response from {source_name}: {reason}")]
    InvalidResponse { source_name: String, reason: String },
}
