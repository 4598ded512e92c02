//! Error types for catalog and recommendation operations.
//!
//! Only contract violations are errors. Asking about something that is not
//! there is answered with `Option` or `bool` by the containers and the graph.

use thiserror::Error;

/// Result type alias using `LibraryError`.
pub type Result<T> = std::result::Result<T, LibraryError>;

#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum LibraryError {
    /// A borrow relation was requested between nodes that are not a user and a book.
    #[error("only users can be related to books (user: {user}, isbn: {isbn})")]
    InvalidRelation { user: String, isbn: String },

    #[error("book not found in the store: {0}")]
    BookNotFound(String),

    #[error("category not found in the index: {0}")]
    CategoryNotFound(String),
}
