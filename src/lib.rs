//! # Noteseed - sample data for the collaborative notes data model
//!
//! Noteseed resets a SQLite database and fills it with a small, internally
//! consistent graph of notes for manual testing:
//! - Users owning notes, authors attributing edits to users
//! - Notes with aliases, ordered revisions and the edits composing them
//! - User and group permission grants, history entries
//!
//! The graph is built in memory, saved one note at a time inside a
//! transaction and then read back to confirm the write.

pub mod model;
pub mod storage;
pub mod seed;
pub mod access;
pub mod config;
pub mod ui;

// Re-exports for convenient access
pub use model::{
    AccessLevel, Alias, Author, Edit, Group, HistoryEntry, Note, NoteGroupPermission,
    NoteUserPermission, Revision, User,
};
pub use seed::{SeedFixture, SeedIntegrityError, SeedReport, build_and_persist};
pub use storage::{SqliteStore, StoreOptions};

/// Result type alias for Noteseed operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Noteseed operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Integrity(#[from] SeedIntegrityError),

    #[error("Invalid alias: {0}")]
    InvalidAlias(String),

    #[error("Not found: {0}")]
    NotFound(String),
}
