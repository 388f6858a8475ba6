//! Storage Layer - SQLite-backed persistence
//!
//! System of record is SQLite with tables:
//! - users, identities, sessions, auth_tokens
//! - groups, group_members
//! - notes, aliases, tags, note_tags
//! - revisions, edits, authors
//! - note_user_permissions, note_group_permissions
//! - history_entries, media_uploads

pub mod schema;
pub mod sqlite;
pub mod lazy;

pub use sqlite::{SqliteStore, StoreOptions, NoteGraph, NoteSummary, DbStats};
pub use lazy::LoadedNote;
