//! Data model - users, notes and the revision graph
//!
//! Entities reference each other by id rather than by memory ownership:
//! - `User` owns notes through `Note::owner_id`
//! - `Note` has aliases, tags, ordered revisions and permission grants
//! - `Revision` is composed of ordered `Edit`s, each attributed to an `Author`
//! - `Author` optionally links to a `User`
//! - `HistoryEntry` records that a user visited a note

pub mod user;
pub mod note;
pub mod revision;
pub mod author;
pub mod permission;
pub mod history;

pub use user::User;
pub use note::{Alias, Note, Tag};
pub use revision::{Edit, Revision};
pub use author::Author;
pub use permission::{AccessLevel, Group, NoteGroupPermission, NoteUserPermission};
pub use history::HistoryEntry;
