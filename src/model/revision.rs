//! Revisions and the edits composing them

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::author::Author;

/// An immutable snapshot of a note's content.
///
/// Changes to a note produce a new revision; the content fields of an
/// existing one are never rewritten.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Revision {
    pub id: Uuid,
    pub note_id: Uuid,
    /// Full markdown content at this point in time
    pub content: String,
    /// Patch from the previous revision
    pub patch: String,
    /// Content length in characters
    pub length: i64,
    pub created_at: DateTime<Utc>,
    /// Edits composing this revision, in order
    pub edits: Vec<Edit>,
}

impl Revision {
    /// Create a revision for a note. The length is derived from `content`.
    pub fn new(note_id: Uuid, content: impl Into<String>, patch: impl Into<String>) -> Self {
        let content = content.into();
        let length = content.chars().count() as i64;
        Self {
            id: Uuid::now_v7(),
            note_id,
            content,
            patch: patch.into(),
            length,
            created_at: Utc::now(),
            edits: Vec::new(),
        }
    }

    /// Append an edit, assigning its position and owning revision
    pub fn push_edit(&mut self, mut edit: Edit) {
        edit.revision_id = self.id;
        edit.position = self.edits.len() as i64;
        self.edits.push(edit);
    }

    /// Ids of every author contributing to this revision, first-seen order
    pub fn author_ids(&self) -> Vec<Uuid> {
        let mut ids = Vec::new();
        for edit in &self.edits {
            if !ids.contains(&edit.author_id) {
                ids.push(edit.author_id);
            }
        }
        ids
    }
}

/// An attributable change range within a revision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edit {
    pub id: Uuid,
    pub revision_id: Uuid,
    pub author_id: Uuid,
    /// Character offset where the change starts
    pub start: i64,
    /// Number of characters changed
    pub length: i64,
    /// Order within the owning revision
    pub position: i64,
    pub created_at: DateTime<Utc>,
}

impl Edit {
    /// Create an edit by `author`. It is bound to a revision by `Revision::push_edit`.
    pub fn new(author: &Author, start: i64, length: i64) -> Self {
        Self {
            id: Uuid::now_v7(),
            revision_id: Uuid::nil(),
            author_id: author.id,
            start,
            length,
            position: 0,
            created_at: Utc::now(),
        }
    }

    /// Exclusive end offset
    pub fn end(&self) -> i64 {
        self.start + self.length
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_edit_orders_and_binds() {
        let author = Author::new(1);
        let mut revision = Revision::new(Uuid::now_v7(), "This is a test note", "This is a test note");

        revision.push_edit(Edit::new(&author, 1, 42));
        revision.push_edit(Edit::new(&author, 50, 3));

        assert_eq!(revision.length, 19);
        assert_eq!(revision.edits[0].revision_id, revision.id);
        assert_eq!(revision.edits[1].position, 1);
        assert_eq!(revision.edits[0].end(), 43);
        assert_eq!(revision.author_ids(), vec![author.id]);
    }
}
