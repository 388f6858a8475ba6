//! Notes read back from the store with a lazily loaded revision list

use once_cell::unsync::OnceCell;
use crate::Result;
use crate::model::{Alias, Note, Revision};
use super::sqlite::SqliteStore;

/// A stored note whose aliases, tags and grants are loaded eagerly.
///
/// Revisions are fetched from the store on the first call to
/// [`LoadedNote::revisions`] and cached for the lifetime of this value.
pub struct LoadedNote<'s> {
    store: &'s SqliteStore,
    note: Note,
    revisions: OnceCell<Vec<Revision>>,
}

impl<'s> LoadedNote<'s> {
    pub(crate) fn new(store: &'s SqliteStore, note: Note) -> Self {
        Self {
            store,
            note,
            revisions: OnceCell::new(),
        }
    }

    pub fn note(&self) -> &Note {
        &self.note
    }

    pub fn aliases(&self) -> &[Alias] {
        &self.note.aliases
    }

    pub fn primary_alias(&self) -> Option<&Alias> {
        self.note.primary_alias()
    }

    /// Revisions in chronological order, fetched on first use
    pub fn revisions(&self) -> Result<&[Revision]> {
        let revisions = self
            .revisions
            .get_or_try_init(|| self.store.revisions_for_note(self.note.id))?;
        Ok(revisions.as_slice())
    }

    pub fn revisions_loaded(&self) -> bool {
        self.revisions.get().is_some()
    }

    /// Detach from the store, materializing the revisions into the note
    pub fn into_note(self) -> Result<Note> {
        let mut note = self.note;
        note.revisions = match self.revisions.into_inner() {
            Some(revisions) => revisions,
            None => self.store.revisions_for_note(note.id)?,
        };
        Ok(note)
    }
}

impl std::fmt::Debug for LoadedNote<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedNote")
            .field("note", &self.note)
            .field("revisions_loaded", &self.revisions_loaded())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{Author, Edit, Note, Revision};
    use crate::storage::{NoteGraph, SqliteStore, StoreOptions};

    #[test]
    fn test_revisions_load_once() {
        let mut store = SqliteStore::open_in_memory(&StoreOptions::default()).unwrap();
        let author = Author::new(3);
        let mut note = Note::new(None, Some("lazy")).unwrap();
        for content in ["first", "second"] {
            let mut revision = Revision::new(note.id, content, content);
            revision.push_edit(Edit::new(&author, 0, content.len() as i64));
            note.push_revision(revision);
        }
        store
            .save_note_graph(&NoteGraph { note: &note, owner: None, authors: &[author] })
            .unwrap();

        let loaded = store.find_note_by_alias("lazy").unwrap().unwrap();
        assert!(!loaded.revisions_loaded());

        let first = loaded.revisions().unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].content, "first");
        assert!(loaded.revisions_loaded());

        let second = loaded.revisions().unwrap();
        assert!(std::ptr::eq(first, second));

        let detached = loaded.into_note().unwrap();
        assert_eq!(detached.revisions.len(), 2);
    }
}
