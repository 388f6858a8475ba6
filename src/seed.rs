//! Seed graph builder
//!
//! Builds three (user, note) pairs, each note carrying one revision with one
//! edit by an author linked to the user, saves every pair in its own
//! transaction and reads the store back before recording a history entry.

use serde::{Deserialize, Serialize};
use crate::Result;
use crate::model::{Author, Edit, HistoryEntry, Note, Revision, User};
use crate::storage::{NoteGraph, SqliteStore};

/// Read-back checks that failed after seeding
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SeedIntegrityError {
    #[error("Could not find freshly seeded user. Aborting.")]
    MissingUser,

    #[error("Could not find freshly seeded note. Aborting.")]
    MissingNote,

    #[error("Could not find alias of freshly seeded note. Aborting.")]
    MissingAlias,
}

/// A user to create while seeding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureUser {
    pub username: String,
    pub display_name: String,
    /// Alias for this user's note; unaliased notes get their public id
    #[serde(default)]
    pub alias: Option<String>,
}

/// Literal values the seeded graph is built from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedFixture {
    /// One note is created per user
    pub users: Vec<FixtureUser>,
    pub content: String,
    pub author_color: i32,
    pub edit_start: i64,
    pub edit_length: i64,
}

impl Default for SeedFixture {
    fn default() -> Self {
        let users = [
            ("hardcoded", "Test User 1"),
            ("hardcoded_2", "Test User 2"),
            ("hardcoded_3", "Test User 3"),
        ]
        .into_iter()
        .map(|(username, display_name)| FixtureUser {
            username: username.to_string(),
            display_name: display_name.to_string(),
            alias: None,
        })
        .collect();

        Self {
            users,
            content: "This is a test note".to_string(),
            author_color: 1,
            edit_start: 1,
            edit_length: 42,
        }
    }
}

/// What was confirmed by read-back
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub username: String,
    pub alias: String,
}

impl SeedReport {
    pub fn lines(&self) -> [String; 3] {
        [
            format!("Created User '{}'", self.username),
            format!("Created Note '{}'", self.alias),
            "Created HistoryEntry".to_string(),
        ]
    }
}

impl std::fmt::Display for SeedReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [user, note, history] = self.lines();
        writeln!(f, "{}", user)?;
        writeln!(f, "{}", note)?;
        write!(f, "{}", history)
    }
}

/// Build the fixture graph, save it and confirm it by reading it back.
///
/// Expects a freshly reset store: seeding twice into the same schema fails
/// on the unique username constraint.
pub fn build_and_persist(store: &mut SqliteStore, fixture: &SeedFixture) -> Result<SeedReport> {
    let users: Vec<User> = fixture
        .users
        .iter()
        .map(|u| User::new(&u.username, &u.display_name))
        .collect();
    let notes = fixture
        .users
        .iter()
        .map(|u| Note::new(None, u.alias.as_deref()))
        .collect::<Result<Vec<_>>>()?;

    for (mut user, mut note) in users.into_iter().zip(notes) {
        let mut author = Author::new(fixture.author_color);
        author.link_user(&user);

        let mut revision = Revision::new(note.id, &fixture.content, &fixture.content);
        revision.push_edit(Edit::new(&author, fixture.edit_start, fixture.edit_length));
        note.push_revision(revision);
        note.user_permissions.clear();
        note.group_permissions.clear();
        user.own(&mut note);

        store.save_note_graph(&NoteGraph {
            note: &note,
            owner: Some(&user),
            authors: std::slice::from_ref(&author),
        })?;
        tracing::debug!("Seeded {} -> {}", user.username, note.public_id);
    }

    let found_user = store
        .find_first_user()?
        .ok_or(SeedIntegrityError::MissingUser)?;
    let found_note = store
        .find_first_note_with_aliases()?
        .ok_or(SeedIntegrityError::MissingNote)?;
    let alias = found_note
        .aliases()
        .first()
        .ok_or(SeedIntegrityError::MissingAlias)?
        .name
        .clone();

    store.save_history_entry(&HistoryEntry::new(&found_user, found_note.note()))?;
    tracing::info!("Seeded {} users into store", fixture.users.len());

    Ok(SeedReport {
        username: found_user.username,
        alias,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::storage::StoreOptions;

    fn seeded() -> (SqliteStore, SeedReport) {
        let mut store = SqliteStore::open_in_memory(&StoreOptions::default()).unwrap();
        let report = build_and_persist(&mut store, &SeedFixture::default()).unwrap();
        (store, report)
    }

    #[test]
    fn test_seed_reports_three_lines() {
        let (store, report) = seeded();
        let note = store.find_first_note_with_aliases().unwrap().unwrap();

        assert_eq!(report.username, "hardcoded");
        assert_eq!(report.alias, note.note().public_id);
        assert_eq!(
            report.to_string(),
            format!("Created User 'hardcoded'\nCreated Note '{}'\nCreated HistoryEntry", report.alias)
        );
    }

    #[test]
    fn test_each_pair_has_one_revision_one_edit() {
        let (store, _) = seeded();

        for username in ["hardcoded", "hardcoded_2", "hardcoded_3"] {
            let user = store.find_user_by_username(username).unwrap().unwrap();
            assert_eq!(user.owned_notes.len(), 1);

            let note = store.load_note(user.owned_notes[0]).unwrap().unwrap();
            assert!(!note.aliases().is_empty());

            let revisions = note.revisions().unwrap();
            assert_eq!(revisions.len(), 1);
            assert_eq!(revisions[0].content, "This is a test note");
            assert_eq!(revisions[0].edits.len(), 1);

            let edit = &revisions[0].edits[0];
            assert_eq!((edit.start, edit.length), (1, 42));
            let author = store.find_author(edit.author_id).unwrap().unwrap();
            assert_eq!(author.user_id, Some(user.id));
            assert_eq!(author.color, 1);
        }
    }

    #[test]
    fn test_usernames_distinct() {
        let (store, _) = seeded();
        let names: Vec<String> = store.list_users().unwrap().into_iter().map(|u| u.username).collect();
        assert_eq!(names, vec!["hardcoded", "hardcoded_2", "hardcoded_3"]);
    }

    #[test]
    fn test_history_entry_links_found_pair() {
        let (store, _) = seeded();
        let user = store.find_first_user().unwrap().unwrap();
        let note = store.find_first_note_with_aliases().unwrap().unwrap();

        let history = store.history_for_user(user.id).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].note_id, note.note().id);
        assert_eq!(store.stats().unwrap().history_entries, 1);
    }

    #[test]
    fn test_missing_auto_alias_fails_integrity_check() {
        let options = StoreOptions { auto_alias: false, ..StoreOptions::default() };
        let mut store = SqliteStore::open_in_memory(&options).unwrap();

        let err = build_and_persist(&mut store, &SeedFixture::default()).unwrap_err();

        assert!(matches!(err, Error::Integrity(SeedIntegrityError::MissingAlias)));
        assert!(err.to_string().contains("alias"));
        assert_eq!(store.stats().unwrap().history_entries, 0);
    }

    #[test]
    fn test_fixture_aliases_name_the_notes() {
        let mut store = SqliteStore::open_in_memory(&StoreOptions::default()).unwrap();
        let mut fixture = SeedFixture::default();
        for (user, alias) in fixture.users.iter_mut().zip(["test", "test2", "test3"]) {
            user.alias = Some(alias.to_string());
        }

        let report = build_and_persist(&mut store, &fixture).unwrap();

        assert_eq!(report.lines()[1], "Created Note 'test'");
        let note = store.find_note_by_alias("test3").unwrap().unwrap();
        assert_eq!(note.aliases().len(), 1);
        assert_eq!(store.stats().unwrap().aliases, 3);
    }

    #[test]
    fn test_invalid_fixture_alias_rejected_before_writing() {
        let mut store = SqliteStore::open_in_memory(&StoreOptions::default()).unwrap();
        let mut fixture = SeedFixture::default();
        fixture.users[1].alias = Some("api".to_string());

        let err = build_and_persist(&mut store, &fixture).unwrap_err();

        assert!(matches!(err, Error::InvalidAlias(_)));
        assert_eq!(store.stats().unwrap().users, 0);
    }

    #[test]
    fn test_empty_fixture_fails_on_missing_user() {
        let mut store = SqliteStore::open_in_memory(&StoreOptions::default()).unwrap();
        let fixture = SeedFixture { users: Vec::new(), ..SeedFixture::default() };

        let err = build_and_persist(&mut store, &fixture).unwrap_err();
        assert!(matches!(err, Error::Integrity(SeedIntegrityError::MissingUser)));
    }

    #[test]
    fn test_reseeding_without_reset_violates_unique_username() {
        let (mut store, _) = seeded();
        let err = build_and_persist(&mut store, &SeedFixture::default()).unwrap_err();
        assert!(matches!(err, Error::Storage(_)));
    }
}
