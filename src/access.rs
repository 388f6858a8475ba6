//! Effective permission resolution
//!
//! A user's access to a note is the strongest of:
//! - ownership (always `Write`)
//! - a direct user grant
//! - grants to any group covering the user (explicit membership or special group)

use uuid::Uuid;
use crate::{Error, Result};
use crate::model::AccessLevel;
use crate::storage::SqliteStore;

/// Resolve what `user_id` may do with `note_id`, `None` when nothing applies
pub fn effective_access(store: &SqliteStore, note_id: Uuid, user_id: Uuid) -> Result<Option<AccessLevel>> {
    let note = store
        .load_note(note_id)?
        .ok_or_else(|| Error::NotFound(format!("note {}", note_id)))?;
    let note = note.note();

    if note.owner_id == Some(user_id) {
        return Ok(Some(AccessLevel::Write));
    }

    let direct = note
        .user_permissions
        .iter()
        .filter(|p| p.user_id == user_id)
        .map(|p| p.access());

    let groups = store.groups_for_user(user_id)?;
    let via_groups = note
        .group_permissions
        .iter()
        .filter(|p| groups.contains(&p.group_id))
        .map(|p| p.access());

    Ok(direct.chain(via_groups).max())
}

/// Resolve access by alias and username, as typed on the command line
pub fn access_by_name(store: &SqliteStore, alias: &str, username: &str) -> Result<Option<AccessLevel>> {
    let note = store
        .find_note_by_alias(alias)?
        .ok_or_else(|| Error::NotFound(format!("note '{}'", alias)))?;
    let user = store
        .find_user_by_username(username)?
        .ok_or_else(|| Error::NotFound(format!("user '{}'", username)))?;
    effective_access(store, note.note().id, user.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Group, Note, User};
    use crate::storage::{NoteGraph, StoreOptions};

    struct Fixture {
        store: SqliteStore,
        owner: User,
        reader: User,
        member: User,
        outsider: User,
        note: Note,
    }

    fn fixture() -> Fixture {
        let mut store = SqliteStore::open_in_memory(&StoreOptions::default()).unwrap();
        let mut owner = User::new("owner", "Owner");
        let reader = User::new("reader", "Reader");
        let member = User::new("member", "Member");
        let outsider = User::new("outsider", "Outsider");
        for user in [&reader, &member, &outsider] {
            store.save_user(user).unwrap();
        }

        let mut editors = Group::new("editors", "Editors");
        editors.add_member(&member);
        editors.add_member(&reader);
        store.save_group(&editors).unwrap();

        let mut note = Note::new(None, Some("plan")).unwrap();
        owner.own(&mut note);
        note.grant_user(&reader, AccessLevel::Read);
        note.grant_group(&editors, AccessLevel::Write);
        store
            .save_note_graph(&NoteGraph { note: &note, owner: Some(&owner), authors: &[] })
            .unwrap();

        Fixture { store, owner, reader, member, outsider, note }
    }

    #[test]
    fn test_owner_has_write() {
        let f = fixture();
        let access = effective_access(&f.store, f.note.id, f.owner.id).unwrap();
        assert_eq!(access, Some(AccessLevel::Write));
    }

    #[test]
    fn test_group_grant_upgrades_direct_grant() {
        let f = fixture();
        assert_eq!(effective_access(&f.store, f.note.id, f.reader.id).unwrap(), Some(AccessLevel::Write));
        assert_eq!(effective_access(&f.store, f.note.id, f.member.id).unwrap(), Some(AccessLevel::Write));
    }

    #[test]
    fn test_outsider_has_nothing() {
        let f = fixture();
        assert_eq!(effective_access(&f.store, f.note.id, f.outsider.id).unwrap(), None);
    }

    #[test]
    fn test_special_group_covers_everyone() {
        let mut f = fixture();
        let everyone = Group::special("_EVERYONE", "Everyone");
        f.store.save_group(&everyone).unwrap();

        let mut public = Note::new(None, Some("public")).unwrap();
        public.grant_group(&everyone, AccessLevel::Read);
        f.store
            .save_note_graph(&NoteGraph { note: &public, owner: None, authors: &[] })
            .unwrap();

        assert_eq!(access_by_name(&f.store, "public", "outsider").unwrap(), Some(AccessLevel::Read));
    }

    #[test]
    fn test_unknown_names_are_not_found() {
        let f = fixture();
        assert!(matches!(access_by_name(&f.store, "missing", "owner"), Err(Error::NotFound(_))));
        assert!(matches!(access_by_name(&f.store, "plan", "nobody"), Err(Error::NotFound(_))));
    }
}
