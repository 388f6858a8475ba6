//! Permission grants - user and group access to notes

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::{Error, Result};
use super::note::Note;
use super::user::User;

/// Access right granted on a note. `Write` implies `Read`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    Read,
    Write,
}

impl AccessLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::Read => "read",
            AccessLevel::Write => "write",
        }
    }

    pub fn can_edit(&self) -> bool {
        matches!(self, AccessLevel::Write)
    }

    pub fn from_can_edit(can_edit: bool) -> Self {
        if can_edit { AccessLevel::Write } else { AccessLevel::Read }
    }
}

impl FromStr for AccessLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "read" | "r" | "view" => Ok(AccessLevel::Read),
            "write" | "w" | "edit" => Ok(AccessLevel::Write),
            _ => Err(Error::NotFound(format!("Unknown access level: {}", s))),
        }
    }
}

impl std::fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A named set of users that can receive note grants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: Uuid,
    pub name: String,
    pub display_name: String,
    /// Built-in groups such as "everyone" or "logged-in"
    pub special: bool,
    pub members: Vec<Uuid>,
}

impl Group {
    pub fn new(name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            display_name: display_name.into(),
            special: false,
            members: Vec::new(),
        }
    }

    /// A built-in group covering every user, e.g. `_EVERYONE`
    pub fn special(name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            special: true,
            ..Self::new(name, display_name)
        }
    }

    pub fn add_member(&mut self, user: &User) {
        if !self.members.contains(&user.id) {
            self.members.push(user.id);
        }
    }
}

/// Direct grant from a user to a note
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteUserPermission {
    pub note_id: Uuid,
    pub user_id: Uuid,
    pub can_edit: bool,
}

impl NoteUserPermission {
    pub fn access(&self) -> AccessLevel {
        AccessLevel::from_can_edit(self.can_edit)
    }
}

/// Grant from a group to a note, covering every member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteGroupPermission {
    pub note_id: Uuid,
    pub group_id: Uuid,
    pub can_edit: bool,
}

impl NoteGroupPermission {
    pub fn access(&self) -> AccessLevel {
        AccessLevel::from_can_edit(self.can_edit)
    }
}

impl Note {
    /// Grant `user` access, replacing any previous direct grant
    pub fn grant_user(&mut self, user: &User, level: AccessLevel) {
        self.user_permissions.retain(|p| p.user_id != user.id);
        self.user_permissions.push(NoteUserPermission {
            note_id: self.id,
            user_id: user.id,
            can_edit: level.can_edit(),
        });
    }

    /// Grant `group` access, replacing any previous grant for it
    pub fn grant_group(&mut self, group: &Group, level: AccessLevel) {
        self.group_permissions.retain(|p| p.group_id != group.id);
        self.group_permissions.push(NoteGroupPermission {
            note_id: self.id,
            group_id: group.id,
            can_edit: level.can_edit(),
        });
    }
}
