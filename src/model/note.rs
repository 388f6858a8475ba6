//! Notes, aliases and tags

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};
use super::permission::{NoteGroupPermission, NoteUserPermission};
use super::revision::Revision;

/// Length of a generated public id
pub const PUBLIC_ID_LEN: usize = 20;

/// Alias names that collide with application routes
pub const RESERVED_ALIASES: &[&str] = &["new", "api", "me", "media", "history", "profile", "n", "s", "p"];

static ALIAS_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.~-]+$").unwrap());
static PUBLIC_ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("^[0-9a-f]{{{}}}$", PUBLIC_ID_LEN)).unwrap());

/// Generate a fresh public id for a note
pub fn generate_public_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(PUBLIC_ID_LEN);
    id
}

/// Check that a name may be used as an alias.
///
/// Rejects empty names, characters outside `[A-Za-z0-9_.~-]`, reserved
/// route names and anything shaped like a public id.
pub fn validate_alias(name: &str) -> Result<()> {
    if !ALIAS_PATTERN.is_match(name) {
        return Err(Error::InvalidAlias(format!("'{}' contains invalid characters", name)));
    }
    if RESERVED_ALIASES.contains(&name.to_lowercase().as_str()) {
        return Err(Error::InvalidAlias(format!("'{}' is reserved", name)));
    }
    if PUBLIC_ID_PATTERN.is_match(name) {
        return Err(Error::InvalidAlias(format!("'{}' looks like a public id", name)));
    }
    Ok(())
}

/// Human-readable name resolving to a note
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alias {
    pub name: String,
    pub note_id: Uuid,
    /// Exactly one alias per note is primary
    pub primary: bool,
}

/// Free-form label attached to notes
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A note document.
///
/// `revisions` is append-only and kept in chronological order. A note built
/// without an alias gets its public id as primary alias when it is saved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub public_id: String,
    pub owner_id: Option<Uuid>,
    pub aliases: Vec<Alias>,
    pub tags: Vec<Tag>,
    pub revisions: Vec<Revision>,
    pub user_permissions: Vec<NoteUserPermission>,
    pub group_permissions: Vec<NoteGroupPermission>,
    pub view_count: i64,
    pub created_at: DateTime<Utc>,
}

impl Note {
    /// Create a note, optionally owned and optionally aliased
    pub fn new(owner_id: Option<Uuid>, alias: Option<&str>) -> Result<Self> {
        let mut note = Self {
            id: Uuid::now_v7(),
            public_id: generate_public_id(),
            owner_id,
            aliases: Vec::new(),
            tags: Vec::new(),
            revisions: Vec::new(),
            user_permissions: Vec::new(),
            group_permissions: Vec::new(),
            view_count: 0,
            created_at: Utc::now(),
        };
        if let Some(name) = alias {
            note.add_alias(name)?;
        }
        Ok(note)
    }

    /// Add an alias; the first one added becomes primary
    pub fn add_alias(&mut self, name: &str) -> Result<&Alias> {
        validate_alias(name)?;
        if self.aliases.iter().any(|a| a.name == name) {
            return Err(Error::InvalidAlias(format!("'{}' already assigned", name)));
        }
        let primary = self.aliases.is_empty();
        self.aliases.push(Alias {
            name: name.to_string(),
            note_id: self.id,
            primary,
        });
        Ok(&self.aliases[self.aliases.len() - 1])
    }

    pub fn primary_alias(&self) -> Option<&Alias> {
        self.aliases.iter().find(|a| a.primary)
    }

    pub fn add_tag(&mut self, tag: Tag) {
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
    }

    /// Append a revision, re-homing it to this note
    pub fn push_revision(&mut self, mut revision: Revision) {
        revision.note_id = self.id;
        self.revisions.push(revision);
    }

    pub fn latest_revision(&self) -> Option<&Revision> {
        self.revisions.last()
    }
}
