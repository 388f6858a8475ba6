//! Users - identity records owning notes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::note::Note;

/// A registered user.
///
/// `username` is unique across all users; the store enforces it with a
/// `UNIQUE` constraint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub display_name: String,
    pub photo: Option<String>,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Ids of notes owned by this user. Persisted as `notes.owner_id`.
    #[serde(default)]
    pub owned_notes: Vec<Uuid>,
}

impl User {
    /// Create a new user with no photo, email or notes
    pub fn new(username: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            username: username.into(),
            display_name: display_name.into(),
            photo: None,
            email: None,
            created_at: Utc::now(),
            owned_notes: Vec::new(),
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Take ownership of a note, updating both sides of the relation
    pub fn own(&mut self, note: &mut Note) {
        note.owner_id = Some(self.id);
        if !self.owned_notes.contains(&note.id) {
            self.owned_notes.push(note.id);
        }
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for User {}
