//! History entries - per-user record of visited notes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::note::Note;
use super::user::User;

/// Records that a user visited or created a note. Unique per (user, note).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub user_id: Uuid,
    pub note_id: Uuid,
    pub pinned: bool,
    pub updated_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(user: &User, note: &Note) -> Self {
        Self {
            user_id: user.id,
            note_id: note.id,
            pinned: false,
            updated_at: Utc::now(),
        }
    }

    pub fn pinned(mut self) -> Self {
        self.pinned = true;
        self
    }
}
