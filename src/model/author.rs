//! Authors - pseudonymous attribution for edits

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::User;

/// Identity that edits are attributed to.
///
/// An author survives its user being anonymous or deleted; a user may be
/// linked to many authors across sessions, an author to at most one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: Uuid,
    /// Style/color index used when rendering attribution
    pub color: i32,
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Author {
    pub fn new(color: i32) -> Self {
        Self {
            id: Uuid::now_v7(),
            color,
            user_id: None,
            created_at: Utc::now(),
        }
    }

    pub fn link_user(&mut self, user: &User) {
        self.user_id = Some(user.id);
    }

    pub fn is_anonymous(&self) -> bool {
        self.user_id.is_none()
    }
}
