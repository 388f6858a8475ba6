//! Database schema definitions
//!
//! Foreign keys are `DEFERRABLE INITIALLY DEFERRED` so a note graph can be
//! written in any order inside one transaction and checked at commit.

/// SQL to create the users table
pub const CREATE_USERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id BLOB PRIMARY KEY,
    username TEXT NOT NULL UNIQUE,
    display_name TEXT NOT NULL,
    photo TEXT,
    email TEXT,
    created_at TEXT NOT NULL
)
"#;

/// SQL to create the identities table (login providers per user)
pub const CREATE_IDENTITIES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS identities (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id BLOB NOT NULL REFERENCES users(id) ON DELETE CASCADE DEFERRABLE INITIALLY DEFERRED,
    provider_type TEXT NOT NULL,
    provider_name TEXT,
    provider_user_id TEXT,
    password_hash TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
"#;

/// SQL to create the sessions table
pub const CREATE_SESSIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS sessions (
    id TEXT PRIMARY KEY,
    user_id BLOB REFERENCES users(id) ON DELETE CASCADE DEFERRABLE INITIALLY DEFERRED,
    expired_at INTEGER NOT NULL,
    json TEXT NOT NULL
)
"#;

/// SQL to create the auth_tokens table
pub const CREATE_AUTH_TOKENS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS auth_tokens (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    key_id TEXT NOT NULL UNIQUE,
    user_id BLOB NOT NULL REFERENCES users(id) ON DELETE CASCADE DEFERRABLE INITIALLY DEFERRED,
    label TEXT NOT NULL,
    hash TEXT NOT NULL,
    valid_until TEXT NOT NULL,
    last_used TEXT,
    created_at TEXT NOT NULL
)
"#;

/// SQL to create the groups table
pub const CREATE_GROUPS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS groups (
    id BLOB PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    display_name TEXT NOT NULL,
    special INTEGER NOT NULL DEFAULT 0
)
"#;

/// SQL to create the group_members table
pub const CREATE_GROUP_MEMBERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS group_members (
    group_id BLOB NOT NULL REFERENCES groups(id) ON DELETE CASCADE DEFERRABLE INITIALLY DEFERRED,
    user_id BLOB NOT NULL REFERENCES users(id) ON DELETE CASCADE DEFERRABLE INITIALLY DEFERRED,
    PRIMARY KEY (group_id, user_id)
)
"#;

/// SQL to create the notes table
pub const CREATE_NOTES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS notes (
    id BLOB PRIMARY KEY,
    public_id TEXT NOT NULL UNIQUE,
    owner_id BLOB REFERENCES users(id) ON DELETE SET NULL DEFERRABLE INITIALLY DEFERRED,
    view_count INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL
)
"#;

/// SQL to create the aliases table
pub const CREATE_ALIASES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS aliases (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    note_id BLOB NOT NULL REFERENCES notes(id) ON DELETE CASCADE DEFERRABLE INITIALLY DEFERRED,
    primary_alias INTEGER NOT NULL DEFAULT 0
)
"#;

/// SQL to create the tags table
pub const CREATE_TAGS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS tags (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
)
"#;

/// SQL to create the note_tags join table
pub const CREATE_NOTE_TAGS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS note_tags (
    note_id BLOB NOT NULL REFERENCES notes(id) ON DELETE CASCADE DEFERRABLE INITIALLY DEFERRED,
    tag_id INTEGER NOT NULL REFERENCES tags(id) ON DELETE CASCADE DEFERRABLE INITIALLY DEFERRED,
    PRIMARY KEY (note_id, tag_id)
)
"#;

/// SQL to create the authors table
pub const CREATE_AUTHORS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS authors (
    id BLOB PRIMARY KEY,
    color INTEGER NOT NULL,
    user_id BLOB REFERENCES users(id) ON DELETE SET NULL DEFERRABLE INITIALLY DEFERRED,
    created_at TEXT NOT NULL
)
"#;

/// SQL to create the revisions table
pub const CREATE_REVISIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS revisions (
    id BLOB PRIMARY KEY,
    note_id BLOB NOT NULL REFERENCES notes(id) ON DELETE CASCADE DEFERRABLE INITIALLY DEFERRED,
    content TEXT NOT NULL,
    patch TEXT NOT NULL,
    length INTEGER NOT NULL,
    created_at TEXT NOT NULL
)
"#;

/// SQL to create the edits table
pub const CREATE_EDITS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS edits (
    id BLOB PRIMARY KEY,
    revision_id BLOB NOT NULL REFERENCES revisions(id) ON DELETE CASCADE DEFERRABLE INITIALLY DEFERRED,
    author_id BLOB NOT NULL REFERENCES authors(id) DEFERRABLE INITIALLY DEFERRED,
    start_pos INTEGER NOT NULL,
    length INTEGER NOT NULL,
    position INTEGER NOT NULL,
    created_at TEXT NOT NULL
)
"#;

/// SQL to create the note_user_permissions table
pub const CREATE_NOTE_USER_PERMISSIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS note_user_permissions (
    note_id BLOB NOT NULL REFERENCES notes(id) ON DELETE CASCADE DEFERRABLE INITIALLY DEFERRED,
    user_id BLOB NOT NULL REFERENCES users(id) ON DELETE CASCADE DEFERRABLE INITIALLY DEFERRED,
    can_edit INTEGER NOT NULL,
    PRIMARY KEY (note_id, user_id)
)
"#;

/// SQL to create the note_group_permissions table
pub const CREATE_NOTE_GROUP_PERMISSIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS note_group_permissions (
    note_id BLOB NOT NULL REFERENCES notes(id) ON DELETE CASCADE DEFERRABLE INITIALLY DEFERRED,
    group_id BLOB NOT NULL REFERENCES groups(id) ON DELETE CASCADE DEFERRABLE INITIALLY DEFERRED,
    can_edit INTEGER NOT NULL,
    PRIMARY KEY (note_id, group_id)
)
"#;

/// SQL to create the history_entries table
pub const CREATE_HISTORY_ENTRIES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS history_entries (
    user_id BLOB NOT NULL REFERENCES users(id) ON DELETE CASCADE DEFERRABLE INITIALLY DEFERRED,
    note_id BLOB NOT NULL REFERENCES notes(id) ON DELETE CASCADE DEFERRABLE INITIALLY DEFERRED,
    pinned INTEGER NOT NULL DEFAULT 0,
    updated_at TEXT NOT NULL,
    PRIMARY KEY (user_id, note_id)
)
"#;

/// SQL to create the media_uploads table
pub const CREATE_MEDIA_UPLOADS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS media_uploads (
    id TEXT PRIMARY KEY,
    note_id BLOB REFERENCES notes(id) ON DELETE SET NULL DEFERRABLE INITIALLY DEFERRED,
    user_id BLOB REFERENCES users(id) ON DELETE SET NULL DEFERRABLE INITIALLY DEFERRED,
    file_url TEXT NOT NULL,
    backend_type TEXT NOT NULL,
    backend_data TEXT,
    created_at TEXT NOT NULL
)
"#;

/// Trigger giving every note inserted without an alias its public id as primary alias
pub const CREATE_PRIMARY_ALIAS_TRIGGER: &str = r#"
CREATE TRIGGER IF NOT EXISTS notes_primary_alias
AFTER INSERT ON notes
WHEN NOT EXISTS (SELECT 1 FROM aliases WHERE note_id = NEW.id)
BEGIN
    INSERT INTO aliases (name, note_id, primary_alias) VALUES (NEW.public_id, NEW.id, 1);
END
"#;

pub const DROP_PRIMARY_ALIAS_TRIGGER: &str = "DROP TRIGGER IF EXISTS notes_primary_alias";

/// SQL to create indexes
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_aliases_primary ON aliases(note_id) WHERE primary_alias = 1",
    "CREATE INDEX IF NOT EXISTS idx_aliases_note ON aliases(note_id)",
    "CREATE INDEX IF NOT EXISTS idx_notes_owner ON notes(owner_id)",
    "CREATE INDEX IF NOT EXISTS idx_revisions_note ON revisions(note_id)",
    "CREATE INDEX IF NOT EXISTS idx_edits_revision ON edits(revision_id)",
    "CREATE INDEX IF NOT EXISTS idx_edits_author ON edits(author_id)",
    "CREATE INDEX IF NOT EXISTS idx_authors_user ON authors(user_id)",
    "CREATE INDEX IF NOT EXISTS idx_group_members_user ON group_members(user_id)",
];

/// Every table, children before parents
pub const TABLES_DROP_ORDER: &[&str] = &[
    "media_uploads",
    "history_entries",
    "note_group_permissions",
    "note_user_permissions",
    "edits",
    "revisions",
    "authors",
    "note_tags",
    "tags",
    "aliases",
    "notes",
    "group_members",
    "groups",
    "auth_tokens",
    "sessions",
    "identities",
    "users",
];

/// All schema creation statements
pub fn all_schema_statements(auto_alias: bool) -> Vec<&'static str> {
    let mut stmts = vec![
        CREATE_USERS_TABLE,
        CREATE_IDENTITIES_TABLE,
        CREATE_SESSIONS_TABLE,
        CREATE_AUTH_TOKENS_TABLE,
        CREATE_GROUPS_TABLE,
        CREATE_GROUP_MEMBERS_TABLE,
        CREATE_NOTES_TABLE,
        CREATE_ALIASES_TABLE,
        CREATE_TAGS_TABLE,
        CREATE_NOTE_TAGS_TABLE,
        CREATE_AUTHORS_TABLE,
        CREATE_REVISIONS_TABLE,
        CREATE_EDITS_TABLE,
        CREATE_NOTE_USER_PERMISSIONS_TABLE,
        CREATE_NOTE_GROUP_PERMISSIONS_TABLE,
        CREATE_HISTORY_ENTRIES_TABLE,
        CREATE_MEDIA_UPLOADS_TABLE,
    ];
    stmts.extend(CREATE_INDEXES.iter().copied());
    if auto_alias {
        stmts.push(CREATE_PRIMARY_ALIAS_TRIGGER);
    } else {
        stmts.push(DROP_PRIMARY_ALIAS_TRIGGER);
    }
    stmts
}
