//! SQLite storage implementation

use std::path::Path;
use rusqlite::{Connection, OpenFlags, OptionalExtension, params};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::{Error, Result};
use crate::model::{
    Alias, Author, Edit, Group, HistoryEntry, Note, NoteGroupPermission, NoteUserPermission,
    Revision, Tag, User,
};
use super::lazy::LoadedNote;
use super::schema;

/// How a store prepares its schema when opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreOptions {
    /// Drop and recreate every table on open
    pub reset: bool,
    /// Install the trigger that aliases unaliased notes by public id
    pub auto_alias: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self { reset: true, auto_alias: true }
    }
}

/// Everything written together when a note is saved.
///
/// Revisions and their edits travel inside `note`; `authors` must cover
/// every edit that references an author not already stored.
#[derive(Debug, Clone, Copy)]
pub struct NoteGraph<'a> {
    pub note: &'a Note,
    pub owner: Option<&'a User>,
    pub authors: &'a [Author],
}

/// SQLite-backed storage for the notes data model
pub struct SqliteStore {
    conn: Connection,
    options: StoreOptions,
}

impl SqliteStore {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path, options: &StoreOptions) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::with_connection(conn, options)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory(options: &StoreOptions) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn, options)
    }

    /// Open an already seeded database read-only, leaving its schema as found.
    ///
    /// Fails with `Error::NotFound` when the file lacks the notes schema.
    pub fn open_existing(path: &Path) -> Result<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_URI | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        let has_schema: bool = conn.query_row(
            "SELECT COUNT(*) = 2 FROM sqlite_master WHERE type = 'table' AND name IN ('users', 'notes')",
            [],
            |row| row.get(0),
        )?;
        if !has_schema {
            return Err(Error::NotFound(format!("noteseed schema in {}", path.display())));
        }
        let auto_alias: bool = conn.query_row(
            "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type = 'trigger' AND name = 'notes_primary_alias'",
            [],
            |row| row.get(0),
        )?;
        Ok(Self {
            conn,
            options: StoreOptions { reset: false, auto_alias },
        })
    }

    fn with_connection(conn: Connection, options: &StoreOptions) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", true)?;
        let store = Self { conn, options: *options };
        if options.reset {
            store.reset_schema()?;
        } else {
            store.initialize_schema()?;
        }
        Ok(store)
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    /// Initialize the database schema
    fn initialize_schema(&self) -> Result<()> {
        for stmt in schema::all_schema_statements(self.options.auto_alias) {
            self.conn.execute(stmt, [])?;
        }
        Ok(())
    }

    /// Drop every table and recreate the schema. Destroys all data.
    pub fn reset_schema(&self) -> Result<()> {
        self.conn.pragma_update(None, "foreign_keys", false)?;
        self.conn.execute(schema::DROP_PRIMARY_ALIAS_TRIGGER, [])?;
        for table in schema::TABLES_DROP_ORDER {
            self.conn.execute(&format!("DROP TABLE IF EXISTS {}", table), [])?;
        }
        self.conn.pragma_update(None, "foreign_keys", true)?;
        tracing::info!("Schema reset ({} tables)", schema::TABLES_DROP_ORDER.len());
        self.initialize_schema()
    }

    // ========== Write Operations ==========

    /// Save a note together with its owner, revisions, edits and authors.
    ///
    /// Runs in one transaction: either the whole graph is stored or nothing is.
    pub fn save_note_graph(&mut self, graph: &NoteGraph<'_>) -> Result<()> {
        let tx = self.conn.transaction()?;

        if let Some(owner) = graph.owner {
            write_user(&tx, owner)?;
        }
        for author in graph.authors {
            write_author(&tx, author)?;
        }

        let note = graph.note;
        // Explicit aliases go in first so the auto-alias trigger skips the note
        for alias in &note.aliases {
            tx.execute(
                "INSERT INTO aliases (name, note_id, primary_alias) VALUES (?1, ?2, ?3)",
                params![alias.name, note.id, alias.primary],
            )?;
        }
        tx.execute(
            "INSERT INTO notes (id, public_id, owner_id, view_count, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![note.id, note.public_id, note.owner_id, note.view_count, note.created_at],
        )?;

        for tag in &note.tags {
            tx.execute("INSERT OR IGNORE INTO tags (name) VALUES (?1)", [&tag.name])?;
            tx.execute(
                "INSERT OR IGNORE INTO note_tags (note_id, tag_id) SELECT ?1, id FROM tags WHERE name = ?2",
                params![note.id, tag.name],
            )?;
        }

        for revision in &note.revisions {
            tx.execute(
                r#"
                INSERT INTO revisions (id, note_id, content, patch, length, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
                params![
                    revision.id,
                    note.id,
                    revision.content,
                    revision.patch,
                    revision.length,
                    revision.created_at,
                ],
            )?;
            for edit in &revision.edits {
                tx.execute(
                    r#"
                    INSERT INTO edits (id, revision_id, author_id, start_pos, length, position, created_at)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                    "#,
                    params![
                        edit.id,
                        revision.id,
                        edit.author_id,
                        edit.start,
                        edit.length,
                        edit.position,
                        edit.created_at,
                    ],
                )?;
            }
        }

        for grant in &note.user_permissions {
            tx.execute(
                "INSERT OR REPLACE INTO note_user_permissions (note_id, user_id, can_edit) VALUES (?1, ?2, ?3)",
                params![note.id, grant.user_id, grant.can_edit],
            )?;
        }
        for grant in &note.group_permissions {
            tx.execute(
                "INSERT OR REPLACE INTO note_group_permissions (note_id, group_id, can_edit) VALUES (?1, ?2, ?3)",
                params![note.id, grant.group_id, grant.can_edit],
            )?;
        }

        tx.commit()?;
        tracing::debug!(
            "Saved note {} ({} revisions, {} authors)",
            note.public_id,
            note.revisions.len(),
            graph.authors.len()
        );
        Ok(())
    }

    /// Insert or update a single user
    pub fn save_user(&self, user: &User) -> Result<()> {
        write_user(&self.conn, user)
    }

    /// Insert or update a group and its members
    pub fn save_group(&mut self, group: &Group) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute(
            r#"
            INSERT INTO groups (id, name, display_name, special) VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(id) DO UPDATE SET name = excluded.name, display_name = excluded.display_name, special = excluded.special
            "#,
            params![group.id, group.name, group.display_name, group.special],
        )?;
        tx.execute("DELETE FROM group_members WHERE group_id = ?1", [group.id])?;
        for member in &group.members {
            tx.execute(
                "INSERT INTO group_members (group_id, user_id) VALUES (?1, ?2)",
                params![group.id, member],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Record a visit; revisiting refreshes the timestamp and pin state
    pub fn save_history_entry(&self, entry: &HistoryEntry) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT INTO history_entries (user_id, note_id, pinned, updated_at) VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(user_id, note_id) DO UPDATE SET pinned = excluded.pinned, updated_at = excluded.updated_at
            "#,
            params![entry.user_id, entry.note_id, entry.pinned, entry.updated_at],
        )?;
        Ok(())
    }

    // ========== User Operations ==========

    /// First user in insertion order
    pub fn find_first_user(&self) -> Result<Option<User>> {
        self.query_user("SELECT id, username, display_name, photo, email, created_at FROM users ORDER BY rowid LIMIT 1", [])
    }

    pub fn find_user(&self, id: Uuid) -> Result<Option<User>> {
        self.query_user("SELECT id, username, display_name, photo, email, created_at FROM users WHERE id = ?1", [id])
    }

    pub fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.query_user(
            "SELECT id, username, display_name, photo, email, created_at FROM users WHERE username = ?1",
            [username],
        )
    }

    /// All users in insertion order
    pub fn list_users(&self) -> Result<Vec<User>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, username, display_name, photo, email, created_at FROM users ORDER BY rowid"
        )?;
        let mut users = stmt
            .query_map([], row_to_user)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        for user in &mut users {
            user.owned_notes = self.owned_note_ids(user.id)?;
        }
        Ok(users)
    }

    fn query_user<P: rusqlite::Params>(&self, sql: &str, params: P) -> Result<Option<User>> {
        let user = self.conn.query_row(sql, params, row_to_user).optional()?;
        match user {
            Some(mut user) => {
                user.owned_notes = self.owned_note_ids(user.id)?;
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }

    fn owned_note_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>> {
        let mut stmt = self.conn.prepare("SELECT id FROM notes WHERE owner_id = ?1 ORDER BY rowid")?;
        let ids = stmt
            .query_map([user_id], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<Uuid>>>()?;
        Ok(ids)
    }

    // ========== Note Operations ==========

    /// First note in insertion order, aliases loaded eagerly
    pub fn find_first_note_with_aliases(&self) -> Result<Option<LoadedNote<'_>>> {
        let id: Option<Uuid> = self.conn
            .query_row("SELECT id FROM notes ORDER BY rowid LIMIT 1", [], |row| row.get(0))
            .optional()?;
        match id {
            Some(id) => self.load_note(id),
            None => Ok(None),
        }
    }

    /// Resolve an alias (or a public id) to a note
    pub fn find_note_by_alias(&self, name: &str) -> Result<Option<LoadedNote<'_>>> {
        let id: Option<Uuid> = self.conn
            .query_row(
                r#"
                SELECT note_id FROM aliases WHERE name = ?1
                UNION ALL
                SELECT id FROM notes WHERE public_id = ?1
                LIMIT 1
                "#,
                [name],
                |row| row.get(0),
            )
            .optional()?;
        match id {
            Some(id) => self.load_note(id),
            None => Ok(None),
        }
    }

    /// Load a note with aliases, tags and grants. Revisions load on first access.
    pub fn load_note(&self, id: Uuid) -> Result<Option<LoadedNote<'_>>> {
        let note = self.conn
            .query_row(
                "SELECT id, public_id, owner_id, view_count, created_at FROM notes WHERE id = ?1",
                [id],
                |row| {
                    Ok(Note {
                        id: row.get(0)?,
                        public_id: row.get(1)?,
                        owner_id: row.get(2)?,
                        aliases: Vec::new(),
                        tags: Vec::new(),
                        revisions: Vec::new(),
                        user_permissions: Vec::new(),
                        group_permissions: Vec::new(),
                        view_count: row.get(3)?,
                        created_at: row.get(4)?,
                    })
                },
            )
            .optional()?;

        let Some(mut note) = note else {
            return Ok(None);
        };
        note.aliases = self.aliases_for_note(id)?;
        note.tags = self.tags_for_note(id)?;
        note.user_permissions = self.user_permissions_for_note(id)?;
        note.group_permissions = self.group_permissions_for_note(id)?;
        Ok(Some(LoadedNote::new(self, note)))
    }

    /// Aliases of a note, primary first
    pub fn aliases_for_note(&self, note_id: Uuid) -> Result<Vec<Alias>> {
        let mut stmt = self.conn.prepare(
            "SELECT name, note_id, primary_alias FROM aliases WHERE note_id = ?1 ORDER BY primary_alias DESC, id"
        )?;
        let aliases = stmt
            .query_map([note_id], |row| {
                Ok(Alias {
                    name: row.get(0)?,
                    note_id: row.get(1)?,
                    primary: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(aliases)
    }

    pub fn tags_for_note(&self, note_id: Uuid) -> Result<Vec<Tag>> {
        let mut stmt = self.conn.prepare(
            "SELECT t.name FROM tags t JOIN note_tags nt ON nt.tag_id = t.id WHERE nt.note_id = ?1 ORDER BY t.name"
        )?;
        let tags = stmt
            .query_map([note_id], |row| Ok(Tag { name: row.get(0)? }))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(tags)
    }

    /// Revisions of a note in chronological order, each with its edits
    pub fn revisions_for_note(&self, note_id: Uuid) -> Result<Vec<Revision>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, note_id, content, patch, length, created_at FROM revisions WHERE note_id = ?1 ORDER BY rowid"
        )?;
        let mut revisions = stmt
            .query_map([note_id], |row| {
                Ok(Revision {
                    id: row.get(0)?,
                    note_id: row.get(1)?,
                    content: row.get(2)?,
                    patch: row.get(3)?,
                    length: row.get(4)?,
                    created_at: row.get(5)?,
                    edits: Vec::new(),
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        for revision in &mut revisions {
            revision.edits = self.edits_for_revision(revision.id)?;
        }
        tracing::debug!("Fetched {} revisions for note {}", revisions.len(), note_id);
        Ok(revisions)
    }

    pub fn edits_for_revision(&self, revision_id: Uuid) -> Result<Vec<Edit>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, revision_id, author_id, start_pos, length, position, created_at
            FROM edits WHERE revision_id = ?1 ORDER BY position
            "#
        )?;
        let edits = stmt
            .query_map([revision_id], |row| {
                Ok(Edit {
                    id: row.get(0)?,
                    revision_id: row.get(1)?,
                    author_id: row.get(2)?,
                    start: row.get(3)?,
                    length: row.get(4)?,
                    position: row.get(5)?,
                    created_at: row.get(6)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(edits)
    }

    pub fn find_author(&self, id: Uuid) -> Result<Option<Author>> {
        self.conn
            .query_row(
                "SELECT id, color, user_id, created_at FROM authors WHERE id = ?1",
                [id],
                |row| {
                    Ok(Author {
                        id: row.get(0)?,
                        color: row.get(1)?,
                        user_id: row.get(2)?,
                        created_at: row.get(3)?,
                    })
                },
            )
            .optional()
            .map_err(Into::into)
    }

    /// Every author linked to a user
    pub fn authors_for_user(&self, user_id: Uuid) -> Result<Vec<Uuid>> {
        let mut stmt = self.conn.prepare("SELECT id FROM authors WHERE user_id = ?1 ORDER BY rowid")?;
        let ids = stmt
            .query_map([user_id], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<Uuid>>>()?;
        Ok(ids)
    }

    // ========== Permission Operations ==========

    pub fn user_permissions_for_note(&self, note_id: Uuid) -> Result<Vec<NoteUserPermission>> {
        let mut stmt = self.conn.prepare(
            "SELECT note_id, user_id, can_edit FROM note_user_permissions WHERE note_id = ?1"
        )?;
        let grants = stmt
            .query_map([note_id], |row| {
                Ok(NoteUserPermission {
                    note_id: row.get(0)?,
                    user_id: row.get(1)?,
                    can_edit: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(grants)
    }

    pub fn group_permissions_for_note(&self, note_id: Uuid) -> Result<Vec<NoteGroupPermission>> {
        let mut stmt = self.conn.prepare(
            "SELECT note_id, group_id, can_edit FROM note_group_permissions WHERE note_id = ?1"
        )?;
        let grants = stmt
            .query_map([note_id], |row| {
                Ok(NoteGroupPermission {
                    note_id: row.get(0)?,
                    group_id: row.get(1)?,
                    can_edit: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(grants)
    }

    /// Groups covering a user: explicit memberships plus every special group
    pub fn groups_for_user(&self, user_id: Uuid) -> Result<Vec<Uuid>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT group_id FROM group_members WHERE user_id = ?1
            UNION
            SELECT id FROM groups WHERE special = 1
            "#
        )?;
        let ids = stmt
            .query_map([user_id], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<Uuid>>>()?;
        Ok(ids)
    }

    // ========== History Operations ==========

    /// History of a user, most recent first
    pub fn history_for_user(&self, user_id: Uuid) -> Result<Vec<HistoryEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT user_id, note_id, pinned, updated_at FROM history_entries WHERE user_id = ?1 ORDER BY updated_at DESC"
        )?;
        let entries = stmt
            .query_map([user_id], |row| {
                Ok(HistoryEntry {
                    user_id: row.get(0)?,
                    note_id: row.get(1)?,
                    pinned: row.get(2)?,
                    updated_at: row.get(3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    // ========== Reporting ==========

    /// One row per note: primary alias, owner and revision count
    pub fn note_summaries(&self) -> Result<Vec<NoteSummary>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT
                n.public_id,
                (SELECT name FROM aliases a WHERE a.note_id = n.id AND a.primary_alias = 1),
                u.username,
                (SELECT COUNT(*) FROM revisions r WHERE r.note_id = n.id)
            FROM notes n
            LEFT JOIN users u ON u.id = n.owner_id
            ORDER BY n.rowid
            "#
        )?;
        let summaries = stmt
            .query_map([], |row| {
                let revisions: i64 = row.get(3)?;
                Ok(NoteSummary {
                    public_id: row.get(0)?,
                    primary_alias: row.get(1)?,
                    owner: row.get(2)?,
                    revisions: revisions as usize,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(summaries)
    }

    fn count(&self, table: &str) -> Result<usize> {
        let count: i64 = self.conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Get database statistics
    pub fn stats(&self) -> Result<DbStats> {
        Ok(DbStats {
            users: self.count("users")?,
            notes: self.count("notes")?,
            aliases: self.count("aliases")?,
            revisions: self.count("revisions")?,
            edits: self.count("edits")?,
            authors: self.count("authors")?,
            permissions: self.count("note_user_permissions")? + self.count("note_group_permissions")?,
            history_entries: self.count("history_entries")?,
            groups: self.count("groups")?,
        })
    }
}

fn write_user(conn: &Connection, user: &User) -> Result<()> {
    conn.execute(
        r#"
        INSERT INTO users (id, username, display_name, photo, email, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        ON CONFLICT(id) DO UPDATE SET
            username = excluded.username,
            display_name = excluded.display_name,
            photo = excluded.photo,
            email = excluded.email
        "#,
        params![user.id, user.username, user.display_name, user.photo, user.email, user.created_at],
    )?;
    Ok(())
}

fn write_author(conn: &Connection, author: &Author) -> Result<()> {
    conn.execute(
        r#"
        INSERT INTO authors (id, color, user_id, created_at) VALUES (?1, ?2, ?3, ?4)
        ON CONFLICT(id) DO UPDATE SET color = excluded.color, user_id = excluded.user_id
        "#,
        params![author.id, author.color, author.user_id, author.created_at],
    )?;
    Ok(())
}

fn row_to_user(row: &rusqlite::Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        display_name: row.get(2)?,
        photo: row.get(3)?,
        email: row.get(4)?,
        created_at: row.get(5)?,
        owned_notes: Vec::new(),
    })
}

/// Note overview row for listings
#[derive(Debug, Clone, Serialize)]
pub struct NoteSummary {
    pub public_id: String,
    pub primary_alias: Option<String>,
    pub owner: Option<String>,
    pub revisions: usize,
}

/// Database statistics
#[derive(Debug, Clone, Serialize)]
pub struct DbStats {
    pub users: usize,
    pub notes: usize,
    pub aliases: usize,
    pub revisions: usize,
    pub edits: usize,
    pub authors: usize,
    pub permissions: usize,
    pub history_entries: usize,
    pub groups: usize,
}

impl DbStats {
    /// Label/value pairs in display order
    pub fn rows(&self) -> Vec<(&'static str, usize)> {
        vec![
            ("Users", self.users),
            ("Notes", self.notes),
            ("Aliases", self.aliases),
            ("Revisions", self.revisions),
            ("Edits", self.edits),
            ("Authors", self.authors),
            ("Permissions", self.permissions),
            ("History entries", self.history_entries),
            ("Groups", self.groups),
        ]
    }
}

impl std::fmt::Display for DbStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Database Statistics:")?;
        for (label, value) in self.rows() {
            writeln!(f, "  {}: {}", label, value)?;
        }
        Ok(())
    }
}
