//! Note store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide key-value style persistence for note records addressed by id.
//! - Keep SQL and JSON document encoding inside the persistence boundary.
//!
//! # Invariants
//! - `id` is unique across the store; `add` never overwrites.
//! - `get_all` returns records in ascending id order.
//! - The `pinned` column always mirrors the stored record's `pinned` flag.
//! - Every call is atomic on its own; `clear` + `import_all` is not.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::note::{Note, NoteId};
use log::debug;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Errors from note store operations.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// `add` was called with an id that is already stored.
    AlreadyExists(NoteId),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// A note could not be encoded into its stored JSON document.
    Encode(serde_json::Error),
    /// A stored JSON document does not decode into a note.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::AlreadyExists(id) => write!(f, "note already exists: {id}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "note store requires schema version {expected_version}, got {actual_version}"
            ),
            Self::Encode(err) => write!(f, "failed to encode note: {err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted note data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::AlreadyExists(_)
            | Self::UninitializedConnection { .. }
            | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Persistence contract for note records.
pub trait NoteRepository {
    /// Returns every stored note in id order.
    fn get_all(&self) -> RepoResult<Vec<Note>>;
    /// Returns one note, or `None` when the id is unknown.
    fn get(&self, id: &str) -> RepoResult<Option<Note>>;
    /// Inserts a new note. Fails with `AlreadyExists` on a duplicate id.
    fn add(&self, note: &Note) -> RepoResult<()>;
    /// Inserts or replaces a note by id.
    fn update(&self, note: &Note) -> RepoResult<()>;
    /// Removes a note. Unknown ids are a no-op.
    fn delete(&self, id: &str) -> RepoResult<()>;
    /// Upserts every note in one transaction.
    fn import_all(&self, notes: &[Note]) -> RepoResult<()>;
    /// Removes every note.
    fn clear(&self) -> RepoResult<()>;
}

/// SQLite-backed note store.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn)?;
        Ok(Self { conn })
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn get_all(&self) -> RepoResult<Vec<Note>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, record FROM notes ORDER BY id ASC;")?;
        let mut rows = stmt.query([])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            let id: String = row.get("id")?;
            let record: String = row.get("record")?;
            notes.push(decode_record(&id, &record)?);
        }
        Ok(notes)
    }

    fn get(&self, id: &str) -> RepoResult<Option<Note>> {
        let record: Option<String> = self
            .conn
            .query_row("SELECT record FROM notes WHERE id = ?1;", [id], |row| {
                row.get(0)
            })
            .optional()?;
        record.map(|value| decode_record(id, &value)).transpose()
    }

    fn add(&self, note: &Note) -> RepoResult<()> {
        let record = encode_record(note)?;
        let inserted = self.conn.execute(
            "INSERT INTO notes (id, pinned, record) VALUES (?1, ?2, ?3);",
            params![note.id.as_str(), note.pinned, record],
        );

        match inserted {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::ConstraintViolation =>
            {
                Err(RepoError::AlreadyExists(note.id.clone()))
            }
            Err(err) => Err(err.into()),
        }
    }

    fn update(&self, note: &Note) -> RepoResult<()> {
        upsert(self.conn, note)
    }

    fn delete(&self, id: &str) -> RepoResult<()> {
        let removed = self.conn.execute("DELETE FROM notes WHERE id = ?1;", [id])?;
        debug!("event=note_delete module=repo status=ok removed={removed}");
        Ok(())
    }

    fn import_all(&self, notes: &[Note]) -> RepoResult<()> {
        // Connection is shared by reference; callers never nest transactions.
        let tx = self.conn.unchecked_transaction()?;
        for note in notes {
            upsert(&tx, note)?;
        }
        tx.commit()?;
        debug!(
            "event=note_import_all module=repo status=ok count={}",
            notes.len()
        );
        Ok(())
    }

    fn clear(&self) -> RepoResult<()> {
        let removed = self.conn.execute("DELETE FROM notes;", [])?;
        debug!("event=note_clear module=repo status=ok removed={removed}");
        Ok(())
    }
}

fn upsert(conn: &Connection, note: &Note) -> RepoResult<()> {
    let record = encode_record(note)?;
    conn.execute(
        "INSERT INTO notes (id, pinned, record) VALUES (?1, ?2, ?3)
         ON CONFLICT(id) DO UPDATE SET
            pinned = excluded.pinned,
            record = excluded.record;",
        params![note.id.as_str(), note.pinned, record],
    )?;
    Ok(())
}

fn encode_record(note: &Note) -> RepoResult<String> {
    serde_json::to_string(note).map_err(RepoError::Encode)
}

fn decode_record(id: &str, record: &str) -> RepoResult<Note> {
    let note: Note = serde_json::from_str(record)
        .map_err(|err| RepoError::InvalidData(format!("note `{id}`: {err}")))?;
    if note.id != id {
        return Err(RepoError::InvalidData(format!(
            "note `{id}` stores a record for `{}`",
            note.id
        )));
    }
    Ok(note)
}

pub(crate) fn ensure_schema_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }
    Ok(())
}
