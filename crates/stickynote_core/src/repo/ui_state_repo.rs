//! Local UI preference flags.
//!
//! # Responsibility
//! - Persist boolean UI flags (view mode, preview pane) apart from notes.
//!
//! # Invariants
//! - Values are stored as JSON booleans (`true` / `false`).
//! - A missing or unreadable value reads back as the flag's default.

use crate::repo::note_repo::{ensure_schema_ready, RepoResult};
use log::warn;
use rusqlite::{params, Connection, OptionalExtension};

/// Known UI flags and their storage keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiFlag {
    /// `true` when the board is shown in organized mode.
    OrganizedView,
    /// `true` when the editor shows the Markdown preview pane.
    NotePreview,
}

impl UiFlag {
    pub fn key(self) -> &'static str {
        match self {
            Self::OrganizedView => "viewMode",
            Self::NotePreview => "notePreviewState",
        }
    }

    pub fn default_value(self) -> bool {
        match self {
            Self::OrganizedView => false,
            Self::NotePreview => true,
        }
    }
}

/// Storage contract for UI flags.
pub trait UiStateRepository {
    fn get_flag(&self, flag: UiFlag) -> RepoResult<bool>;
    fn set_flag(&self, flag: UiFlag, value: bool) -> RepoResult<()>;
}

/// SQLite-backed UI flag storage.
pub struct SqliteUiStateRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUiStateRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_schema_ready(conn)?;
        Ok(Self { conn })
    }
}

impl UiStateRepository for SqliteUiStateRepository<'_> {
    fn get_flag(&self, flag: UiFlag) -> RepoResult<bool> {
        let stored: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM ui_flags WHERE key = ?1;",
                [flag.key()],
                |row| row.get(0),
            )
            .optional()?;

        let Some(raw) = stored else {
            return Ok(flag.default_value());
        };
        match serde_json::from_str::<bool>(&raw) {
            Ok(value) => Ok(value),
            Err(_) => {
                warn!(
                    "event=ui_flag_read module=repo status=fallback key={}",
                    flag.key()
                );
                Ok(flag.default_value())
            }
        }
    }

    fn set_flag(&self, flag: UiFlag, value: bool) -> RepoResult<()> {
        let encoded = if value { "true" } else { "false" };
        self.conn.execute(
            "INSERT INTO ui_flags (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value;",
            params![flag.key(), encoded],
        )?;
        Ok(())
    }
}
