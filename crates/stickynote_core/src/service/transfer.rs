//! Backup export and import.
//!
//! # Responsibility
//! - Serialize the whole note store into a pretty-printed JSON array.
//! - Replace the store's contents from a backup document.
//!
//! # Invariants
//! - A backup that fails to parse never mutates the store.
//! - Import is `clear` followed by `import_all`; a failure between the two
//!   can leave the store empty.

use crate::model::note::Note;
use crate::repo::note_repo::{NoteRepository, RepoError};
use log::{error, info};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};

/// Default file name for exported backups.
pub const EXPORT_FILE_NAME: &str = "sticky-notes-backup.json";

/// Message shown to the user when an import fails for any reason.
pub const IMPORT_FAILED_MESSAGE: &str = "Error importing notes. Please check the file format.";

#[derive(Debug)]
pub enum TransferError {
    /// Backup text is not a JSON array of note objects.
    Parse(serde_json::Error),
    /// Notes could not be encoded for export.
    Encode(serde_json::Error),
    /// Backup file could not be read or written.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Store read or write failed.
    Repo(RepoError),
}

impl Display for TransferError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "malformed backup: {err}"),
            Self::Encode(err) => write!(f, "failed to encode backup: {err}"),
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) | Self::Encode(err) => Some(err),
            Self::Io { source, .. } => Some(source),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for TransferError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Serializes every stored note as a pretty-printed JSON array.
pub fn export_notes_json<R: NoteRepository>(repo: &R) -> Result<String, TransferError> {
    let notes = repo.get_all()?;
    let json = serde_json::to_string_pretty(&notes).map_err(TransferError::Encode)?;
    info!(
        "event=notes_export module=transfer status=ok count={}",
        notes.len()
    );
    Ok(json)
}

/// Writes the export document to `path`.
pub fn export_notes_to_path<R: NoteRepository>(
    repo: &R,
    path: impl AsRef<Path>,
) -> Result<(), TransferError> {
    let path = path.as_ref();
    let json = export_notes_json(repo)?;
    fs::write(path, json).map_err(|source| TransferError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses backup text without touching the store.
pub fn parse_backup(text: &str) -> Result<Vec<Note>, TransferError> {
    serde_json::from_str(text).map_err(TransferError::Parse)
}

/// Replaces the store's contents with the notes in `text`.
///
/// Returns the number of notes now stored. Records sharing an id collapse
/// into the last one, so this can be smaller than the backup's length.
pub fn import_notes_json<R: NoteRepository>(repo: &R, text: &str) -> Result<usize, TransferError> {
    let result = parse_backup(text).and_then(|notes| {
        repo.clear()?;
        repo.import_all(&notes)?;
        Ok(distinct_ids(&notes))
    });

    match &result {
        Ok(count) => info!("event=notes_import module=transfer status=ok count={count}"),
        Err(err) => error!("event=notes_import module=transfer status=error error={err}"),
    }
    result
}

fn distinct_ids(notes: &[Note]) -> usize {
    notes
        .iter()
        .map(|note| note.id.as_str())
        .collect::<HashSet<_>>()
        .len()
}

/// Reads a backup file and imports it.
pub fn import_notes_from_path<R: NoteRepository>(
    repo: &R,
    path: impl AsRef<Path>,
) -> Result<usize, TransferError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| {
        error!(
            "event=notes_import module=transfer status=error error_code=read_failed error={source}"
        );
        TransferError::Io {
            path: path.to_path_buf(),
            source,
        }
    })?;
    import_notes_json(repo, &text)
}
