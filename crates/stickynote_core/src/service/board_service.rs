//! Board orchestration: gestures in, fresh snapshots out.
//!
//! # Responsibility
//! - Route every user gesture through the note service or transfer helpers.
//! - Reload the full note set after each mutation and publish a new snapshot.
//! - Persist view mode and preview visibility as UI flags.
//!
//! # Invariants
//! - The published snapshot always reflects the store after the last call,
//!   including failed imports that got past `clear`.

use crate::model::geometry::{Position, Size, SizingPolicy};
use crate::model::note::Note;
use crate::repo::note_repo::{NoteRepository, RepoError};
use crate::repo::ui_state_repo::{UiFlag, UiStateRepository};
use crate::service::note_service::{NoteService, NoteServiceError};
use crate::service::transfer::{self, TransferError};
use crate::view::board::{BoardSnapshot, ViewMode};
use log::{debug, error};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

#[derive(Debug)]
pub enum BoardError {
    Note(NoteServiceError),
    Transfer(TransferError),
    Repo(RepoError),
}

impl Display for BoardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Note(err) => write!(f, "{err}"),
            Self::Transfer(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for BoardError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Note(err) => Some(err),
            Self::Transfer(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<NoteServiceError> for BoardError {
    fn from(value: NoteServiceError) -> Self {
        Self::Note(value)
    }
}

impl From<TransferError> for BoardError {
    fn from(value: TransferError) -> Self {
        Self::Transfer(value)
    }
}

impl From<RepoError> for BoardError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

pub type BoardResult<T> = Result<T, BoardError>;

/// Stateful board facade used by front ends.
pub struct BoardService<N: NoteRepository, U: UiStateRepository> {
    notes: NoteService<N>,
    ui: U,
    snapshot: BoardSnapshot,
}

impl<N: NoteRepository, U: UiStateRepository> BoardService<N, U> {
    /// Loads persisted view mode and the full note set.
    pub fn open(notes: N, ui: U) -> BoardResult<Self> {
        let mode = ViewMode::from_flag(ui.get_flag(UiFlag::OrganizedView)?);
        let mut board = Self {
            notes: NoteService::new(notes),
            ui,
            snapshot: BoardSnapshot::from_notes(Vec::new(), mode),
        };
        board.reload()?;
        Ok(board)
    }

    pub fn snapshot(&self) -> &BoardSnapshot {
        &self.snapshot
    }

    /// Re-reads every note and publishes a fresh snapshot.
    pub fn reload(&mut self) -> BoardResult<&BoardSnapshot> {
        let notes = self.notes.list_notes()?;
        debug!(
            "event=board_reload module=board status=ok count={}",
            notes.len()
        );
        self.snapshot = BoardSnapshot::from_notes(notes, self.snapshot.mode());
        Ok(&self.snapshot)
    }

    pub fn add_note(
        &mut self,
        title: &str,
        content: &str,
        sizing: SizingPolicy,
    ) -> BoardResult<Note> {
        let note = self.notes.add_note(title, content, sizing)?;
        self.reload()?;
        Ok(note)
    }

    pub fn edit_note(&mut self, id: &str, title: &str, content: &str) -> BoardResult<Note> {
        let note = self.notes.edit_note(id, title, content)?;
        self.reload()?;
        Ok(note)
    }

    pub fn toggle_pin(&mut self, id: &str) -> BoardResult<Note> {
        let note = self.notes.toggle_pin(id)?;
        self.reload()?;
        Ok(note)
    }

    pub fn resize(&mut self, id: &str, size: Size) -> BoardResult<Note> {
        let note = self.notes.resize(id, size)?;
        self.reload()?;
        Ok(note)
    }

    pub fn move_to(&mut self, id: &str, position: Position) -> BoardResult<Note> {
        let note = self.notes.move_to(id, position)?;
        self.reload()?;
        Ok(note)
    }

    pub fn delete_note(&mut self, id: &str) -> BoardResult<&BoardSnapshot> {
        self.notes.delete_note(id)?;
        self.reload()
    }

    pub fn export_json(&self) -> BoardResult<String> {
        Ok(transfer::export_notes_json(self.notes.repo())?)
    }

    pub fn export_to_path(&self, path: impl AsRef<Path>) -> BoardResult<()> {
        Ok(transfer::export_notes_to_path(self.notes.repo(), path)?)
    }

    /// Replaces all notes with the backup in `text`, then reloads.
    pub fn import_json(&mut self, text: &str) -> BoardResult<usize> {
        let imported = transfer::import_notes_json(self.notes.repo(), text);
        self.finish_import(imported)
    }

    pub fn import_from_path(&mut self, path: impl AsRef<Path>) -> BoardResult<usize> {
        let imported = transfer::import_notes_from_path(self.notes.repo(), path);
        self.finish_import(imported)
    }

    /// Reloads after an import attempt. An import failure outranks a reload
    /// failure; the latter is only logged in that case.
    fn finish_import(&mut self, imported: Result<usize, TransferError>) -> BoardResult<usize> {
        let reloaded = self.reload().map(|_| ());
        match (imported, reloaded) {
            (Ok(count), Ok(())) => Ok(count),
            (Ok(_), Err(err)) => Err(err),
            (Err(err), reloaded) => {
                if let Err(reload_err) = reloaded {
                    error!(
                        "event=board_reload module=board status=error after=import error={reload_err}"
                    );
                }
                Err(err.into())
            }
        }
    }

    /// Persists the view mode and republishes the snapshot in that mode.
    pub fn set_view_mode(&mut self, mode: ViewMode) -> BoardResult<&BoardSnapshot> {
        self.ui.set_flag(UiFlag::OrganizedView, mode.as_flag())?;
        self.snapshot = self.snapshot.with_mode(mode);
        Ok(&self.snapshot)
    }

    pub fn toggle_view_mode(&mut self) -> BoardResult<&BoardSnapshot> {
        let next = self.snapshot.mode().toggled();
        self.set_view_mode(next)
    }

    pub fn preview_enabled(&self) -> BoardResult<bool> {
        Ok(self.ui.get_flag(UiFlag::NotePreview)?)
    }

    pub fn set_preview(&mut self, enabled: bool) -> BoardResult<()> {
        Ok(self.ui.set_flag(UiFlag::NotePreview, enabled)?)
    }

    /// Flips preview visibility and returns the new value.
    pub fn toggle_preview(&mut self) -> BoardResult<bool> {
        let next = !self.preview_enabled()?;
        self.set_preview(next)?;
        Ok(next)
    }
}
