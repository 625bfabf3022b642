//! Note use-case service.
//!
//! # Responsibility
//! - Provide the note gestures: add, edit, pin toggle, resize, drag, delete.
//! - Derive plain-text excerpts for compact list views.
//!
//! # Invariants
//! - Add and edit reject blank content before touching storage.
//! - Resize stores clamped sizes; drag stores grid-snapped positions.
//! - Every gesture is a read-modify-write through `NoteRepository::update`.

use crate::model::geometry::{Position, Size, SizingPolicy};
use crate::model::note::{normalize_title, validate_content, Note, NoteId, NoteValidationError};
use crate::repo::note_repo::{NoteRepository, RepoError, RepoResult};
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

const EXCERPT_MAX_CHARS: usize = 80;

static MARKDOWN_IMAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[[^\]]*]\(([^)]+)\)").expect("valid image regex"));
static MARKDOWN_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("valid link regex"));
static MARKDOWN_SYMBOL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[\*_`#>~\-\[\]\(\)!|]+"#).expect("valid markdown symbol regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Service error for note use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    /// User input failed validation; nothing was written.
    Invalid(NoteValidationError),
    /// Target note does not exist.
    NoteNotFound(NoteId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Invalid(err) => write!(f, "{err}"),
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent note state: {details}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Invalid(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for NoteServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<NoteValidationError> for NoteServiceError {
    fn from(value: NoteValidationError) -> Self {
        Self::Invalid(value)
    }
}

/// Note service facade over repository implementations.
pub struct NoteService<R: NoteRepository> {
    repo: R,
}

impl<R: NoteRepository> NoteService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Direct access to the underlying store.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Creates one note. Blank titles become `Untitled`.
    ///
    /// # Errors
    /// - `Invalid(BlankContent)` when `content` trims to nothing; no record
    ///   is created.
    pub fn add_note(
        &self,
        title: impl Into<String>,
        content: impl Into<String>,
        sizing: SizingPolicy,
    ) -> Result<Note, NoteServiceError> {
        let note = Note::new(title, content, sizing).inspect_err(|_| {
            warn!("event=note_add module=service status=rejected reason=blank_content");
        })?;
        self.repo.add(&note)?;
        info!(
            "event=note_add module=service status=ok note_id={}",
            note.id
        );

        self.repo
            .get(&note.id)?
            .ok_or(NoteServiceError::InconsistentState(
                "created note not found in read-back",
            ))
    }

    /// Replaces title and content, keeping pin/size/position.
    pub fn edit_note(
        &self,
        id: &str,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<Note, NoteServiceError> {
        let content = content.into();
        validate_content(&content)?;
        let title = normalize_title(title.into());
        self.modify(id, "note_edit", move |note| {
            note.title = title;
            note.content = content;
        })
    }

    /// Flips the pinned flag.
    pub fn toggle_pin(&self, id: &str) -> Result<Note, NoteServiceError> {
        self.modify(id, "note_pin", |note| note.pinned = !note.pinned)
    }

    /// Stores a new size, clamped into the resize bounds.
    pub fn resize(&self, id: &str, size: Size) -> Result<Note, NoteServiceError> {
        let size = size.clamped();
        self.modify(id, "note_resize", move |note| {
            note.width = size.width;
            note.height = size.height;
        })
    }

    /// Stores a new free-mode position, snapped to the drag grid.
    pub fn move_to(&self, id: &str, position: Position) -> Result<Note, NoteServiceError> {
        let position = position.snapped();
        self.modify(id, "note_move", move |note| note.position = Some(position))
    }

    /// Deletes a note; unknown ids are a no-op.
    pub fn delete_note(&self, id: &str) -> RepoResult<()> {
        self.repo.delete(id)?;
        info!("event=note_delete module=service status=ok note_id={id}");
        Ok(())
    }

    pub fn get_note(&self, id: &str) -> RepoResult<Option<Note>> {
        self.repo.get(id)
    }

    /// All notes in storage order.
    pub fn list_notes(&self) -> RepoResult<Vec<Note>> {
        self.repo.get_all()
    }

    fn modify(
        &self,
        id: &str,
        event: &'static str,
        apply: impl FnOnce(&mut Note),
    ) -> Result<Note, NoteServiceError> {
        let mut note = self
            .repo
            .get(id)?
            .ok_or_else(|| NoteServiceError::NoteNotFound(id.to_string()))?;
        apply(&mut note);
        self.repo.update(&note)?;
        info!("event={event} module=service status=ok note_id={id}");
        Ok(note)
    }
}

/// Derives a single-line plain-text excerpt from Markdown content.
///
/// Images are dropped, links keep their label, Markdown symbols are removed
/// and whitespace collapsed. Returns `None` when nothing readable is left.
pub fn markdown_excerpt(content: &str) -> Option<String> {
    let without_images = MARKDOWN_IMAGE_RE.replace_all(content, " ");
    let without_links = MARKDOWN_LINK_RE.replace_all(&without_images, "$1");
    let without_symbols = MARKDOWN_SYMBOL_RE.replace_all(&without_links, " ");
    let normalized = WHITESPACE_RE.replace_all(&without_symbols, " ");
    let trimmed = normalized.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut excerpt: String = trimmed.chars().take(EXCERPT_MAX_CHARS).collect();
    if trimmed.chars().count() > EXCERPT_MAX_CHARS {
        excerpt.push('…');
    }
    Some(excerpt)
}
