//! Sticky note domain model.
//!
//! # Responsibility
//! - Define the canonical note record shared by storage, board and export.
//! - Keep the JSON wire shape compatible with exported backup files.
//!
//! # Invariants
//! - `id` is stable and never reused for another note.
//! - `title` is never blank for notes created or edited through core.
//! - Unknown fields of imported records survive a later export untouched.

use crate::model::geometry::{Position, Size, SizingPolicy, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Title used whenever a note is saved without one.
pub const DEFAULT_TITLE: &str = "Untitled";

/// Number of colour slots a note can be painted with.
pub const COLOR_SLOTS: u16 = 5;

/// Stable note identifier.
///
/// New notes get a UUID v4 string; imported notes keep whatever string the
/// backup file carried.
pub type NoteId = String;

/// Validation failures for user-authored note input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    /// Content is empty or whitespace only.
    BlankContent,
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankContent => write!(f, "note content cannot be blank"),
        }
    }
}

impl Error for NoteValidationError {}

/// A user-authored Markdown note with display metadata.
///
/// Decoding is lenient: apart from `id`, a field that is null or of the
/// wrong type falls back to its default instead of rejecting the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    #[serde(deserialize_with = "lenient::id")]
    pub id: NoteId,
    #[serde(default = "default_title", deserialize_with = "lenient::title")]
    pub title: String,
    /// Raw Markdown source.
    #[serde(default, deserialize_with = "lenient::content")]
    pub content: String,
    #[serde(default, deserialize_with = "lenient::pinned")]
    pub pinned: bool,
    #[serde(default = "default_width", deserialize_with = "lenient::width")]
    pub width: f64,
    #[serde(default = "default_height", deserialize_with = "lenient::height")]
    pub height: f64,
    /// Free-mode position; absent on records that were never placed.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::position"
    )]
    pub position: Option<Position>,
    /// Fields this version does not know about, kept for round-trips.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Note {
    /// Builds a new note with a generated id and default display metadata.
    ///
    /// # Errors
    /// - `BlankContent` when `content` trims to nothing.
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        sizing: SizingPolicy,
    ) -> Result<Self, NoteValidationError> {
        Self::with_id(Uuid::new_v4().to_string(), title, content, sizing)
    }

    /// Builds a new note with a caller-provided id.
    pub fn with_id(
        id: impl Into<NoteId>,
        title: impl Into<String>,
        content: impl Into<String>,
        sizing: SizingPolicy,
    ) -> Result<Self, NoteValidationError> {
        let content = content.into();
        validate_content(&content)?;
        let size = sizing.size_for(&content);
        Ok(Self {
            id: id.into(),
            title: normalize_title(title.into()),
            content,
            pinned: false,
            width: size.width,
            height: size.height,
            position: Some(Position::ORIGIN),
            extra: Map::new(),
        })
    }

    /// Current size as a value type.
    pub fn size(&self) -> Size {
        Size {
            width: self.width,
            height: self.height,
        }
    }

    /// Position used for free-mode layout.
    pub fn effective_position(&self) -> Position {
        self.position.unwrap_or(Position::ORIGIN)
    }

    /// Colour slot derived from the first two UTF-16 units of the id.
    ///
    /// Returns `None` for ids shorter than two units.
    pub fn color_index(&self) -> Option<u8> {
        let mut units = self.id.encode_utf16();
        let first = units.next()?;
        let second = units.next()?;
        let sum = u32::from(first) + u32::from(second);
        Some((sum % u32::from(COLOR_SLOTS)) as u8)
    }
}

/// Rejects content that trims to nothing.
pub fn validate_content(content: &str) -> Result<(), NoteValidationError> {
    if content.trim().is_empty() {
        return Err(NoteValidationError::BlankContent);
    }
    Ok(())
}

/// Maps a blank title to [`DEFAULT_TITLE`].
pub fn normalize_title(title: String) -> String {
    if title.trim().is_empty() {
        DEFAULT_TITLE.to_string()
    } else {
        title
    }
}

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

fn default_width() -> f64 {
    DEFAULT_WIDTH
}

fn default_height() -> f64 {
    DEFAULT_HEIGHT
}

mod lenient {
    use super::*;
    use serde::de::Error as _;

    pub(super) fn id<'de, D: Deserializer<'de>>(de: D) -> Result<NoteId, D::Error> {
        match Value::deserialize(de)? {
            Value::String(id) => Ok(id),
            Value::Number(id) => Ok(id.to_string()),
            other => Err(D::Error::custom(format!(
                "note id must be a string or number, got {other}"
            ))),
        }
    }

    pub(super) fn title<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
        Ok(match Value::deserialize(de)? {
            Value::String(title) => title,
            _ => default_title(),
        })
    }

    pub(super) fn content<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
        Ok(match Value::deserialize(de)? {
            Value::String(content) => content,
            _ => String::new(),
        })
    }

    pub(super) fn pinned<'de, D: Deserializer<'de>>(de: D) -> Result<bool, D::Error> {
        Ok(Value::deserialize(de)?.as_bool().unwrap_or(false))
    }

    pub(super) fn width<'de, D: Deserializer<'de>>(de: D) -> Result<f64, D::Error> {
        Ok(Value::deserialize(de)?.as_f64().unwrap_or(DEFAULT_WIDTH))
    }

    pub(super) fn height<'de, D: Deserializer<'de>>(de: D) -> Result<f64, D::Error> {
        Ok(Value::deserialize(de)?.as_f64().unwrap_or(DEFAULT_HEIGHT))
    }

    pub(super) fn position<'de, D: Deserializer<'de>>(
        de: D,
    ) -> Result<Option<Position>, D::Error> {
        Ok(serde_json::from_value(Value::deserialize(de)?).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_index_uses_first_two_code_units() {
        let mut note = Note::with_id("ab", "", "x", SizingPolicy::Fixed).unwrap();
        // 'a' = 97, 'b' = 98
        assert_eq!(note.color_index(), Some(((97 + 98) % 5) as u8));

        note.id = "a".to_string();
        assert_eq!(note.color_index(), None);
    }

    #[test]
    fn mistyped_fields_fall_back_to_defaults() {
        let note: Note = serde_json::from_str(
            r#"{"id": "a", "title": null, "content": 5, "pinned": 1,
                "width": "300", "height": null, "position": "top-left"}"#,
        )
        .unwrap();
        assert_eq!(note.title, DEFAULT_TITLE);
        assert_eq!(note.content, "");
        assert!(!note.pinned);
        assert_eq!((note.width, note.height), (DEFAULT_WIDTH, DEFAULT_HEIGHT));
        assert_eq!(note.position, None);
        assert!(note.extra.is_empty());
    }

    #[test]
    fn numeric_id_is_kept_as_string() {
        let note: Note = serde_json::from_str(r#"{"id": 7, "content": "x"}"#).unwrap();
        assert_eq!(note.id, "7");
    }

    #[test]
    fn missing_or_null_id_is_rejected() {
        assert!(serde_json::from_str::<Note>(r#"{"content": "x"}"#).is_err());
        assert!(serde_json::from_str::<Note>(r#"{"id": null}"#).is_err());
    }

    #[test]
    fn well_typed_position_still_decodes() {
        let note: Note =
            serde_json::from_str(r#"{"id": "a", "position": {"x": 10, "y": -20}}"#).unwrap();
        assert_eq!(note.position, Some(Position { x: 10.0, y: -20.0 }));
    }

    #[test]
    fn blank_title_becomes_untitled() {
        let note = Note::new("   ", "body", SizingPolicy::Fixed).unwrap();
        assert_eq!(note.title, DEFAULT_TITLE);
    }
}
