//! Board snapshots and layout derivation.
//!
//! # Responsibility
//! - Hold the in-memory mirror of the note store as an immutable snapshot.
//! - Derive the pinned/unpinned partition and both presentation layouts.
//!
//! # Invariants
//! - Every pinned note precedes every unpinned note in `notes()`.
//! - Within each partition, storage order is preserved (stable sort).
//! - Free layout uses stored geometry; organized layout ignores it.

use crate::model::geometry::{Position, Size};
use crate::model::note::Note;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Heading of the pinned section in organized mode.
pub const PINNED_SECTION_LABEL: &str = "📌 Pinned Notes";
/// Heading of the unpinned section, shown only next to a pinned section.
pub const OTHER_SECTION_LABEL: &str = "Other Notes";
/// Minimum grid cell width used to derive the organized column count.
pub const GRID_CELL_WIDTH: u32 = 300;

/// Presentation mode of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Absolute-positioned, draggable and resizable notes.
    #[default]
    Free,
    /// Grid layout partitioned by pin state.
    Organized,
}

impl ViewMode {
    /// Maps the persisted `viewMode` flag (`true` = organized).
    pub fn from_flag(organized: bool) -> Self {
        if organized {
            Self::Organized
        } else {
            Self::Free
        }
    }

    pub fn as_flag(self) -> bool {
        matches!(self, Self::Organized)
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Free => Self::Organized,
            Self::Organized => Self::Free,
        }
    }
}

/// Failure to turn a user-typed id or id prefix into one note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdLookupError {
    NoMatch(String),
    Ambiguous { prefix: String, matches: usize },
}

impl Display for IdLookupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoMatch(key) => write!(f, "no note with id {key}"),
            Self::Ambiguous { prefix, matches } => {
                write!(f, "id prefix {prefix} matches {matches} notes")
            }
        }
    }
}

impl Error for IdLookupError {}

/// Immutable view of the board after one reload.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoardSnapshot {
    notes: Vec<Note>,
    mode: ViewMode,
}

impl BoardSnapshot {
    /// Builds a snapshot from a full store read, ordering pinned notes first.
    pub fn from_notes(mut notes: Vec<Note>, mode: ViewMode) -> Self {
        sort_pinned_first(&mut notes);
        Self { notes, mode }
    }

    /// Notes in display order.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    /// Finds a note by full id, or by a prefix that only one id starts with.
    pub fn resolve(&self, key: &str) -> Result<&Note, IdLookupError> {
        if let Some(note) = self.find(key) {
            return Ok(note);
        }
        if key.is_empty() {
            return Err(IdLookupError::NoMatch(String::new()));
        }

        let mut matches = self.notes.iter().filter(|note| note.id.starts_with(key));
        match (matches.next(), matches.count()) {
            (Some(note), 0) => Ok(note),
            (Some(_), rest) => Err(IdLookupError::Ambiguous {
                prefix: key.to_string(),
                matches: rest + 1,
            }),
            (None, _) => Err(IdLookupError::NoMatch(key.to_string())),
        }
    }

    pub fn pinned(&self) -> impl Iterator<Item = &Note> {
        self.notes.iter().filter(|note| note.pinned)
    }

    pub fn unpinned(&self) -> impl Iterator<Item = &Note> {
        self.notes.iter().filter(|note| !note.pinned)
    }

    /// Same notes, different presentation mode.
    pub fn with_mode(&self, mode: ViewMode) -> Self {
        Self {
            notes: self.notes.clone(),
            mode,
        }
    }

    /// Absolute placement of every note, in display order.
    pub fn free_layout(&self) -> Vec<PlacedNote<'_>> {
        self.notes
            .iter()
            .map(|note| PlacedNote {
                note,
                position: note.effective_position(),
                size: note.size().clamped(),
            })
            .collect()
    }

    /// Grid sections for a container of `container_width` pixels.
    pub fn organized_layout(&self, container_width: u32) -> OrganizedLayout<'_> {
        let columns = (container_width / GRID_CELL_WIDTH).max(1);
        let pinned: Vec<&Note> = self.pinned().collect();
        let has_pinned = !pinned.is_empty();

        let pinned_section =
            has_pinned.then(|| GridSection::new(Some(PINNED_SECTION_LABEL), pinned, columns));
        let others = GridSection::new(
            has_pinned.then_some(OTHER_SECTION_LABEL),
            self.unpinned().collect(),
            columns,
        );

        OrganizedLayout {
            columns,
            pinned: pinned_section,
            others,
        }
    }
}

/// One note with its free-mode geometry resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedNote<'a> {
    pub note: &'a Note,
    pub position: Position,
    pub size: Size,
}

/// Organized-mode layout: optional pinned section, then everything else.
#[derive(Debug, Clone, PartialEq)]
pub struct OrganizedLayout<'a> {
    pub columns: u32,
    pub pinned: Option<GridSection<'a>>,
    pub others: GridSection<'a>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridSection<'a> {
    pub label: Option<&'static str>,
    pub cells: Vec<GridCell<'a>>,
}

impl<'a> GridSection<'a> {
    fn new(label: Option<&'static str>, notes: Vec<&'a Note>, columns: u32) -> Self {
        let cells = notes
            .into_iter()
            .enumerate()
            .map(|(index, note)| {
                let index = index as u32;
                GridCell {
                    note,
                    row: index / columns,
                    column: index % columns,
                }
            })
            .collect();
        Self { label, cells }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridCell<'a> {
    pub note: &'a Note,
    pub row: u32,
    pub column: u32,
}

/// Stable partition: pinned notes first, relative order otherwise kept.
pub fn sort_pinned_first(notes: &mut [Note]) {
    notes.sort_by_key(|note| !note.pinned);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::geometry::SizingPolicy;

    fn note(id: &str, pinned: bool) -> Note {
        let mut note = Note::with_id(id, id, "body", SizingPolicy::Fixed).unwrap();
        note.pinned = pinned;
        note
    }

    #[test]
    fn pinned_first_is_stable() {
        let snapshot = BoardSnapshot::from_notes(
            vec![
                note("a", false),
                note("b", true),
                note("c", false),
                note("d", true),
            ],
            ViewMode::Free,
        );
        let ids: Vec<&str> = snapshot.notes().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, ["b", "d", "a", "c"]);
    }

    #[test]
    fn resolve_accepts_full_ids_and_unique_prefixes() {
        let snapshot = BoardSnapshot::from_notes(
            vec![note("3f2a9c1e-aa", false), note("3f2b0000-bb", true), note("3f", false)],
            ViewMode::Free,
        );

        assert_eq!(snapshot.resolve("3f2a").unwrap().id, "3f2a9c1e-aa");
        assert_eq!(snapshot.resolve("3f2b0000-bb").unwrap().id, "3f2b0000-bb");
        // exact id wins even though it prefixes others
        assert_eq!(snapshot.resolve("3f").unwrap().id, "3f");
        assert_eq!(
            snapshot.resolve("3f2"),
            Err(IdLookupError::Ambiguous {
                prefix: "3f2".to_string(),
                matches: 2,
            })
        );
        assert_eq!(
            snapshot.resolve("zz"),
            Err(IdLookupError::NoMatch("zz".to_string()))
        );
        assert!(matches!(snapshot.resolve(""), Err(IdLookupError::NoMatch(_))));
    }

    #[test]
    fn organized_without_pins_has_single_unlabelled_section() {
        let snapshot =
            BoardSnapshot::from_notes(vec![note("a", false), note("b", false)], ViewMode::Organized);
        let layout = snapshot.organized_layout(900);
        assert!(layout.pinned.is_none());
        assert_eq!(layout.others.label, None);
        assert_eq!(layout.others.cells.len(), 2);
    }

    #[test]
    fn organized_with_pins_labels_both_sections_and_wraps_grid() {
        let snapshot = BoardSnapshot::from_notes(
            vec![
                note("a", false),
                note("b", true),
                note("c", false),
                note("d", false),
            ],
            ViewMode::Organized,
        );
        let layout = snapshot.organized_layout(650);
        assert_eq!(layout.columns, 2);

        let pinned = layout.pinned.expect("pinned section");
        assert_eq!(pinned.label, Some(PINNED_SECTION_LABEL));
        assert_eq!(pinned.cells[0].note.id, "b");

        assert_eq!(layout.others.label, Some(OTHER_SECTION_LABEL));
        let last = &layout.others.cells[2];
        assert_eq!((last.note.id.as_str(), last.row, last.column), ("d", 1, 0));
    }

    #[test]
    fn narrow_container_still_has_one_column() {
        let snapshot = BoardSnapshot::from_notes(vec![note("a", false)], ViewMode::Organized);
        assert_eq!(snapshot.organized_layout(0).columns, 1);
    }

    #[test]
    fn free_layout_defaults_missing_position_to_origin() {
        let mut unplaced = note("a", false);
        unplaced.position = None;
        let snapshot = BoardSnapshot::from_notes(vec![unplaced], ViewMode::Free);
        let placed = snapshot.free_layout();
        assert_eq!(placed[0].position, Position::ORIGIN);
        assert_eq!(placed[0].size, Size::default());
    }
}
