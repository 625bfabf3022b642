//! Terminal rendering of board snapshots.

use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, ContentArrangement, Table};
use owo_colors::OwoColorize;
use stickynote_core::view::board::GridSection;
use stickynote_core::{markdown_excerpt, BoardSnapshot, Note, ViewMode};
use std::fmt::Write as _;

/// Terminal width assumed for the organized grid.
pub const DEFAULT_COLUMNS_WIDTH: u32 = 900;

const SHORT_ID_CHARS: usize = 8;

/// Output styling switches.
#[derive(Debug, Clone, Copy)]
pub struct Style {
    pub color: bool,
}

pub fn render_board(snapshot: &BoardSnapshot, style: Style) -> String {
    if snapshot.is_empty() {
        return "No notes yet. Add one with `sticky add`.".to_string();
    }
    match snapshot.mode() {
        ViewMode::Free => render_free(snapshot, style),
        ViewMode::Organized => render_organized(snapshot, style),
    }
}

fn render_free(snapshot: &BoardSnapshot, style: Style) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["ID", "", "Title", "Position", "Size", "Preview"]);

    for placed in snapshot.free_layout() {
        let note = placed.note;
        table.add_row(vec![
            Cell::new(short_id(&note.id)),
            Cell::new(if note.pinned { "📌" } else { "" }),
            Cell::new(title(note, style)),
            Cell::new(format!("{:.0},{:.0}", placed.position.x, placed.position.y)),
            Cell::new(format!("{:.0}x{:.0}", placed.size.width, placed.size.height)),
            Cell::new(markdown_excerpt(&note.content).unwrap_or_default()),
        ]);
    }

    table.to_string()
}

fn render_organized(snapshot: &BoardSnapshot, style: Style) -> String {
    let layout = snapshot.organized_layout(DEFAULT_COLUMNS_WIDTH);
    let mut out = String::new();
    if let Some(pinned) = &layout.pinned {
        render_section(&mut out, pinned, style);
        out.push('\n');
    }
    render_section(&mut out, &layout.others, style);
    out.trim_end().to_string()
}

fn render_section(out: &mut String, section: &GridSection<'_>, style: Style) {
    if let Some(label) = section.label {
        if style.color {
            let _ = writeln!(out, "{}", label.bold());
        } else {
            let _ = writeln!(out, "{label}");
        }
    }
    for cell in &section.cells {
        let note = cell.note;
        let excerpt = markdown_excerpt(&note.content).unwrap_or_default();
        let _ = writeln!(
            out,
            "  [{},{}] {} {}  {}",
            cell.row,
            cell.column,
            short_id(&note.id),
            title(note, style),
            excerpt
        );
    }
}

/// Full view of a single note, Markdown left as-is.
pub fn render_note(note: &Note, style: Style) -> String {
    let pin = if note.pinned { " 📌" } else { "" };
    let mut out = String::new();
    let _ = writeln!(out, "{}{pin}", title(note, style));
    let _ = writeln!(out, "id: {}", note.id);
    if let Some(position) = note.position {
        let _ = writeln!(out, "position: {:.0},{:.0}", position.x, position.y);
    }
    let _ = writeln!(out, "size: {:.0}x{:.0}", note.width, note.height);
    let _ = writeln!(out);
    out.push_str(&note.content);
    out
}

fn title(note: &Note, style: Style) -> String {
    if !style.color {
        return note.title.clone();
    }
    let text = note.title.as_str();
    match note.color_index() {
        Some(0) => text.yellow().to_string(),
        Some(1) => text.green().to_string(),
        Some(2) => text.blue().to_string(),
        Some(3) => text.magenta().to_string(),
        Some(_) => text.cyan().to_string(),
        None => text.to_string(),
    }
}

fn short_id(id: &str) -> String {
    id.chars().take(SHORT_ID_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use stickynote_core::SizingPolicy;

    const PLAIN: Style = Style { color: false };

    fn note(id: &str, title: &str, pinned: bool) -> Note {
        let mut note = Note::with_id(id, title, "some **body**", SizingPolicy::Fixed).unwrap();
        note.pinned = pinned;
        note
    }

    #[test]
    fn empty_board_shows_hint() {
        let snapshot = BoardSnapshot::from_notes(Vec::new(), ViewMode::Free);
        assert!(render_board(&snapshot, PLAIN).contains("No notes yet"));
    }

    #[test]
    fn organized_board_lists_pinned_section_first() {
        let snapshot = BoardSnapshot::from_notes(
            vec![note("aaa", "Later", false), note("bbb", "Top", true)],
            ViewMode::Organized,
        );
        let rendered = render_board(&snapshot, PLAIN);
        let pinned_at = rendered.find("Pinned Notes").unwrap();
        let top_at = rendered.find("Top").unwrap();
        let other_at = rendered.find("Other Notes").unwrap();
        let later_at = rendered.find("Later").unwrap();
        assert!(pinned_at < top_at && top_at < other_at && other_at < later_at);
    }

    #[test]
    fn free_board_shows_geometry() {
        let snapshot =
            BoardSnapshot::from_notes(vec![note("aaa", "One", false)], ViewMode::Free);
        let rendered = render_board(&snapshot, PLAIN);
        assert!(rendered.contains("300x200"));
        assert!(rendered.contains("some body"));
    }

    #[test]
    fn note_view_keeps_raw_markdown() {
        let rendered = render_note(&note("aaa", "One", true), PLAIN);
        assert!(rendered.contains("some **body**"));
        assert!(rendered.starts_with("One 📌"));
    }
}
