//! `sticky`: terminal front end for the sticky notes board.
//!
//! Every subcommand is one user gesture: it mutates the store through the
//! core board service, which reloads the notes, and then prints the board.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::{error, info};
use owo_colors::OwoColorize;
use std::io::{IsTerminal, Read};
use std::path::PathBuf;
use stickynote_core::db::open_db;
use stickynote_core::{
    init_logging, BoardService, BoardSnapshot, IdLookupError, Position, Size, SizingPolicy,
    SqliteNoteRepository, SqliteUiStateRepository, ViewMode, IMPORT_FAILED_MESSAGE,
};

mod config;
mod render;

use config::Config;
use render::Style;

#[derive(Parser)]
#[command(name = "sticky")]
#[command(about = "Markdown sticky notes in your terminal", long_about = None)]
#[command(version)]
struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    plain: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the board in the current view mode
    List,

    /// Show one note in full
    Show {
        /// Note id
        id: String,
    },

    /// Add a note (reads content from stdin when omitted or `-`)
    Add {
        /// Note content (Markdown)
        content: Option<String>,

        /// Note title (defaults to "Untitled")
        #[arg(short, long, default_value = "")]
        title: String,

        /// Size the note from its content instead of the default 300x200
        #[arg(long)]
        fit: bool,
    },

    /// Replace a note's title and/or content
    Edit {
        /// Note id
        id: String,

        /// New title
        #[arg(short, long)]
        title: Option<String>,

        /// New content (`-` reads stdin)
        #[arg(short, long)]
        content: Option<String>,
    },

    /// Toggle a note's pinned state
    Pin {
        /// Note id
        id: String,
    },

    /// Resize a note (clamped to 200x150..800x600)
    Resize {
        id: String,
        width: f64,
        height: f64,
    },

    /// Move a note in free mode (snapped to a 10px grid)
    Move {
        id: String,
        #[arg(allow_negative_numbers = true)]
        x: f64,
        #[arg(allow_negative_numbers = true)]
        y: f64,
    },

    /// Delete a note
    Delete {
        /// Note id
        id: String,
    },

    /// Export all notes to a JSON backup
    Export {
        /// Output file (defaults to ./sticky-notes-backup.json, `-` for stdout)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Replace all notes with the contents of a JSON backup
    Import {
        /// Backup file
        file: PathBuf,
    },

    /// Switch the board's view mode
    View {
        #[arg(value_enum)]
        mode: ViewArg,
    },

    /// Show, hide or toggle the Markdown preview after add/edit
    Preview {
        #[arg(value_enum)]
        state: PreviewArg,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Show { .. } => "show",
            Self::Add { .. } => "add",
            Self::Edit { .. } => "edit",
            Self::Pin { .. } => "pin",
            Self::Resize { .. } => "resize",
            Self::Move { .. } => "move",
            Self::Delete { .. } => "delete",
            Self::Export { .. } => "export",
            Self::Import { .. } => "import",
            Self::View { .. } => "view",
            Self::Preview { .. } => "preview",
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ViewArg {
    Free,
    Organized,
}

#[derive(Clone, Copy, ValueEnum)]
enum PreviewArg {
    On,
    Off,
    Toggle,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;
    if let Err(err) = init_logging(&config.log_level, config.log_dir()) {
        eprintln!("{} logging disabled: {err}", "warning:".yellow());
    }
    info!(
        "event=cli_command module=cli status=start command={}",
        cli.command.name()
    );

    let style = Style {
        color: !cli.plain && std::io::stdout().is_terminal(),
    };

    let conn = open_db(config.db_path())
        .with_context(|| format!("Failed to open {}", config.db_path().display()))?;
    let notes = SqliteNoteRepository::try_new(&conn)?;
    let ui = SqliteUiStateRepository::try_new(&conn)?;
    let mut board = BoardService::open(notes, ui)?;

    match cli.command {
        Commands::List => {}

        Commands::Show { id } => {
            let note = board.snapshot().resolve(&id)?;
            println!("{}", render::render_note(note, style));
            return Ok(());
        }

        Commands::Add {
            content,
            title,
            fit,
        } => {
            let content = read_content(content)?;
            let sizing = if fit {
                SizingPolicy::FitContent
            } else {
                SizingPolicy::Fixed
            };
            let note = board.add_note(&title, &content, sizing)?;
            println!("{} {}", "Added".green(), note.id);
            if board.preview_enabled()? {
                println!("{}\n", render::render_note(&note, style));
            }
        }

        Commands::Edit { id, title, content } => {
            let current = board.snapshot().resolve(&id)?.clone();
            let id = current.id.clone();
            let title = title.unwrap_or(current.title);
            let content = match content {
                Some(value) => read_content(Some(value))?,
                None => current.content,
            };
            let note = board.edit_note(&id, &title, &content)?;
            println!("{} {}", "Saved".green(), note.id);
            if board.preview_enabled()? {
                println!("{}\n", render::render_note(&note, style));
            }
        }

        Commands::Pin { id } => {
            let id = resolve_id(board.snapshot(), &id)?;
            let note = board.toggle_pin(&id)?;
            let state = if note.pinned { "Pinned" } else { "Unpinned" };
            println!("{} {}", state.green(), note.id);
        }

        Commands::Resize { id, width, height } => {
            let id = resolve_id(board.snapshot(), &id)?;
            let note = board.resize(&id, Size { width, height })?;
            println!(
                "{} {} to {:.0}x{:.0}",
                "Resized".green(),
                note.id,
                note.width,
                note.height
            );
        }

        Commands::Move { id, x, y } => {
            let id = resolve_id(board.snapshot(), &id)?;
            let note = board.move_to(&id, Position { x, y })?;
            let position = note.effective_position();
            println!(
                "{} {} to {:.0},{:.0}",
                "Moved".green(),
                note.id,
                position.x,
                position.y
            );
        }

        Commands::Delete { id } => {
            let id = resolve_id(board.snapshot(), &id)?;
            board.delete_note(&id)?;
            println!("{} {}", "Deleted".green(), id);
        }

        Commands::Export { output } => {
            match output.as_deref() {
                Some("-") => println!("{}", board.export_json()?),
                other => {
                    let path = match other {
                        Some(path) => PathBuf::from(path),
                        None => config::default_export_path(&std::env::current_dir()?),
                    };
                    board.export_to_path(&path)?;
                    println!(
                        "{} {} notes to {}",
                        "Exported".green(),
                        board.snapshot().len(),
                        path.display()
                    );
                }
            }
            return Ok(());
        }

        Commands::Import { file } => {
            let count = board.import_from_path(&file).map_err(|err| {
                error!("event=cli_import module=cli status=error error={err}");
                anyhow::Error::new(err).context(IMPORT_FAILED_MESSAGE)
            })?;
            println!("{} {} notes", "Imported".green(), count);
        }

        Commands::View { mode } => {
            let mode = match mode {
                ViewArg::Free => ViewMode::Free,
                ViewArg::Organized => ViewMode::Organized,
            };
            board.set_view_mode(mode)?;
        }

        Commands::Preview { state } => {
            let enabled = match state {
                PreviewArg::On => {
                    board.set_preview(true)?;
                    true
                }
                PreviewArg::Off => {
                    board.set_preview(false)?;
                    false
                }
                PreviewArg::Toggle => board.toggle_preview()?,
            };
            let label = if enabled { "on" } else { "off" };
            println!("Preview {label}");
            return Ok(());
        }
    }

    println!("{}", render::render_board(board.snapshot(), style));
    Ok(())
}

/// Expands an id prefix as printed by `list`. Unknown ids pass through so the
/// core can report them (or ignore them, for delete).
fn resolve_id(snapshot: &BoardSnapshot, key: &str) -> Result<String> {
    match snapshot.resolve(key) {
        Ok(note) => Ok(note.id.clone()),
        Err(IdLookupError::NoMatch(_)) => Ok(key.to_string()),
        Err(err) => Err(err.into()),
    }
}

fn read_content(arg: Option<String>) -> Result<String> {
    match arg {
        Some(value) if value != "-" => Ok(value),
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read note content from stdin")?;
            Ok(buf)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::resolve_id;
    use stickynote_core::{BoardSnapshot, Note, SizingPolicy, ViewMode};

    fn snapshot(ids: &[&str]) -> BoardSnapshot {
        let notes = ids
            .iter()
            .map(|id| Note::with_id(*id, "", "body", SizingPolicy::Fixed).unwrap())
            .collect();
        BoardSnapshot::from_notes(notes, ViewMode::Free)
    }

    #[test]
    fn listed_short_id_resolves_to_full_id() {
        let board = snapshot(&["3f2a9c1e-0000-4000-8000-000000000000", "77aa0000-1111"]);
        assert_eq!(
            resolve_id(&board, "3f2a9c1e").unwrap(),
            "3f2a9c1e-0000-4000-8000-000000000000"
        );
    }

    #[test]
    fn ambiguous_prefix_is_an_error() {
        let board = snapshot(&["abc-1", "abc-2"]);
        let err = resolve_id(&board, "abc").unwrap_err();
        assert!(err.to_string().contains("matches 2 notes"));
    }

    #[test]
    fn unknown_id_passes_through() {
        let board = snapshot(&["abc-1"]);
        assert_eq!(resolve_id(&board, "zzz").unwrap(), "zzz");
    }
}
