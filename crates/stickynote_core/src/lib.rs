//! Core domain logic for the sticky notes board.
//! This crate is the single source of truth for note invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod view;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::geometry::{Position, Size, SizingPolicy};
pub use model::note::{Note, NoteId, NoteValidationError, DEFAULT_TITLE};
pub use repo::note_repo::{NoteRepository, RepoError, RepoResult, SqliteNoteRepository};
pub use repo::ui_state_repo::{SqliteUiStateRepository, UiFlag, UiStateRepository};
pub use service::board_service::{BoardError, BoardResult, BoardService};
pub use service::note_service::{markdown_excerpt, NoteService, NoteServiceError};
pub use service::transfer::{TransferError, EXPORT_FILE_NAME, IMPORT_FAILED_MESSAGE};
pub use view::board::{BoardSnapshot, IdLookupError, OrganizedLayout, PlacedNote, ViewMode};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
