//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the note store and UI flag storage contracts.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repositories only accept connections migrated to the latest schema.
//! - Repositories do not validate user input; services do.

pub mod note_repo;
pub mod ui_state_repo;
