//! Sticky note domain model.
//!
//! # Responsibility
//! - Define the note record and the free-mode geometry rules.
//!
//! # Invariants
//! - Every note is identified by a stable `NoteId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod geometry;
pub mod note;
