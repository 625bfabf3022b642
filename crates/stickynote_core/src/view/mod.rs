//! View/state layer.
//!
//! # Responsibility
//! - Mirror the note store as immutable board snapshots.
//! - Derive free and organized layouts without touching storage.

pub mod board;
