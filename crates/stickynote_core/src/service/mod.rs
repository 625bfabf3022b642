//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into note gestures and board reloads.
//! - Own backup export/import.
//! - Keep front ends decoupled from storage details.

pub mod board_service;
pub mod note_service;
pub mod transfer;
