//! Core use-case services.
//!
//! # Responsibility
//! - Combine repository reads/writes with editor and lifecycle logic.
//! - Keep the command layer decoupled from storage details.

pub mod note_service;
pub mod task_service;
