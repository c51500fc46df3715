//! Domain model for DreamBoard.
//!
//! Pure types and logic shared by the persistence, advisory and HTTP layers.
//! This crate has no internal dependencies and performs no I/O.

pub mod error;
pub mod patch;
pub mod resources;
pub mod tasks;
pub mod types;
pub mod validation;
