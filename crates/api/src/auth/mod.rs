//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`session`] -- Opaque cookie sessions backed by the `user_sessions` table.

pub mod password;
pub mod session;
