//! Request extractors enforcing authentication.
//!
//! - [`auth::SessionUser`] -- Resolves the session cookie to a user id.

pub mod auth;
