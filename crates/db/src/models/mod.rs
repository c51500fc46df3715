//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A `Deserialize` + `Validate` create DTO for inserts
//! - A `Deserialize` + `Validate` update DTO (all `Option` fields) for patches
//!
//! API-facing structs serialize with camelCase keys, the contract the web
//! client consumes.

pub mod dream;
pub mod resource;
pub mod session;
pub mod task;
pub mod user;
pub mod vision_item;
