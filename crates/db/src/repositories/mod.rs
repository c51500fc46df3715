//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod dream_repo;
pub mod resource_repo;
pub mod session_repo;
pub mod task_repo;
pub mod user_repo;
pub mod vision_item_repo;

pub use dream_repo::DreamRepo;
pub use resource_repo::ResourceRepo;
pub use session_repo::SessionRepo;
pub use task_repo::TaskRepo;
pub use user_repo::UserRepo;
pub use vision_item_repo::VisionItemRepo;
