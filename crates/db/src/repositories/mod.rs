//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument. Methods taking a
//! `Transaction` are building blocks for multi-statement flows.

pub mod admin_credential_repo;
pub mod book_repo;
pub mod movement_repo;

pub use admin_credential_repo::AdminCredentialRepo;
pub use book_repo::BookRepo;
pub use movement_repo::{FinalizeError, MovementRepo};
