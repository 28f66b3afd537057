//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - `Deserialize` DTOs for inserts, patches and list filters

pub mod admin_credential;
pub mod book;
pub mod movement;
