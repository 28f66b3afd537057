//! Request handlers, one submodule per resource.
//!
//! Handlers delegate to the repositories in `biblio_db` and map errors via
//! [`AppError`](crate::error::AppError).

pub mod admin;
pub mod books;
pub mod export;
pub mod movements;
pub mod scan;
