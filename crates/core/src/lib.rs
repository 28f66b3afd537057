//! Domain types and pure business rules for the library inventory.
//!
//! Nothing in this crate performs I/O: the database, HTTP and lookup crates
//! build on these types and validators.

pub mod error;
pub mod isbn;
pub mod pin;
pub mod search;
pub mod status;
pub mod stock;
pub mod types;
