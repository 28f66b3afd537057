//! Admin authorization extractors.
//!
//! - [`admin::RequireAdmin`] -- rejects requests without a valid admin token.
//! - [`admin::OptionalAdmin`] -- tells public handlers whether the caller is
//!   an admin.

pub mod admin;
