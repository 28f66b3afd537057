//! Shared query parameter types for API handlers.

use biblio_core::status::MovementDirection;
use serde::Deserialize;

/// Generic pagination parameters (`?limit=&offset=`).
///
/// Values are clamped in the handler via `clamp_limit` / `clamp_offset`.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// `?direction=check_in|checkout`.
#[derive(Debug, Deserialize)]
pub struct DirectionParams {
    pub direction: MovementDirection,
}
