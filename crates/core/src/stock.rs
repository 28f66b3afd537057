//! Stock adjustment rule applied when a movement is finalized.

use crate::error::CoreError;
use crate::status::MovementDirection;

/// Outcome of applying one movement to a book's stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockChange {
    pub previous: i32,
    pub new_stock: i32,
    /// `true` when a checkout hit an empty shelf and the stock stayed at zero.
    pub clamped: bool,
}

/// Compute the stock after a movement.
///
/// Check-in adds one copy. Checkout removes one copy but never goes below
/// zero: checking out an empty shelf leaves the stock at zero and sets
/// [`StockChange::clamped`]. The movement itself is still recorded by the
/// caller.
pub fn apply_movement(
    current_stock: i32,
    direction: MovementDirection,
) -> Result<StockChange, CoreError> {
    if current_stock < 0 {
        return Err(CoreError::Internal(format!(
            "Stored stock is negative ({current_stock})"
        )));
    }

    let change = match direction {
        MovementDirection::CheckIn => {
            let new_stock = current_stock.checked_add(1).ok_or_else(|| {
                CoreError::Validation("Stock cannot exceed its maximum value".into())
            })?;
            StockChange {
                previous: current_stock,
                new_stock,
                clamped: false,
            }
        }
        MovementDirection::Checkout if current_stock > 0 => StockChange {
            previous: current_stock,
            new_stock: current_stock - 1,
            clamped: false,
        },
        MovementDirection::Checkout => StockChange {
            previous: 0,
            new_stock: 0,
            clamped: true,
        },
    };
    Ok(change)
}

/// Validate a stock count supplied on create or edit.
pub fn validate_stock(stock: i32) -> Result<(), CoreError> {
    if stock < 0 {
        return Err(CoreError::Validation(format!(
            "Stock must be zero or positive, got {stock}"
        )));
    }
    Ok(())
}
