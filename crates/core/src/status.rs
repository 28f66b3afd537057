//! Tagged states mapping to SMALLINT lookup tables.
//!
//! Each enum variant's discriminant matches the seed data order (1-based)
//! in the corresponding database lookup table (`book_statuses`,
//! `movement_directions`).

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Status ID type matching SMALLINT in the database.
pub type StatusId = i16;

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $val:literal => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(i16)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $val ),+
        }

        impl $name {
            /// Return the database lookup ID.
            pub fn id(self) -> StatusId {
                self as StatusId
            }

            /// Return the snake_case name used in the API and lookup table.
            pub fn name(self) -> &'static str {
                match self {
                    $( Self::$variant => $label ),+
                }
            }

            /// Parse the snake_case name back into a variant.
            pub fn parse(s: &str) -> Result<Self, CoreError> {
                match s {
                    $( $label => Ok(Self::$variant), )+
                    other => Err(CoreError::Validation(format!(
                        concat!("Unknown ", stringify!($name), " '{}'"),
                        other
                    ))),
                }
            }
        }

        impl From<$name> for StatusId {
            fn from(value: $name) -> Self {
                value as StatusId
            }
        }

        impl TryFrom<StatusId> for $name {
            type Error = CoreError;

            fn try_from(value: StatusId) -> Result<Self, Self::Error> {
                match value {
                    $( $val => Ok(Self::$variant), )+
                    other => Err(CoreError::Internal(format!(
                        concat!("Unknown ", stringify!($name), " id {}"),
                        other
                    ))),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.name())
            }
        }
    };
}

define_status_enum! {
    /// Book lifecycle. A retired book is hidden from public listings and
    /// cannot take new movements, but keeps its history.
    BookStatus {
        Active = 1 => "active",
        Retired = 2 => "retired",
    }
}

define_status_enum! {
    /// Direction of a stock movement.
    MovementDirection {
        /// A book returned or added to the shelf (stock + 1).
        CheckIn = 1 => "check_in",
        /// A book taken off the shelf (stock - 1, clamped at zero).
        Checkout = 2 => "checkout",
    }
}

impl MovementDirection {
    pub fn is_checkout(self) -> bool {
        self == Self::Checkout
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn book_status_ids_match_seed_data() {
        assert_eq!(BookStatus::Active.id(), 1);
        assert_eq!(BookStatus::Retired.id(), 2);
    }

    #[test]
    fn movement_direction_ids_match_seed_data() {
        assert_eq!(MovementDirection::CheckIn.id(), 1);
        assert_eq!(MovementDirection::Checkout.id(), 2);
    }

    #[test]
    fn status_into_status_id() {
        let id: StatusId = BookStatus::Retired.into();
        assert_eq!(id, 2);
    }

    #[test]
    fn try_from_unknown_id_fails() {
        assert_matches!(BookStatus::try_from(9), Err(CoreError::Internal(_)));
        assert_eq!(
            MovementDirection::try_from(2).unwrap(),
            MovementDirection::Checkout
        );
    }

    #[test]
    fn names_round_trip_through_parse() {
        assert_eq!(
            MovementDirection::parse("check_in").unwrap(),
            MovementDirection::CheckIn
        );
        assert_eq!(BookStatus::Retired.name(), "retired");
        assert_matches!(BookStatus::parse("deleted"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&MovementDirection::CheckIn).unwrap();
        assert_eq!(json, "\"check_in\"");
        let parsed: BookStatus = serde_json::from_str("\"retired\"").unwrap();
        assert_eq!(parsed, BookStatus::Retired);
    }
}
