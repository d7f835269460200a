//! Typed IDs for type-safe entity references.
//!
//! The backend hands out integer primary keys. Wrapping them prevents
//! accidentally passing a `CategoryId` where a `BudgetPlanId` is expected.

use serde::{Deserialize, Serialize};

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Creates an ID from a raw backend key.
            #[must_use]
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Returns the raw backend key.
            #[must_use]
            pub const fn into_inner(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.trim().parse()?))
            }
        }
    };
}

typed_id!(WorkspaceId, "Unique identifier for a workspace.");
typed_id!(CategoryId, "Unique identifier for a category.");
typed_id!(BudgetPlanId, "Unique identifier for a budget plan.");
typed_id!(TransactionId, "Unique identifier for a transaction.");

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_display_and_parse() {
        let id = CategoryId::new(42);
        assert_eq!(id.to_string(), "42");
        assert_eq!(CategoryId::from_str(" 42 ").unwrap(), id);
        assert!(BudgetPlanId::from_str("abc").is_err());
    }

    #[test]
    fn test_serde_transparent() {
        let id = WorkspaceId::new(7);
        assert_eq!(serde_json::to_string(&id).unwrap(), "7");
        let back: WorkspaceId = serde_json::from_str("7").unwrap();
        assert_eq!(back, id);
    }
}
