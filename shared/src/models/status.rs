//! Lifecycle statuses
//!
//! Wire format is SCREAMING_SNAKE_CASE (`IN_PRODUCTION`, `DELIVERED_ON_CREDIT`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unknown status string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown status: {0}")]
pub struct ParseStatusError(pub String);

macro_rules! status_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($(#[$vmeta:meta])* $variant:ident => $wire:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// Every status, in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Wire representation
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl FromStr for $name {
            type Err = ParseStatusError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($name::$variant),)+
                    other => Err(ParseStatusError(other.to_string())),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

status_enum! {
    /// Sales order status
    OrderStatus {
        /// Initial, freely editable
        Draft => "DRAFT",
        Confirmed => "CONFIRMED",
        InProduction => "IN_PRODUCTION",
        Ready => "READY",
        Delivered => "DELIVERED",
        /// Delivered with an outstanding balance (needs approval)
        DeliveredOnCredit => "DELIVERED_ON_CREDIT",
        Paid => "PAID",
        Cancelled => "CANCELLED",
    }
}

status_enum! {
    /// Expense-order status
    ExpenseOrderStatus {
        Draft => "DRAFT",
        Created => "CREATED",
        Authorized => "AUTHORIZED",
        Paid => "PAID",
        Cancelled => "CANCELLED",
    }
}

status_enum! {
    /// Quote status
    QuoteStatus {
        Draft => "DRAFT",
        Sent => "SENT",
        Accepted => "ACCEPTED",
        Rejected => "REJECTED",
        Cancelled => "CANCELLED",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format_matches_serde() {
        for status in OrderStatus::ALL {
            let json = serde_json::to_string(status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), *status);
        }
    }

    #[test]
    fn test_parse_unknown() {
        let err = "SHIPPED".parse::<ExpenseOrderStatus>().unwrap_err();
        assert_eq!(err, ParseStatusError("SHIPPED".to_string()));
    }
}
