use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ResourceError;

/// Closed tag sets with an `Other` escape hatch: tags the backend sends that
/// are not in the set round-trip unchanged.
macro_rules! status_tags {
    (
        $(#[$meta:meta])*
        $name:ident (default $default:ident) {
            $($variant:ident => $tag:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($variant,)+
            /// Tag outside the known set, kept verbatim.
            Other(String),
        }

        impl $name {
            /// Known tags in display order.
            #[must_use]
            pub fn known() -> Vec<Self> {
                vec![$(Self::$variant),+]
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $tag,)+
                    Self::Other(tag) => tag,
                }
            }

            #[must_use]
            pub fn is_known(&self) -> bool {
                !matches!(self, Self::Other(_))
            }

            fn exact(tag: &str) -> Option<Self> {
                match tag {
                    $($tag => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl From<String> for $name {
            fn from(tag: String) -> Self {
                Self::exact(&tag).unwrap_or(Self::Other(tag))
            }
        }

        impl From<$name> for String {
            fn from(status: $name) -> Self {
                match status {
                    $name::Other(tag) => tag,
                    known => known.as_str().to_owned(),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        /// Case-insensitive parse of a known tag (user input). Unknown tags
        /// are rejected rather than sent to the server.
        impl FromStr for $name {
            type Err = ResourceError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                Self::known()
                    .into_iter()
                    .find(|status| status.as_str().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| {
                        let tags: Vec<String> =
                            Self::known().into_iter().map(String::from).collect();
                        ResourceError::validation(
                            "status",
                            format!("unknown status '{wanted}', expected one of {}", tags.join(", ")),
                        )
                    })
            }
        }
    };
}

status_tags! {
    /// Lifecycle tag of a custom order request.
    CustomOrderStatus (default Pending) {
        Pending => "Pending",
        Approve => "Approve",
        Reject => "Reject",
        Hold => "Hold",
        Processing => "Processing",
        Completed => "Completed",
    }
}

status_tags! {
    /// Fulfilment tag of a standard order.
    OrderStatus (default Pending) {
        Pending => "PENDING",
        Processing => "PROCESSING",
        ReadyToShip => "READY_TO_SHIP",
        Shipped => "SHIPPED",
        Delivered => "DELIVERED",
        Cancelled => "CANCELLED",
    }
}

/// Support ticket state, derived from the backend's `replied` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TicketStatus {
    Pending,
    Closed,
}

impl TicketStatus {
    #[must_use]
    pub const fn from_replied(replied: bool) -> Self {
        if replied { Self::Closed } else { Self::Pending }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Closed => "Closed",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
