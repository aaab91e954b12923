use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Resource collections exposed by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    Clients,
    Items,
    Categories,
    Employees,
    CustomOrders,
    Orders,
    Tickets,
}

impl ResourceKind {
    pub const ALL: [Self; 7] = [
        Self::Clients,
        Self::Items,
        Self::Categories,
        Self::Employees,
        Self::CustomOrders,
        Self::Orders,
        Self::Tickets,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Clients => "clients",
            Self::Items => "items",
            Self::Categories => "categories",
            Self::Employees => "employees",
            Self::CustomOrders => "custom-orders",
            Self::Orders => "orders",
            Self::Tickets => "tickets",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of an item within its collection.
///
/// Most collections use numeric ids; categories may be keyed by name. Numeric
/// ids order numerically and sort before textual ones.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceId {
    Numeric(i64),
    Text(String),
}

impl ResourceId {
    /// Identity carried by a JSON value: integers become `Numeric`, strings
    /// `Text`, anything else `None`.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(Self::Numeric),
            Value::String(s) => Some(Self::Text(s.clone())),
            _ => None,
        }
    }

    /// The `id` member of a JSON object, if any.
    #[must_use]
    pub fn of_object(value: &Value) -> Option<Self> {
        value.get("id").and_then(Self::from_json)
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ResourceId {
    fn from(value: i64) -> Self {
        Self::Numeric(value)
    }
}

impl From<&str> for ResourceId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for ResourceId {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Parses integers as `Numeric`, everything else as `Text`. Never fails.
impl FromStr for ResourceId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Ok(trimmed
            .parse::<i64>()
            .map_or_else(|_| Self::Text(trimmed.to_owned()), Self::Numeric))
    }
}
