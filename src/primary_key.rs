//! Typed primary-key values.
//!
//! Scope roots and transient grant targets are identified by a
//! `(relation, primary key)` pair. The key itself is one of a small set of
//! scalar shapes — modelled as a closed enum rather than a raw JSON value so
//! that scope-id comparisons (`==`) are exact and don't need JSON coercion
//! rules at the hottest path in the core.

use std::fmt;

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use uuid::Uuid;

/// A primary-key scalar.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PrimaryKey {
    /// UUID primary key.
    Uuid(Uuid),
    /// String (or text/enum) primary key.
    String(String),
    /// Integer primary key.
    Int(i64),
}

impl PrimaryKey {
    /// Interpret a JSON scalar as a primary key: numbers become `Int`,
    /// strings that parse as a UUID become `Uuid`, any other string becomes
    /// `String`. `None` for anything else (objects, arrays, null, bool).
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(
                Uuid::parse_str(s)
                    .map(Self::Uuid)
                    .unwrap_or_else(|_| Self::String(s.clone())),
            ),
            Value::Number(n) => n.as_i64().map(Self::Int),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for PrimaryKey {
    /// Role and grant records carry primary keys as bare JSON scalars
    /// (a number, a UUID string, or a plain string), not as a tagged enum.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::from_json(&value).ok_or_else(|| serde::de::Error::custom("expected a string or integer primary key"))
    }
}

impl fmt::Display for PrimaryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uuid(u) => write!(f, "{u}"),
            Self::String(s) => write!(f, "{s}"),
            Self::Int(n) => write!(f, "{n}"),
        }
    }
}

impl From<Uuid> for PrimaryKey {
    fn from(u: Uuid) -> Self {
        Self::Uuid(u)
    }
}

impl From<String> for PrimaryKey {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for PrimaryKey {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<i64> for PrimaryKey {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}
