//! Privilege kinds and write-rejection verb rendering.

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// One of the four row-level privileges the core reasons about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Privilege {
    /// Insert a new row.
    Insert,
    /// Update an existing row.
    Update,
    /// Delete a row.
    Delete,
    /// Read (select) a row.
    Select,
}

impl Privilege {
    /// The verb phrase used in write-rejection messages, e.g. `INSERT INTO`.
    #[must_use]
    pub fn verb_phrase(self) -> &'static str {
        match self {
            Self::Insert => "INSERT INTO",
            Self::Delete => "DELETE FROM",
            Self::Update => "UPDATE",
            Self::Select => "SELECT FROM",
        }
    }
}

impl fmt::Display for Privilege {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Select => "SELECT",
        };
        f.write_str(s)
    }
}

impl FromStr for Privilege {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "INSERT" => Ok(Self::Insert),
            "UPDATE" => Ok(Self::Update),
            "DELETE" => Ok(Self::Delete),
            "SELECT" => Ok(Self::Select),
            other => Err(ConfigError::UnknownPrivilege(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("insert".parse::<Privilege>().unwrap(), Privilege::Insert);
        assert_eq!("Delete".parse::<Privilege>().unwrap(), Privilege::Delete);
    }

    #[test]
    fn rejects_unknown_privilege() {
        let err = "truncate".parse::<Privilege>().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownPrivilege(p) if p == "TRUNCATE"));
    }

    #[test]
    fn verb_phrases_match_write_rejection_wording() {
        assert_eq!(Privilege::Insert.verb_phrase(), "INSERT INTO");
        assert_eq!(Privilege::Delete.verb_phrase(), "DELETE FROM");
        assert_eq!(Privilege::Update.verb_phrase(), "UPDATE");
    }
}
