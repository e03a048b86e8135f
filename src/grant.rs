//! Grant model (§4.2).

use std::collections::HashSet;

use serde::Deserialize;

use crate::change::Change;
use crate::error::ConfigError;
use crate::privilege::Privilege;
use crate::relation::Relation;

/// A placeholder for a `CHECK` expression attached to a grant.
///
/// Evaluating these is a declared gap (§4.2, §9): [`check_passes`] always
/// returns `true`. The type exists so the contract shape — a grant can
/// carry a check — survives the stub, and a real evaluator can be dropped
/// in later without touching any other part of the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckExpression(pub String);

/// A raw grant record as produced by the (out-of-scope) grant source.
#[derive(Debug, Clone, Deserialize)]
pub struct GrantRecord {
    pub role_name: String,
    pub relation: Relation,
    pub privileges: Vec<String>,
    pub columns: Option<HashSet<String>>,
    pub check: Option<String>,
}

/// A normalised grant: a role name's rights over a relation.
///
/// `privileges` is always non-empty — [`grant_from_record`] rejects empty
/// privilege sets. A missing `columns` means all columns are permitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grant {
    pub role_name: String,
    pub relation: Relation,
    pub privileges: HashSet<Privilege>,
    pub columns: Option<HashSet<String>>,
    pub check: Option<CheckExpression>,
}

/// Decode a raw grant record, rejecting an empty privilege set or an
/// unrecognised privilege name.
pub fn grant_from_record(record: GrantRecord) -> Result<Grant, ConfigError> {
    let privileges = record
        .privileges
        .iter()
        .map(|p| p.parse::<Privilege>())
        .collect::<Result<HashSet<_>, _>>()?;

    if privileges.is_empty() {
        return Err(ConfigError::EmptyPrivileges {
            role_name: record.role_name,
            relation: record.relation.to_string(),
        });
    }

    Ok(Grant {
        role_name: record.role_name,
        relation: record.relation,
        privileges,
        columns: record.columns,
        check: record.check.map(CheckExpression),
    })
}

/// `true` when `grant.columns` is absent, or every element of
/// `change_columns` is a member of `grant.columns`. Deletes skip the check
/// entirely — callers pass `None` for `change_columns` on a delete and this
/// function returns `true` without inspecting `grant.columns`.
#[must_use]
pub fn columns_valid(grant: &Grant, change_columns: Option<&HashSet<&str>>) -> bool {
    let Some(change_columns) = change_columns else {
        return true;
    };
    match &grant.columns {
        None => true,
        Some(allowed) => change_columns
            .iter()
            .all(|c| allowed.contains(*c)),
    }
}

/// `true` if `grant.check` is absent; otherwise `true` as a declared gap
/// (§4.2) — a real evaluator can replace this body without affecting any
/// other contract in the core.
#[must_use]
pub fn check_passes(_grant: &Grant, _change: &Change) -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rel() -> Relation {
        Relation::new("public", "issues")
    }

    #[test]
    fn rejects_empty_privilege_set() {
        let record = GrantRecord {
            role_name: "authenticated".to_owned(),
            relation: rel(),
            privileges: vec![],
            columns: None,
            check: None,
        };
        assert!(matches!(
            grant_from_record(record),
            Err(ConfigError::EmptyPrivileges { .. })
        ));
    }

    #[test]
    fn rejects_unknown_privilege() {
        let record = GrantRecord {
            role_name: "authenticated".to_owned(),
            relation: rel(),
            privileges: vec!["TRUNCATE".to_owned()],
            columns: None,
            check: None,
        };
        assert!(matches!(
            grant_from_record(record),
            Err(ConfigError::UnknownPrivilege(_))
        ));
    }

    #[test]
    fn missing_columns_allows_everything() {
        let grant = grant_from_record(GrantRecord {
            role_name: "authenticated".to_owned(),
            relation: rel(),
            privileges: vec!["UPDATE".to_owned()],
            columns: None,
            check: None,
        })
        .unwrap();
        let cols = HashSet::from(["title", "status"]);
        assert!(columns_valid(&grant, Some(&cols)));
    }

    #[test]
    fn column_subset_must_be_within_grant_columns() {
        let grant = grant_from_record(GrantRecord {
            role_name: "authenticated".to_owned(),
            relation: rel(),
            privileges: vec!["UPDATE".to_owned()],
            columns: Some(HashSet::from(["title".to_owned()])),
            check: None,
        })
        .unwrap();
        assert!(columns_valid(&grant, Some(&HashSet::from(["title"]))));
        assert!(!columns_valid(
            &grant,
            Some(&HashSet::from(["title", "status"]))
        ));
    }

    #[test]
    fn delete_skips_column_check_even_when_restricted() {
        let grant = grant_from_record(GrantRecord {
            role_name: "authenticated".to_owned(),
            relation: rel(),
            privileges: vec!["DELETE".to_owned()],
            columns: Some(HashSet::from(["title".to_owned()])),
            check: None,
        })
        .unwrap();
        assert!(columns_valid(&grant, None));
    }
}
