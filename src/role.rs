//! Role model (§4.1).

use std::sync::Arc;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::grant::Grant;
use crate::primary_key::PrimaryKey;
use crate::relation::Relation;

/// Role name granted to every change, authenticated or not.
pub const ANYONE_ROLE_NAME: &str = "__anyone__";

/// Role name granted to every change carrying an authenticated identity.
pub const AUTHENTICATED_ROLE_NAME: &str = "__authenticated__";

/// A raw role record as produced by the (out-of-scope) role source.
#[derive(Debug, Clone, Deserialize)]
pub struct RoleRecord {
    pub assignment_id: PrimaryKey,
    pub name: String,
    pub user_id: Option<String>,
    pub scope_relation: Option<Relation>,
    pub scope_id: Option<PrimaryKey>,
}

/// A role assignment earned by a specific user, optionally scoped to a
/// subtree of rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignedRole {
    pub assignment_id: PrimaryKey,
    pub name: String,
    pub user_id: Option<String>,
    pub scope: Option<(Relation, PrimaryKey)>,
}

/// The three kinds of role a change can be evaluated under (§4.1).
///
/// `Anyone` and `Authenticated` are sentinel roles every change carries
/// implicitly — they never appear in role records, only in the default
/// lookup buckets the compiler seeds (§4.5).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    /// Matches any change regardless of identity.
    Anyone,
    /// Matches any change carrying an authenticated identity.
    Authenticated,
    /// A specific role assignment, possibly scoped.
    Assigned(AssignedRole),
}

impl Role {
    /// The role name used to look up grants — `ANYONE_ROLE_NAME` and
    /// `AUTHENTICATED_ROLE_NAME` for the sentinel roles, the assignment's
    /// own name otherwise.
    #[must_use]
    pub fn grant_role_name(&self) -> &str {
        match self {
            Self::Anyone => ANYONE_ROLE_NAME,
            Self::Authenticated => AUTHENTICATED_ROLE_NAME,
            Self::Assigned(assigned) => &assigned.name,
        }
    }
}

/// `true` iff `role` is an `Assigned` role carrying a scope.
#[must_use]
pub fn has_scope(role: &Role) -> bool {
    matches!(
        role,
        Role::Assigned(AssignedRole {
            scope: Some(_),
            ..
        })
    )
}

/// Decode a raw role record. The only way decoding fails today is an
/// unrecognised role kind, which can't occur from this constructor since
/// every `RoleRecord` denotes an assigned role — kept `Result`-returning so
/// callers that parse role kind strings upstream can share the error type.
pub fn role_from_record(record: RoleRecord) -> Result<Role, ConfigError> {
    let scope = match (record.scope_relation, record.scope_id) {
        (Some(relation), Some(id)) => Some((relation, id)),
        (None, None) => None,
        _ => {
            return Err(ConfigError::UnknownRoleKind(format!(
                "role {} has a partial scope (relation and id must both be present or both absent)",
                record.name
            )));
        }
    };
    Ok(Role::Assigned(AssignedRole {
        assignment_id: record.assignment_id,
        name: record.name,
        user_id: record.user_id,
        scope,
    }))
}

/// Every grant in `grants` whose `role_name` matches `role`'s grant-lookup
/// name.
#[must_use]
pub fn matching_grants(role: &Role, grants: &[Arc<Grant>]) -> Vec<Arc<Grant>> {
    let name = role.grant_role_name();
    grants
        .iter()
        .filter(|g| g.role_name == name)
        .cloned()
        .collect()
}

/// A role paired with one of the grants it earns. This is the unit the
/// compiler buckets by `(relation, privilege)` and the unit transient-grant
/// lookups are keyed from (§4.4, §4.5).
#[derive(Debug, Clone)]
pub struct RoleGrant {
    pub role: Arc<Role>,
    pub grant: Arc<Grant>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grant::{grant_from_record, GrantRecord};

    #[test]
    fn sentinel_roles_use_fixed_grant_names() {
        assert_eq!(Role::Anyone.grant_role_name(), ANYONE_ROLE_NAME);
        assert_eq!(
            Role::Authenticated.grant_role_name(),
            AUTHENTICATED_ROLE_NAME
        );
    }

    #[test]
    fn unscoped_assigned_role_has_no_scope() {
        let role = role_from_record(RoleRecord {
            assignment_id: PrimaryKey::from(1_i64),
            name: "reviewer".to_owned(),
            user_id: Some("u1".to_owned()),
            scope_relation: None,
            scope_id: None,
        })
        .unwrap();
        assert!(!has_scope(&role));
    }

    #[test]
    fn scoped_assigned_role_has_scope() {
        let role = role_from_record(RoleRecord {
            assignment_id: PrimaryKey::from(1_i64),
            name: "reviewer".to_owned(),
            user_id: Some("u1".to_owned()),
            scope_relation: Some(Relation::new("public", "projects")),
            scope_id: Some(PrimaryKey::from(7_i64)),
        })
        .unwrap();
        assert!(has_scope(&role));
    }

    #[test]
    fn partial_scope_is_rejected() {
        let err = role_from_record(RoleRecord {
            assignment_id: PrimaryKey::from(1_i64),
            name: "reviewer".to_owned(),
            user_id: Some("u1".to_owned()),
            scope_relation: Some(Relation::new("public", "projects")),
            scope_id: None,
        });
        assert!(matches!(err, Err(ConfigError::UnknownRoleKind(_))));
    }

    #[test]
    fn matching_grants_filters_by_role_name() {
        let relation = Relation::new("public", "issues");
        let reviewer_grant = Arc::new(
            grant_from_record(GrantRecord {
                role_name: "reviewer".to_owned(),
                relation: relation.clone(),
                privileges: vec!["SELECT".to_owned()],
                columns: None,
                check: None,
            })
            .unwrap(),
        );
        let other_grant = Arc::new(
            grant_from_record(GrantRecord {
                role_name: "editor".to_owned(),
                relation,
                privileges: vec!["UPDATE".to_owned()],
                columns: None,
                check: None,
            })
            .unwrap(),
        );
        let role = Role::Assigned(AssignedRole {
            assignment_id: PrimaryKey::from(1_i64),
            name: "reviewer".to_owned(),
            user_id: Some("u1".to_owned()),
            scope: None,
        });
        let matched = matching_grants(&role, &[reviewer_grant.clone(), other_grant]);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].role_name, reviewer_grant.role_name);
    }
}
