//! The shared resolution core consulted by both the write validator and the
//! read filter (§4.8).

use std::sync::Arc;

use crate::change::Change;
use crate::compiler::AssignedRoles;
use crate::grant::{check_passes, columns_valid};
use crate::lsn::Lsn;
use crate::primary_key::PrimaryKey;
use crate::relation::Relation;
use crate::role::RoleGrant;
use crate::scope::ScopeResolver;
use crate::transient::TransientLookup;

/// Which grant conditions apply to a change (§4.8).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// `columns_valid` and `check_passes` both gate the match.
    Write,
    /// Only `check_passes` gates the match.
    Read,
}

fn mode_admits(grant: &crate::grant::Grant, change: &Change, mode: Mode) -> bool {
    match mode {
        Mode::Write => columns_valid(grant, change.write_columns().as_ref()) && check_passes(grant, change),
        Mode::Read => check_passes(grant, change),
    }
}

/// `true` iff `change`'s row resolves, under `resolver`, to the scope root
/// `(scope_relation, scope_id)`.
async fn change_in_scope(
    resolver: &dyn ScopeResolver,
    scope_relation: &Relation,
    scope_id: &PrimaryKey,
    change: &Change,
) -> bool {
    resolver
        .scope_id(scope_relation, change)
        .await
        .is_some_and(|location| &location.id == scope_id)
}

/// The first role-grant in `bucket` that admits `change`, trying unscoped
/// grants, then scoped grants, then transient grants, in that order (§4.8).
///
/// `resolver` and `lsn` are only consulted when a grant is scoped or
/// transient; an all-unscoped bucket never touches either.
pub async fn role_grant_for_change(
    bucket: &AssignedRoles,
    resolver: &Arc<dyn ScopeResolver>,
    transient_lookup: &Arc<dyn TransientLookup>,
    change: &Change,
    lsn: Lsn,
    mode: Mode,
) -> Option<RoleGrant> {
    for role_grant in &bucket.unscoped {
        if mode_admits(&role_grant.grant, change, mode) {
            return Some(role_grant.clone());
        }
    }

    for role_grant in &bucket.scoped {
        let crate::role::Role::Assigned(assigned) = role_grant.role.as_ref() else {
            continue;
        };
        let Some((scope_relation, scope_id)) = &assigned.scope else {
            continue;
        };
        if change_in_scope(resolver.as_ref(), scope_relation, scope_id, change).await
            && mode_admits(&role_grant.grant, change, mode)
        {
            return Some(role_grant.clone());
        }
    }

    for (role_grant, record) in transient_lookup.for_roles(&bucket.scoped, lsn).await {
        if change_in_scope(resolver.as_ref(), &record.target_relation, &record.target_id, change).await
            && mode_admits(&role_grant.grant, change, mode)
        {
            return Some(role_grant);
        }
    }

    None
}
