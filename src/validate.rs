//! The write validator (§4.6): per-transaction admission of edge writes.

use std::sync::Arc;

use crate::change::{Change, Transaction};
use crate::compiler::CompiledPermissions;
use crate::error::AuthorizationError;
use crate::message::write_rejection;
use crate::resolve::{role_grant_for_change, Mode};
use crate::scope::ScopeResolver;

/// Expand `changes` so that every `Update` re-parenting a row across a
/// tracked scope relation is followed by a synthetic `ScopeMove` evaluated
/// against the new row data (§4.6, step 1).
///
/// One `ScopeMove` is emitted per scope relation the update's foreign-key
/// edit crosses; an update that doesn't touch any tracked scope relation's
/// foreign key passes through unchanged.
fn expand(compiled: &CompiledPermissions, changes: &[Change]) -> Vec<Change> {
    let mut expanded = Vec::with_capacity(changes.len());
    for change in changes {
        expanded.push(change.clone());
        if let Change::Update { relation, record, .. } = change {
            for scope_relation in compiled.scopes() {
                if compiled.scope_resolver().modifies_fk(scope_relation, change) {
                    expanded.push(Change::ScopeMove {
                        relation: relation.clone(),
                        record: record.clone(),
                    });
                }
            }
        }
    }
    expanded
}

/// Admit or reject `transaction` in its entirety (§4.6).
///
/// Evaluates the expanded change sequence in order, threading the scope
/// resolver forward across accepted changes. The first rejection aborts the
/// fold immediately — no later `apply_change` runs, so a rejected
/// transaction leaves no trace in any resolver value derived here (§5).
///
/// # Errors
///
/// Returns an [`AuthorizationError`] naming the first change that no
/// role-grant admits.
pub async fn validate_write(
    compiled: &CompiledPermissions,
    transaction: &Transaction,
) -> Result<(), AuthorizationError> {
    let expanded = expand(compiled, &transaction.changes);
    let mut resolver: Arc<dyn ScopeResolver> = compiled.scope_resolver().clone();

    for change in &expanded {
        let privilege = change.required_privilege();
        let relation = change.relation();

        let role_grant = match compiled.bucket(relation, privilege) {
            Some(bucket) => {
                role_grant_for_change(
                    bucket,
                    &resolver,
                    compiled.transient_lookup(),
                    change,
                    transaction.lsn,
                    Mode::Write,
                )
                .await
            }
            None => None,
        };

        match role_grant {
            Some(role_grant) => {
                tracing::debug!(
                    relation = %relation,
                    privilege = %privilege,
                    role = role_grant.role.grant_role_name(),
                    "write admitted"
                );
                resolver = Arc::from(resolver.apply_change(change).await);
            }
            None => {
                return Err(AuthorizationError(write_rejection(privilege, relation)));
            }
        }
    }

    Ok(())
}
