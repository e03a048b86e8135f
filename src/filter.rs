//! The read filter (§4.7): per-transaction filtering of downstream changes.

use std::sync::Arc;

use crate::change::{Change, Record, Transaction};
use crate::compiler::CompiledPermissions;
use crate::lsn::Lsn;
use crate::primary_key::PrimaryKey;
use crate::privilege::Privilege;
use crate::relation::Relation;
use crate::resolve::{role_grant_for_change, Mode};
use crate::role::RoleGrant;
use crate::scope::ScopeResolver;

/// A row that was visible to the client before this transaction and is not
/// after it, so downstream caches can evict it (§3, GLOSSARY).
#[derive(Debug, Clone)]
pub struct MoveOut {
    pub change: Change,
    pub scope_path: Vec<(Relation, PrimaryKey)>,
    pub relation: Relation,
    pub id: PrimaryKey,
}

/// Extracts a row's own identity from a record column literally named `id`.
/// The core doesn't know the upstream schema's primary-key column name, and
/// every seed scenario in this crate's tests uses `id`; a row without one
/// degrades to an empty string key rather than panicking.
fn row_id(record: &Record) -> PrimaryKey {
    record
        .get("id")
        .and_then(PrimaryKey::from_json)
        .unwrap_or_else(|| PrimaryKey::String(String::new()))
}

/// The first scope chain `probe`'s row resolves into, trying each tracked
/// scope relation in compiled order. Empty if the row belongs to none of
/// them (or there are none).
async fn scope_path_for(
    compiled: &CompiledPermissions,
    resolver: &Arc<dyn ScopeResolver>,
    probe: &Change,
) -> Vec<(Relation, PrimaryKey)> {
    for scope_relation in compiled.scopes() {
        if let Some(location) = resolver.scope_id(scope_relation, probe).await {
            let mut path = location.path;
            path.push((scope_relation.clone(), location.id));
            return path;
        }
    }
    Vec::new()
}

/// The `SELECT` role-grant admitting `change`, if any (§6).
///
/// Used both as the read filter's per-change visibility test and directly by
/// callers that only need a yes/no answer for a single row.
pub async fn validate_read(
    change: &Change,
    compiled: &CompiledPermissions,
    resolver: &Arc<dyn ScopeResolver>,
    lsn: Lsn,
) -> Option<RoleGrant> {
    let bucket = compiled.bucket(change.relation(), Privilege::Select)?;
    role_grant_for_change(bucket, resolver, compiled.transient_lookup(), change, lsn, Mode::Read).await
}

/// Filter `transaction` down to the changes visible to `compiled`'s identity,
/// and collect notifications for rows that left visibility (§4.7).
///
/// Evaluated against a single resolver snapshot — unlike the write
/// validator, the filter never threads a mutating resolver across changes.
/// Column subsetting is a declared gap: every column of a visible row is
/// emitted as-is.
pub async fn filter_read(compiled: &CompiledPermissions, transaction: &Transaction) -> (Transaction, Vec<MoveOut>) {
    let resolver = compiled.scope_resolver().clone();
    let mut changes = Vec::with_capacity(transaction.changes.len());
    let mut move_outs = Vec::new();

    for change in &transaction.changes {
        match change {
            Change::Insert { .. } | Change::Delete { .. } | Change::ScopeMove { .. } => {
                if validate_read(change, compiled, &resolver, transaction.lsn)
                    .await
                    .is_some()
                {
                    changes.push(change.clone());
                }
            }
            Change::Update {
                relation,
                record,
                old_record,
                ..
            } => {
                let before = Change::probe(relation, old_record);
                let after = Change::probe(relation, record);
                let visible_before = validate_read(&before, compiled, &resolver, transaction.lsn)
                    .await
                    .is_some();
                let visible_after = validate_read(&after, compiled, &resolver, transaction.lsn)
                    .await
                    .is_some();

                match (visible_before, visible_after) {
                    (true, true) => changes.push(change.clone()),
                    (true, false) => {
                        let scope_path = scope_path_for(compiled, &resolver, &before).await;
                        move_outs.push(MoveOut {
                            change: change.clone(),
                            scope_path,
                            relation: relation.clone(),
                            id: row_id(old_record),
                        });
                    }
                    (false, true) => changes.push(Change::Insert {
                        relation: relation.clone(),
                        record: record.clone(),
                    }),
                    (false, false) => {}
                }
            }
        }
    }

    (
        Transaction {
            lsn: transaction.lsn,
            changes,
        },
        move_outs,
    )
}
