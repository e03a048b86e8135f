//! The scope resolver contract.
//!
//! A scope is a subtree of related rows anchored at a scope-root row. The
//! core never resolves scopes itself — it's handed a resolver capability and
//! consults it by reference, the same way the rest of this crate treats
//! storage and transient-grant lookups as externally owned collaborators.

use async_trait::async_trait;

use crate::change::Change;
use crate::primary_key::PrimaryKey;
use crate::relation::Relation;

/// The resolved scope-root id of a row, plus the foreign-key chain that was
/// walked to find it. The chain is what the read filter hands back in a
/// [`crate::filter::MoveOut`] so downstream can reconstruct why a row fell
/// out of view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeLocation {
    pub id: PrimaryKey,
    pub path: Vec<(Relation, PrimaryKey)>,
}

/// Resolves which scope tree a row belongs to, and how a change affects
/// that membership.
///
/// Implementations are expected to be backed by the storage engine and are
/// consulted by reference; `apply_change` must be persistent/functional —
/// its result is a *new* resolver value that leaves `self` untouched, so a
/// rejected transaction can discard every intermediate resolver it produced
/// without observable effect (§5).
#[async_trait]
pub trait ScopeResolver: Send + Sync {
    /// The primary key of the scope-root row owning `change`'s row under
    /// `scope_relation`, walking foreign keys as needed. `None` if the row
    /// is outside that scope (or the lookup genuinely fails — both
    /// collapse to "this scoped grant doesn't apply").
    async fn scope_id(&self, scope_relation: &Relation, change: &Change) -> Option<ScopeLocation>;

    /// `true` iff `change` edits a foreign key on the path from
    /// `change.relation()` up to `scope_relation`. Purely structural —
    /// it inspects which columns changed, not their resolved values, so it
    /// never needs to reach into storage.
    fn modifies_fk(&self, scope_relation: &Relation, change: &Change) -> bool;

    /// Produce the successor resolver reflecting `change`'s effect on scope
    /// membership (e.g. a row gaining a new parent).
    async fn apply_change(&self, change: &Change) -> Box<dyn ScopeResolver>;
}
