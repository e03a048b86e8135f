//! Row-level changes and transactions.

use std::collections::{HashMap, HashSet};

use serde_json::Value;

use crate::privilege::Privilege;
use crate::relation::Relation;

/// A row, keyed by column name.
pub type Record = HashMap<String, Value>;

/// A single row-level change crossing the replication boundary.
///
/// `ScopeMove` is synthetic: the write validator manufactures it from an
/// `Update` that re-parents a row across scopes (§4.6). It never originates
/// from the replication pipeline and the read filter never emits it.
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    /// A new row.
    Insert { relation: Relation, record: Record },
    /// An existing row changing shape.
    Update {
        relation: Relation,
        record: Record,
        old_record: Record,
        changed_columns: HashSet<String>,
    },
    /// A row removed.
    Delete { relation: Relation, old_record: Record },
    /// Synthetic: an `Update` re-parenting a row into a new scope, evaluated
    /// against the new row data as if it were an insert into that scope.
    ScopeMove { relation: Relation, record: Record },
}

impl Change {
    /// The relation the change applies to.
    #[must_use]
    pub fn relation(&self) -> &Relation {
        match self {
            Self::Insert { relation, .. }
            | Self::Update { relation, .. }
            | Self::Delete { relation, .. }
            | Self::ScopeMove { relation, .. } => relation,
        }
    }

    /// The privilege a write of this shape requires (§4.6).
    #[must_use]
    pub fn required_privilege(&self) -> Privilege {
        match self {
            Self::Insert { .. } => Privilege::Insert,
            Self::Update { .. } | Self::ScopeMove { .. } => Privilege::Update,
            Self::Delete { .. } => Privilege::Delete,
        }
    }

    /// The column set consulted by `columns_valid` in write mode (§4.2, §4.8).
    ///
    /// `Insert` and `ScopeMove` expose the full key set of the row being
    /// written (a scope move is evaluated like an insert into the
    /// destination scope); `Update` exposes the columns that actually
    /// changed; `Delete` is never consulted.
    #[must_use]
    pub fn write_columns(&self) -> Option<HashSet<&str>> {
        match self {
            Self::Insert { record, .. } | Self::ScopeMove { record, .. } => {
                Some(record.keys().map(String::as_str).collect())
            }
            Self::Update {
                changed_columns, ..
            } => Some(changed_columns.iter().map(String::as_str).collect()),
            Self::Delete { .. } => None,
        }
    }

    /// A probe change representing "this relation/record as a readable row",
    /// used by the read filter to test visibility of a snapshot independent
    /// of which real change produced it (§4.7).
    #[must_use]
    pub(crate) fn probe(relation: &Relation, record: &Record) -> Self {
        Self::Insert {
            relation: relation.clone(),
            record: record.clone(),
        }
    }
}

/// An ordered batch of changes sharing one replication log position.
///
/// Order is significant: earlier changes can alter scope membership that
/// later changes in the same transaction depend on (§3, §5).
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub lsn: crate::lsn::Lsn,
    pub changes: Vec<Change>,
}
