//! The transient-grant lookup contract (§4.4).

use async_trait::async_trait;

use crate::lsn::Lsn;
use crate::primary_key::PrimaryKey;
use crate::relation::Relation;
use crate::role::RoleGrant;

/// A time- and position-bounded grant obtained from the transient table.
///
/// Valid over the half-open LSN window `[valid_from_lsn, valid_to_lsn)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransientRecord {
    pub target_relation: Relation,
    pub target_id: PrimaryKey,
    pub valid_from_lsn: Lsn,
    pub valid_to_lsn: Lsn,
}

impl TransientRecord {
    /// `true` iff `lsn` falls inside `[valid_from_lsn, valid_to_lsn)`.
    #[must_use]
    pub fn covers(&self, lsn: Lsn) -> bool {
        self.valid_from_lsn <= lsn && lsn < self.valid_to_lsn
    }
}

/// Looks up transient grants applicable to a set of roles at a given LSN.
///
/// Backed by a process-wide table external to the core; the core treats it
/// as an opaque handle and assumes reads are consistent for the duration of
/// one change evaluation (§5).
#[async_trait]
pub trait TransientLookup: Send + Sync {
    /// Transient grants earned by any of `roles`, valid at `lsn`.
    ///
    /// Only records whose window contains `lsn` are returned; the rest is
    /// filtering the caller doesn't need to repeat.
    async fn for_roles(&self, roles: &[RoleGrant], lsn: Lsn) -> Vec<(RoleGrant, TransientRecord)>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn covers_is_half_open() {
        let record = TransientRecord {
            target_relation: Relation::new("public", "issues"),
            target_id: PrimaryKey::from(1_i64),
            valid_from_lsn: Lsn(10),
            valid_to_lsn: Lsn(20),
        };
        assert!(!record.covers(Lsn(9)));
        assert!(record.covers(Lsn(10)));
        assert!(record.covers(Lsn(19)));
        assert!(!record.covers(Lsn(20)));
    }
}
