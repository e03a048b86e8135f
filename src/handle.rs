//! A lock-free atomically swapped handle to the current compiled permissions.
//!
//! `update` replaces the whole `CompiledPermissions` value (§9,
//! "Configuration replacement, not mutation"); readers load a cheap `Arc`
//! snapshot and never block a concurrent replacement.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::compiler::CompiledPermissions;
use crate::error::ConfigError;
use crate::grant::GrantRecord;
use crate::role::RoleRecord;

/// Holds the current `CompiledPermissions` for one connection/identity and
/// publishes replacements atomically.
pub struct PermissionsHandle {
    current: ArcSwap<CompiledPermissions>,
}

impl PermissionsHandle {
    /// Wrap an initial compiled permission set.
    #[must_use]
    pub fn new(initial: CompiledPermissions) -> Self {
        Self {
            current: ArcSwap::from_pointee(initial),
        }
    }

    /// The current compiled permissions snapshot.
    #[must_use]
    pub fn load(&self) -> Arc<CompiledPermissions> {
        self.current.load_full()
    }

    /// Recompile against `(grants, roles)` and publish the result.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if any record fails to decode; the
    /// previously published snapshot is left untouched.
    pub fn update(&self, grants: Vec<GrantRecord>, roles: Vec<RoleRecord>) -> Result<(), ConfigError> {
        let current = self.load();
        let compiled = current.carry_forward().update(grants, roles)?;
        self.current.store(Arc::new(compiled));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::change::Change;
    use crate::identity::Identity;
    use crate::privilege::Privilege;
    use crate::relation::Relation;
    use crate::role::{RoleGrant, ANYONE_ROLE_NAME};
    use crate::scope::ScopeLocation;
    use crate::transient::{TransientLookup, TransientRecord};
    use async_trait::async_trait;

    struct NullResolver;

    #[async_trait]
    impl crate::scope::ScopeResolver for NullResolver {
        async fn scope_id(&self, _scope_relation: &Relation, _change: &Change) -> Option<ScopeLocation> {
            None
        }
        fn modifies_fk(&self, _scope_relation: &Relation, _change: &Change) -> bool {
            false
        }
        async fn apply_change(&self, _change: &Change) -> Box<dyn crate::scope::ScopeResolver> {
            Box::new(NullResolver)
        }
    }

    struct NullLookup;

    #[async_trait]
    impl TransientLookup for NullLookup {
        async fn for_roles(&self, _roles: &[RoleGrant], _lsn: crate::lsn::Lsn) -> Vec<(RoleGrant, TransientRecord)> {
            Vec::new()
        }
    }

    #[test]
    fn update_publishes_a_fresh_snapshot_without_touching_the_old_one() {
        let handle = PermissionsHandle::new(CompiledPermissions::new(
            Identity::anonymous(),
            Arc::new(NullResolver),
            Arc::new(NullLookup),
        ));
        let before = handle.load();
        let issues = Relation::new("public", "issues");
        handle
            .update(
                vec![GrantRecord {
                    role_name: ANYONE_ROLE_NAME.to_owned(),
                    relation: issues.clone(),
                    privileges: vec!["SELECT".to_owned()],
                    columns: None,
                    check: None,
                }],
                vec![],
            )
            .unwrap();
        let after = handle.load();
        assert!(before.bucket(&issues, Privilege::Select).is_none());
        assert!(after.bucket(&issues, Privilege::Select).is_some());
    }
}
