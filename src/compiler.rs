//! Compiles role and grant records into fast per-change lookup tables (§4.5).

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::error::ConfigError;
use crate::grant::{grant_from_record, Grant, GrantRecord};
use crate::identity::Identity;
use crate::privilege::Privilege;
use crate::relation::Relation;
use crate::role::{has_scope, role_from_record, Role, RoleGrant, RoleRecord};
use crate::scope::ScopeResolver;
use crate::transient::TransientLookup;

/// The role-grants applicable to one `(relation, privilege)` key, split by
/// whether the earning role carries a scope.
///
/// Built once by [`CompiledPermissions::update`] and never mutated; order
/// within each half follows the input order of roles, then of grants.
#[derive(Debug, Clone, Default)]
pub struct AssignedRoles {
    pub scoped: Vec<RoleGrant>,
    pub unscoped: Vec<RoleGrant>,
}

/// The compiled, immutable view of a configuration the validator and filter
/// consult.
///
/// Replaced wholesale by [`CompiledPermissions::update`] on configuration
/// change; readers hold it behind an atomically swapped handle (see
/// [`crate::handle::PermissionsHandle`]) rather than mutating it in place.
pub struct CompiledPermissions {
    identity: Identity,
    role_lookup: HashMap<(Relation, Privilege), AssignedRoles>,
    scoped_roles: HashMap<Relation, Vec<Arc<Role>>>,
    scopes: Vec<Relation>,
    scope_resolver: Arc<dyn ScopeResolver>,
    transient_lookup: Arc<dyn TransientLookup>,
}

impl CompiledPermissions {
    /// An empty compiled permission set carrying only the identity and the
    /// two externally owned capabilities.
    #[must_use]
    pub fn new(
        identity: Identity,
        scope_resolver: Arc<dyn ScopeResolver>,
        transient_lookup: Arc<dyn TransientLookup>,
    ) -> Self {
        Self {
            identity,
            role_lookup: HashMap::new(),
            scoped_roles: HashMap::new(),
            scopes: Vec::new(),
            scope_resolver,
            transient_lookup,
        }
    }

    /// Recompile `self` against a fresh `(grants, roles)` configuration,
    /// carrying the identity, scope resolver and transient handle forward
    /// unchanged (§4.5).
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if any role or grant record fails to decode.
    pub fn update(
        self,
        grant_records: Vec<GrantRecord>,
        role_records: Vec<RoleRecord>,
    ) -> Result<Self, ConfigError> {
        let mut roles = Vec::with_capacity(role_records.len() + 2);
        for record in role_records {
            roles.push(role_from_record(record)?);
        }
        if self.identity.is_authenticated() {
            roles.insert(0, Role::Authenticated);
        }
        roles.insert(0, Role::Anyone);

        let grants: Vec<Arc<Grant>> = grant_records
            .into_iter()
            .map(grant_from_record)
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .map(Arc::new)
            .collect();

        let mut role_lookup: HashMap<(Relation, Privilege), AssignedRoles> = HashMap::new();
        let mut scoped_roles: HashMap<Relation, Vec<Arc<Role>>> = HashMap::new();
        let mut scopes: Vec<Relation> = Vec::new();
        let mut seen_scopes: HashSet<Relation> = HashSet::new();

        for role in roles {
            let matched = crate::role::matching_grants(&role, &grants);
            if matched.is_empty() {
                continue;
            }
            let role = Arc::new(role);
            let scoped = has_scope(&role);

            if scoped {
                if let Role::Assigned(assigned) = role.as_ref() {
                    if let Some((relation, _)) = &assigned.scope {
                        if seen_scopes.insert(relation.clone()) {
                            scopes.push(relation.clone());
                        }
                        scoped_roles
                            .entry(relation.clone())
                            .or_default()
                            .push(role.clone());
                    }
                }
            }

            for grant in matched {
                for &privilege in &grant.privileges {
                    let bucket = role_lookup
                        .entry((grant.relation.clone(), privilege))
                        .or_default();
                    let role_grant = RoleGrant {
                        role: role.clone(),
                        grant: grant.clone(),
                    };
                    if scoped {
                        bucket.scoped.push(role_grant);
                    } else {
                        bucket.unscoped.push(role_grant);
                    }
                }
            }
        }

        Ok(Self {
            identity: self.identity,
            role_lookup,
            scoped_roles,
            scopes,
            scope_resolver: self.scope_resolver,
            transient_lookup: self.transient_lookup,
        })
    }

    /// The identity this configuration was compiled for.
    #[must_use]
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// A fresh, empty `CompiledPermissions` carrying this one's identity,
    /// scope resolver and transient handle forward. Used by
    /// [`crate::handle::PermissionsHandle::update`] to recompile without
    /// requiring ownership of the published snapshot.
    #[must_use]
    pub fn carry_forward(&self) -> Self {
        Self::new(
            self.identity.clone(),
            self.scope_resolver.clone(),
            self.transient_lookup.clone(),
        )
    }

    /// The current scope resolver.
    #[must_use]
    pub fn scope_resolver(&self) -> &Arc<dyn ScopeResolver> {
        &self.scope_resolver
    }

    /// The transient-grant lookup handle.
    #[must_use]
    pub fn transient_lookup(&self) -> &Arc<dyn TransientLookup> {
        &self.transient_lookup
    }

    /// The `AssignedRoles` bucket for `(relation, privilege)`, if any role
    /// earns a grant there.
    #[must_use]
    pub fn bucket(&self, relation: &Relation, privilege: Privilege) -> Option<&AssignedRoles> {
        self.role_lookup.get(&(relation.clone(), privilege))
    }

    /// Every relation that some role is scoped to.
    #[must_use]
    pub fn scopes(&self) -> &[Relation] {
        &self.scopes
    }

    /// The roles scoped to `relation`, if any.
    #[must_use]
    pub fn scoped_roles(&self, relation: &Relation) -> &[Arc<Role>] {
        self.scoped_roles
            .get(relation)
            .map_or(&[], Vec::as_slice)
    }
}
