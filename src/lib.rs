//! Permissions evaluation core for a bidirectional row-replication system.
//!
//! This crate decides, for every row-level change crossing the boundary
//! between a central database and an untrusted edge client, whether an
//! authenticated identity may perform it. Writes flowing from the edge are
//! admitted or the whole transaction is rejected atomically
//! ([`validate_write`]); changes flowing from the server are filtered down
//! to what the identity may see, with notifications for rows that fall out
//! of view mid-transaction ([`filter_read`]).
//!
//! The core is a pure function over an immutable [`CompiledPermissions`]
//! snapshot plus two externally owned capabilities it never constructs
//! itself: a [`ScopeResolver`](scope::ScopeResolver) that locates the scope
//! root of an arbitrary row, and a
//! [`TransientLookup`](transient::TransientLookup) that resolves
//! time-bounded grants keyed by replication position. Everything else —
//! parsing grant and role configuration, running the replication pipeline,
//! authenticating the caller — is the surrounding system's concern.

mod change;
mod compiler;
mod error;
mod filter;
mod grant;
mod handle;
mod identity;
mod lsn;
mod message;
mod primary_key;
mod privilege;
mod relation;
mod resolve;
mod role;
mod scope;
mod transient;
mod validate;

pub use change::{Change, Record, Transaction};
pub use compiler::{AssignedRoles, CompiledPermissions};
pub use error::{AuthorizationError, ConfigError};
pub use filter::{filter_read, validate_read, MoveOut};
pub use grant::{Grant, GrantRecord};
pub use handle::PermissionsHandle;
pub use identity::Identity;
pub use lsn::Lsn;
pub use primary_key::PrimaryKey;
pub use privilege::Privilege;
pub use relation::Relation;
pub use resolve::Mode;
pub use role::{
    AssignedRole, Role, RoleGrant, RoleRecord, ANYONE_ROLE_NAME, AUTHENTICATED_ROLE_NAME,
};
pub use scope::{ScopeLocation, ScopeResolver};
pub use transient::{TransientLookup, TransientRecord};
pub use validate::validate_write;
