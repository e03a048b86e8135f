//! Error taxonomy for the permissions core.
//!
//! Configuration errors surface from the compiler when a grant/role record
//! can't be decoded. Authorization denials are per-transaction and carry a
//! single user-visible message (see [`crate::message`]). Neither variant
//! panics its way out of the core — every outcome here is a returned value.

use thiserror::Error;

/// A grant or role record could not be decoded into the core's model.
///
/// Reported by the compiler and surfaced to whoever supplied the
/// configuration — this is not a per-transaction error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A role record named a kind the compiler doesn't recognise.
    #[error("unknown role kind: {0}")]
    UnknownRoleKind(String),

    /// A grant record named a privilege the compiler doesn't recognise.
    #[error("unknown privilege: {0}")]
    UnknownPrivilege(String),

    /// A grant record declared an empty privilege set.
    #[error("grant for role {role_name:?} on {relation} has no privileges")]
    EmptyPrivileges { role_name: String, relation: String },
}

/// A transaction was rejected because the identity lacks the rights to
/// perform one of its changes.
///
/// Carries the single stable, user-visible message described in the
/// external interface (§6): `"user does not have permission to <VERB> <relation>"`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct AuthorizationError(pub(crate) String);

impl AuthorizationError {
    /// The rejection message, suitable for returning to the caller verbatim.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.0
    }
}
