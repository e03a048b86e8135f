//! The authenticated (or anonymous) identity behind a request.

use serde_json::Value;

/// A pre-validated identity. Authentication itself is out of scope for the
/// core — this struct is an input produced by the surrounding system.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    user_id: Option<String>,
    claims: Value,
}

impl Identity {
    /// An authenticated identity carrying a non-empty user id.
    #[must_use]
    pub fn authenticated(user_id: impl Into<String>, claims: Value) -> Self {
        Self {
            user_id: Some(user_id.into()),
            claims,
        }
    }

    /// An anonymous identity with no user id.
    #[must_use]
    pub fn anonymous() -> Self {
        Self {
            user_id: None,
            claims: Value::Null,
        }
    }

    /// The user id, if the identity is authenticated.
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// `true` iff the identity carries a non-empty user id.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.user_id.as_deref().is_some_and(|id| !id.is_empty())
    }

    /// Opaque claims attached to the identity.
    #[must_use]
    pub fn claims(&self) -> &Value {
        &self.claims
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_identity_is_not_authenticated() {
        assert!(!Identity::anonymous().is_authenticated());
    }

    #[test]
    fn empty_user_id_is_not_authenticated() {
        assert!(!Identity::authenticated("", Value::Null).is_authenticated());
    }

    #[test]
    fn non_empty_user_id_is_authenticated() {
        assert!(Identity::authenticated("u1", Value::Null).is_authenticated());
    }
}
