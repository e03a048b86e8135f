//! The single stable, user-visible write-rejection message (§6).

use crate::privilege::Privilege;
use crate::relation::Relation;

/// `"user does not have permission to <VERB> <relation>"`.
#[must_use]
pub fn write_rejection(privilege: Privilege, relation: &Relation) -> String {
    format!(
        "user does not have permission to {} {relation}",
        privilege.verb_phrase()
    )
}
