use thiserror::Error;

use crate::core::entity::EntityCategory;
use crate::core::identifier::IdentifierKind;

/// Errors that stop a run instead of becoming a failed check
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CheckError {
    #[error("Unknown comparison operator '{0}' (expected one of =, <, >)")]
    UnknownOperator(String),

    #[error("Malformed attribute count rule on line {line}: {reason}")]
    MalformedRule { line: usize, reason: String },

    #[error(
        "Contradictory {category} lookups by {first_kind} and {second_kind}: \
         entity sets differ but neither has entities the other lacks"
    )]
    ContradictoryFetch {
        category: EntityCategory,
        first_kind: IdentifierKind,
        second_kind: IdentifierKind,
    },
}
