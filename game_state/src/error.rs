//! Unified error type for state mutation and validation.

use thiserror::Error;

use crate::concepts::ConceptType;

/// Errors produced while mutating or validating game state.
///
/// Everything here is an internal fault or an invariant violation. Normal
/// game-rule failures (a missed attack, an unknown target named by the
/// player) are returned as data by the execution layer, never as `Err`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StateError {
    /// A change referenced an entity that does not exist.
    #[error("unresolved reference: {kind} '{name}'")]
    UnresolvedReference { kind: &'static str, name: String },

    /// A change named a property the target does not have.
    #[error("unknown property '{property}' on {target}")]
    UnknownProperty { target: String, property: String },

    /// A numeric invariant (hp/mp bounds, non-negative maxima) would break.
    #[error("bounds violation: {0}")]
    BoundsViolation(String),

    /// A change was structurally invalid (bad selector, wrong value shape).
    #[error("invalid change: {0}")]
    InvalidChange(String),

    /// A concept with this type/name pair already exists.
    #[error("duplicate concept: {concept_type} '{name}'")]
    DuplicateConcept {
        concept_type: ConceptType,
        name: String,
    },

    /// A concept update or delete named a concept that is not registered.
    #[error("concept not found: {concept_type} '{name}'")]
    ConceptNotFound {
        concept_type: ConceptType,
        name: String,
    },

    /// A second transaction was opened against a state that already has one.
    ///
    /// This is a programming fault in the caller, not a game condition;
    /// it must not be retried.
    #[error("a transaction is already open for this game state")]
    TransactionConflict,

    /// Snapshot serialization or restore failed.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl StateError {
    /// Create an unresolved-reference error.
    pub fn unresolved(kind: &'static str, name: impl Into<String>) -> Self {
        Self::UnresolvedReference {
            kind,
            name: name.into(),
        }
    }

    /// Create an unknown-property error.
    pub fn unknown_property(target: impl Into<String>, property: impl Into<String>) -> Self {
        Self::UnknownProperty {
            target: target.into(),
            property: property.into(),
        }
    }

    /// Create a bounds-violation error.
    pub fn bounds(msg: impl Into<String>) -> Self {
        Self::BoundsViolation(msg.into())
    }

    /// Create an invalid-change error.
    pub fn invalid_change(msg: impl Into<String>) -> Self {
        Self::InvalidChange(msg.into())
    }
}
