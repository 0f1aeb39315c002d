//! State changes - the only currency for mutating game state.
//!
//! A [`StateChange`] is pure data. It has no effect until a transaction
//! applies it at commit time, which keeps every mutation auditable and
//! rollback-safe.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

use crate::error::StateError;

/// Selects the entity a change applies to.
///
/// The wire syntax is `"player"`, `"npc:<name>"` or `"world"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ChangeTarget {
    Player,
    Npc(String),
    World,
}

impl ChangeTarget {
    /// Target an NPC by name.
    pub fn npc(name: impl Into<String>) -> Self {
        ChangeTarget::Npc(name.into())
    }
}

impl std::fmt::Display for ChangeTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChangeTarget::Player => write!(f, "player"),
            ChangeTarget::Npc(name) => write!(f, "npc:{}", name),
            ChangeTarget::World => write!(f, "world"),
        }
    }
}

impl FromStr for ChangeTarget {
    type Err = StateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "player" => Ok(ChangeTarget::Player),
            "world" => Ok(ChangeTarget::World),
            other => match other.strip_prefix("npc:") {
                Some(name) if !name.is_empty() => Ok(ChangeTarget::Npc(name.to_string())),
                _ => Err(StateError::invalid_change(format!(
                    "unrecognized change target '{}'",
                    other
                ))),
            },
        }
    }
}

impl From<ChangeTarget> for String {
    fn from(target: ChangeTarget) -> Self {
        target.to_string()
    }
}

impl TryFrom<String> for ChangeTarget {
    type Error = StateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// What a change does to the selected property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeAction {
    /// Insert into a collection (inventory, status effects, flags).
    Add,
    /// Remove from a collection.
    Remove,
    /// Apply a delta to a resource, or replace a scalar value.
    Modify,
}

/// A single proposed mutation to game state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateChange {
    pub target: ChangeTarget,
    pub action: ChangeAction,
    pub property: String,
    pub value: Value,
}

impl StateChange {
    /// Create a change with an explicit action.
    pub fn new(
        target: ChangeTarget,
        action: ChangeAction,
        property: impl Into<String>,
        value: Value,
    ) -> Self {
        Self {
            target,
            action,
            property: property.into(),
            value,
        }
    }

    /// Create a `Modify` change.
    pub fn modify(target: ChangeTarget, property: impl Into<String>, value: Value) -> Self {
        Self::new(target, ChangeAction::Modify, property, value)
    }

    /// Create an `Add` change.
    pub fn add(target: ChangeTarget, property: impl Into<String>, value: Value) -> Self {
        Self::new(target, ChangeAction::Add, property, value)
    }

    /// Create a `Remove` change.
    pub fn remove(target: ChangeTarget, property: impl Into<String>, value: Value) -> Self {
        Self::new(target, ChangeAction::Remove, property, value)
    }
}
