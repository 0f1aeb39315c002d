//! Atomic state transactions with commit/rollback.
//!
//! A [`StateTransaction`] is an arena of pending work: state changes and
//! concept operations are buffered, not applied. Commit clones the live
//! state, applies the whole buffer to the clone, re-validates every
//! invariant, and only then swaps the clone in. A failing commit leaves the
//! live state untouched, which makes it equivalent to a rollback. Nested
//! transactions are not supported; a rule that needs sub-steps accumulates
//! entries in the single open transaction.

use serde_json::{Map, Value};

use crate::changes::StateChange;
use crate::concepts::{Concept, ConceptType};
use crate::error::StateError;
use crate::state::{EventRecord, GameState};

/// A buffered concept-lifecycle operation.
#[derive(Debug, Clone, PartialEq)]
enum ConceptOp {
    Create(Concept),
    Update {
        concept_type: ConceptType,
        name: String,
        properties: Map<String, Value>,
    },
    Delete {
        concept_type: ConceptType,
        name: String,
    },
}

/// An open batch of pending state changes.
///
/// Only obtainable from [`GameState::begin`], so the single-transaction
/// guard cannot be bypassed; consumed by [`GameState::commit`] or
/// [`GameState::rollback`].
#[derive(Debug, Clone, PartialEq)]
pub struct StateTransaction {
    changes: Vec<StateChange>,
    concept_ops: Vec<ConceptOp>,
}

impl StateTransaction {
    /// Buffer a state change.
    pub fn add_change(&mut self, change: StateChange) {
        self.changes.push(change);
    }

    /// Buffer the creation of a concept.
    ///
    /// Resolved with get-or-create semantics at commit: if the type/name
    /// pair already exists, the existing concept is kept and no new one is
    /// created.
    pub fn create_concept(&mut self, concept: Concept) {
        self.concept_ops.push(ConceptOp::Create(concept));
    }

    /// Buffer a property merge into an existing concept.
    pub fn update_concept(
        &mut self,
        concept_type: ConceptType,
        name: impl Into<String>,
        properties: Map<String, Value>,
    ) {
        self.concept_ops.push(ConceptOp::Update {
            concept_type,
            name: name.into(),
            properties,
        });
    }

    /// Buffer the deletion of a concept. Idempotent at commit.
    pub fn delete_concept(&mut self, concept_type: ConceptType, name: impl Into<String>) {
        self.concept_ops.push(ConceptOp::Delete {
            concept_type,
            name: name.into(),
        });
    }

    /// The changes buffered so far.
    pub fn changes(&self) -> &[StateChange] {
        &self.changes
    }

    /// Whether nothing has been buffered.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty() && self.concept_ops.is_empty()
    }
}

/// What a successful commit actually applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommitOutcome {
    /// Every state change applied, in order.
    pub changes: Vec<StateChange>,
    /// Concepts newly created this turn.
    pub created: Vec<Concept>,
    /// Concepts whose properties were merged this turn.
    pub updated: Vec<Concept>,
    /// Type/name pairs deleted this turn.
    pub deleted: Vec<(ConceptType, String)>,
}

impl GameState {
    /// Open a transaction against this state.
    ///
    /// Only one transaction may be open at a time; a second `begin` is a
    /// programming fault and fails with [`StateError::TransactionConflict`].
    pub fn begin(&mut self) -> Result<StateTransaction, StateError> {
        if self.transaction_open {
            return Err(StateError::TransactionConflict);
        }
        self.transaction_open = true;
        Ok(StateTransaction {
            changes: Vec::new(),
            concept_ops: Vec::new(),
        })
    }

    /// Commit a transaction: apply the buffer atomically and advance the
    /// turn counter.
    ///
    /// On error the live state is untouched and the transaction is closed,
    /// exactly as if [`rollback`](Self::rollback) had been called.
    pub fn commit(
        &mut self,
        transaction: StateTransaction,
        summary: impl Into<String>,
    ) -> Result<CommitOutcome, StateError> {
        self.transaction_open = false;

        let mut staged = self.clone();
        for change in &transaction.changes {
            staged.apply_change(change)?;
        }

        let next_turn = staged.turn + 1;
        let mut outcome = CommitOutcome {
            changes: transaction.changes,
            ..CommitOutcome::default()
        };
        for op in transaction.concept_ops {
            match op {
                ConceptOp::Create(mut concept) => {
                    if staged
                        .concepts
                        .contains(concept.concept_type, &concept.name)
                    {
                        continue;
                    }
                    concept.created_turn = next_turn;
                    staged.concepts.create(concept.clone())?;
                    outcome.created.push(concept);
                }
                ConceptOp::Update {
                    concept_type,
                    name,
                    properties,
                } => {
                    let updated = staged.concepts.update(concept_type, &name, properties)?;
                    outcome.updated.push(updated.clone());
                }
                ConceptOp::Delete { concept_type, name } => {
                    if staged.concepts.delete(concept_type, &name) {
                        outcome.deleted.push((concept_type, name));
                    }
                }
            }
        }

        staged.validate()?;
        staged.turn = next_turn;
        staged.events.push(EventRecord {
            turn: next_turn,
            summary: summary.into(),
        });

        *self = staged;
        Ok(outcome)
    }

    /// Discard a transaction. The buffer is dropped; nothing was applied.
    pub fn rollback(&mut self, _transaction: StateTransaction) {
        self.transaction_open = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::changes::ChangeTarget;
    use crate::world::{Location, Npc, NpcArchetype};
    use serde_json::json;

    fn sample_state() -> GameState {
        let mut state = GameState::new();
        state.world.add_location(Location::new("cave", "a damp cave"));
        state.world.current_location = "cave".to_string();
        state.player.location = "cave".to_string();
        state
            .world
            .add_npc(Npc::new("goblin", NpcArchetype::Hostile, 15));
        state
    }

    #[test]
    fn test_changes_invisible_until_commit() {
        let mut state = sample_state();
        let mut txn = state.begin().unwrap();
        txn.add_change(StateChange::modify(
            ChangeTarget::npc("goblin"),
            "hp",
            json!(-5),
        ));
        assert_eq!(state.world.get_npc("goblin").unwrap().hp, 15);

        state.commit(txn, "attacked the goblin").unwrap();
        assert_eq!(state.world.get_npc("goblin").unwrap().hp, 10);
    }

    #[test]
    fn test_commit_advances_turn_and_history() {
        let mut state = sample_state();
        let txn = state.begin().unwrap();
        state.commit(txn, "waited").unwrap();
        assert_eq!(state.turn, 1);
        assert_eq!(state.events.len(), 1);
        assert_eq!(state.events[0].summary, "waited");
        assert_eq!(state.events[0].turn, 1);
    }

    #[test]
    fn test_rollback_restores_snapshot_exactly() {
        let mut state = sample_state();
        let before = state.snapshot().unwrap();

        let mut txn = state.begin().unwrap();
        txn.add_change(StateChange::modify(ChangeTarget::Player, "hp", json!(-3)));
        txn.create_concept(Concept::new(ConceptType::Item, "orb", "a glass orb"));
        state.rollback(txn);

        assert_eq!(state.snapshot().unwrap(), before);
    }

    #[test]
    fn test_failed_commit_leaves_state_untouched() {
        let mut state = sample_state();
        let before = state.snapshot().unwrap();

        let mut txn = state.begin().unwrap();
        txn.add_change(StateChange::modify(
            ChangeTarget::npc("goblin"),
            "hp",
            json!(-5),
        ));
        // Dangling reference makes the whole batch fail.
        txn.add_change(StateChange::modify(
            ChangeTarget::npc("dragon"),
            "hp",
            json!(-5),
        ));
        assert!(state.commit(txn, "bad batch").is_err());
        assert_eq!(state.snapshot().unwrap(), before);

        // The state is usable again; no transaction left open.
        let txn = state.begin().unwrap();
        state.rollback(txn);
    }

    #[test]
    fn test_second_begin_conflicts() {
        let mut state = sample_state();
        let txn = state.begin().unwrap();
        assert_eq!(state.begin().unwrap_err(), StateError::TransactionConflict);
        state.rollback(txn);
        assert!(state.begin().is_ok());
    }

    #[test]
    fn test_concept_ops_commit_and_stamp_turn() {
        let mut state = sample_state();
        let mut txn = state.begin().unwrap();
        txn.create_concept(Concept::new(ConceptType::Item, "silvered_blade", "a blade"));
        let outcome = state.commit(txn, "found a blade").unwrap();

        assert_eq!(outcome.created.len(), 1);
        let stored = state.concepts.get(ConceptType::Item, "silvered_blade").unwrap();
        assert_eq!(stored.created_turn, 1);
    }

    #[test]
    fn test_duplicate_create_is_get_or_create() {
        let mut state = sample_state();
        let mut txn = state.begin().unwrap();
        txn.create_concept(Concept::new(ConceptType::Item, "silvered_blade", "original"));
        state.commit(txn, "first find").unwrap();

        let mut txn = state.begin().unwrap();
        txn.create_concept(Concept::new(ConceptType::Item, "silvered_blade", "again"));
        let outcome = state.commit(txn, "second find").unwrap();

        assert!(outcome.created.is_empty());
        assert_eq!(state.concepts.len(), 1);
        assert_eq!(
            state
                .concepts
                .get(ConceptType::Item, "silvered_blade")
                .unwrap()
                .description,
            "original"
        );
    }

    #[test]
    fn test_update_and_delete_ops() {
        let mut state = sample_state();
        let mut txn = state.begin().unwrap();
        txn.create_concept(Concept::new(ConceptType::Status, "cursed", "bad luck"));
        state.commit(txn, "got cursed").unwrap();

        let mut props = Map::new();
        props.insert("severity".to_string(), json!("mild"));
        let mut txn = state.begin().unwrap();
        txn.update_concept(ConceptType::Status, "cursed", props);
        let outcome = state.commit(txn, "curse weakened").unwrap();
        assert_eq!(outcome.updated.len(), 1);

        let mut txn = state.begin().unwrap();
        txn.delete_concept(ConceptType::Status, "cursed");
        txn.delete_concept(ConceptType::Status, "cursed");
        let outcome = state.commit(txn, "curse lifted").unwrap();
        assert_eq!(outcome.deleted.len(), 1);
        assert!(!state.concepts.contains(ConceptType::Status, "cursed"));
    }

    #[test]
    fn test_commit_time_invariant_check() {
        let mut state = sample_state();
        let before = state.snapshot().unwrap();

        let mut txn = state.begin().unwrap();
        txn.add_change(StateChange::modify(ChangeTarget::Player, "max_hp", json!(-5)));
        assert!(matches!(
            state.commit(txn, "impossible"),
            Err(StateError::BoundsViolation(_))
        ));
        assert_eq!(state.snapshot().unwrap(), before);
    }
}
