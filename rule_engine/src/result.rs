//! Execution results - the structured outcome handed to the narrator.

use serde::{Deserialize, Serialize};

use game_state::{Concept, DiceRoll, StateChange};

/// The complete outcome of attempting one action.
///
/// A result with `success == false` and a `failure_reason` is a normal
/// game-rule outcome (a miss, an unknown target), not an engine fault;
/// callers drive the game loop on this data alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub success: bool,
    /// What was actually attempted, e.g. "attack goblin for 5 damage".
    pub action_taken: String,
    /// Every state change applied by the committed transaction, in order.
    pub state_changes: Vec<StateChange>,
    /// Dice resolved while computing the outcome.
    pub dice_results: Vec<DiceRoll>,
    /// Textual side notes about the world, for narration.
    pub world_changes: Vec<String>,
    /// Concepts created this turn.
    pub new_concepts: Vec<Concept>,
    /// Present iff `success` is false.
    pub failure_reason: Option<String>,
}

impl ExecutionResult {
    /// A successful outcome.
    pub fn success(action_taken: impl Into<String>) -> Self {
        Self {
            success: true,
            action_taken: action_taken.into(),
            state_changes: Vec::new(),
            dice_results: Vec::new(),
            world_changes: Vec::new(),
            new_concepts: Vec::new(),
            failure_reason: None,
        }
    }

    /// A failed outcome with a reason.
    pub fn failure(action_taken: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            success: false,
            failure_reason: Some(reason.into()),
            ..Self::success(action_taken)
        }
    }

    /// Attach a dice roll.
    pub fn with_dice(mut self, roll: DiceRoll) -> Self {
        self.dice_results.push(roll);
        self
    }

    /// Attach a narrative side note.
    pub fn with_world_change(mut self, note: impl Into<String>) -> Self {
        self.world_changes.push(note.into());
        self
    }

    /// One-line summary for history and logs.
    pub fn summary(&self) -> String {
        if self.success {
            self.action_taken.clone()
        } else {
            match &self.failure_reason {
                Some(reason) => format!("failed: {} ({})", self.action_taken, reason),
                None => format!("failed: {}", self.action_taken),
            }
        }
    }
}
