//! The game-function capability - one pluggable rule handler per mechanic.
//!
//! The engine never special-cases a function by name; everything it needs
//! is in this contract. New mechanics are added by registering another
//! implementor, not by touching the engine.

pub mod builtin;

use serde_json::{Map, Value};
use thiserror::Error;

use game_state::{
    ConceptType, DiceError, DiceExpression, DiceRoll, GameState, RandomSource, StateError,
    StateTransaction,
};

use crate::intent::Intent;
use crate::result::ExecutionResult;

/// Internal fault raised while a function computes its result.
///
/// This is distinct from a normal in-game failure: the engine rolls the
/// open transaction back and moves to the next candidate. A miss or an
/// invalid target is returned as a failed [`ExecutionResult`] instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FunctionError {
    #[error("dice error: {0}")]
    Dice(#[from] DiceError),
    #[error("state error: {0}")]
    State(#[from] StateError),
    #[error("{0}")]
    Internal(String),
}

/// Opaque content produced by an external generator for a new concept.
///
/// The core stores this; it never interprets it.
#[derive(Debug, Clone, Default)]
pub struct GeneratedContent {
    pub description: String,
    pub properties: Map<String, Value>,
}

/// External content-generation oracle.
///
/// Called synchronously by functions that invent concepts mid-session.
/// `None` means the generator has nothing to offer and the function falls
/// back to its own default text.
pub trait ContentGenerator: Send + Sync {
    fn generate(
        &self,
        concept_type: ConceptType,
        name: &str,
        context: &str,
    ) -> Option<GeneratedContent>;
}

/// Everything a function may consult besides the game state itself.
///
/// Randomness and content generation come through here so outcomes are
/// reproducible under test.
pub struct FunctionContext<'a> {
    pub intent: &'a Intent,
    pub rng: &'a mut dyn RandomSource,
    pub content: Option<&'a dyn ContentGenerator>,
}

impl<'a> FunctionContext<'a> {
    /// Resolve a dice expression against the injected randomness source.
    pub fn roll(&mut self, expression: &DiceExpression) -> DiceRoll {
        expression.roll(self.rng)
    }
}

/// A pluggable rule handler implementing one game mechanic.
///
/// Functions read state freely but must route every mutation through the
/// transaction; nothing they buffer is visible until the engine commits.
pub trait GameFunction: Send + Sync {
    /// Unique name, also the registry identity.
    fn name(&self) -> &str;

    /// Human-readable summary for diagnostics.
    fn description(&self) -> &str;

    /// Selection priority; higher wins. Defaults to 5.
    fn priority(&self) -> u8 {
        5
    }

    /// Cheap precondition check. Must not mutate anything.
    fn can_execute(&self, intent: &Intent, state: &GameState) -> bool;

    /// Compute the outcome, buffering all mutation in `transaction`.
    fn execute(
        &self,
        context: &mut FunctionContext<'_>,
        state: &GameState,
        transaction: &mut StateTransaction,
    ) -> Result<ExecutionResult, FunctionError>;
}
