//! Conversation with an NPC. No mechanical state change; the narrator
//! builds the actual exchange from the result.

use game_state::{GameState, StateTransaction};

use crate::function::{FunctionContext, FunctionError, GameFunction};
use crate::intent::Intent;
use crate::result::ExecutionResult;

const CATEGORY: &str = "dialogue";

/// Talk to a living NPC.
pub struct DialogueFunction;

impl GameFunction for DialogueFunction {
    fn name(&self) -> &str {
        "dialogue"
    }

    fn description(&self) -> &str {
        "Converse with a character"
    }

    fn can_execute(&self, intent: &Intent, state: &GameState) -> bool {
        intent.category == CATEGORY
            && !intent.target.is_empty()
            && state.world.find_npc(&intent.target).is_some()
    }

    fn execute(
        &self,
        context: &mut FunctionContext<'_>,
        state: &GameState,
        _transaction: &mut StateTransaction,
    ) -> Result<ExecutionResult, FunctionError> {
        let target = &context.intent.target;
        let npc = match state.world.find_npc(target) {
            Some(npc) => npc,
            None => {
                return Ok(ExecutionResult::failure(
                    format!("talk to {}", target),
                    format!("no one named '{}' is here", target),
                ))
            }
        };
        if !npc.is_alive() {
            return Ok(ExecutionResult::failure(
                format!("talk to {}", npc.name),
                format!("{} can no longer answer", npc.name),
            ));
        }
        Ok(
            ExecutionResult::success(format!("talk to {}", npc.name))
                .with_world_change(format!("{} turns to face you", npc.name)),
        )
    }
}
