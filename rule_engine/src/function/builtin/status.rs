//! Read-only status report on the player.

use game_state::{GameState, StateTransaction};

use crate::function::{FunctionContext, FunctionError, GameFunction};
use crate::intent::Intent;
use crate::result::ExecutionResult;

const CATEGORY: &str = "status";

/// Report the player's condition without touching state.
///
/// Commits an empty transaction, so the turn still advances and the
/// report lands in the event log like every other action.
pub struct StatusFunction;

impl GameFunction for StatusFunction {
    fn name(&self) -> &str {
        "status"
    }

    fn description(&self) -> &str {
        "Report the player's current condition"
    }

    fn can_execute(&self, intent: &Intent, _state: &GameState) -> bool {
        intent.category == CATEGORY
    }

    fn execute(
        &self,
        _context: &mut FunctionContext<'_>,
        state: &GameState,
        _transaction: &mut StateTransaction,
    ) -> Result<ExecutionResult, FunctionError> {
        let player = &state.player;
        let mut result = ExecutionResult::success("check status")
            .with_world_change(format!(
                "hp {}/{}, mp {}/{}, ac {}",
                player.hp, player.max_hp, player.mp, player.max_mp, player.ac
            ))
            .with_world_change(format!("location: {}", player.location));
        if !player.status_effects.is_empty() {
            result = result.with_world_change(format!(
                "status effects: {}",
                player.status_effects.join(", ")
            ));
        }
        Ok(result)
    }
}
