//! Moving between connected locations.

use serde_json::json;

use game_state::{ChangeTarget, GameState, StateChange, StateTransaction};

use crate::function::{FunctionContext, FunctionError, GameFunction};
use crate::intent::Intent;
use crate::result::ExecutionResult;

const CATEGORY: &str = "movement";

/// Move the player to a location connected to the current one.
pub struct MovementFunction;

impl MovementFunction {
    fn destination<'a>(intent: &'a Intent) -> &'a str {
        if !intent.target.is_empty() {
            &intent.target
        } else {
            intent.parameter_str("destination").unwrap_or("")
        }
    }
}

impl GameFunction for MovementFunction {
    fn name(&self) -> &str {
        "movement"
    }

    fn description(&self) -> &str {
        "Travel to a connected location"
    }

    fn can_execute(&self, intent: &Intent, _state: &GameState) -> bool {
        intent.category == CATEGORY && !Self::destination(intent).is_empty()
    }

    fn execute(
        &self,
        context: &mut FunctionContext<'_>,
        state: &GameState,
        transaction: &mut StateTransaction,
    ) -> Result<ExecutionResult, FunctionError> {
        let destination = Self::destination(context.intent);
        let here = state.world.current();

        if !state.world.locations.contains_key(destination) {
            return Ok(ExecutionResult::failure(
                format!("travel to {}", destination),
                format!("no known place called '{}'", destination),
            ));
        }
        if let Some(here) = here {
            if !here.connects_to(destination) {
                return Ok(ExecutionResult::failure(
                    format!("travel to {}", destination),
                    format!("no path from {} to {}", here.name, destination),
                ));
            }
        }

        transaction.add_change(StateChange::modify(
            ChangeTarget::Player,
            "location",
            json!(destination),
        ));

        Ok(
            ExecutionResult::success(format!("travel to {}", destination))
                .with_world_change(format!("the party arrives at {}", destination)),
        )
    }
}
