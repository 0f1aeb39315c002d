//! Melee attack against a named NPC.

use serde_json::json;

use game_state::{ChangeTarget, DiceExpression, GameState, StateChange, StateTransaction};

use crate::function::{FunctionContext, FunctionError, GameFunction};
use crate::intent::Intent;
use crate::result::ExecutionResult;

const CATEGORY: &str = "attack";
const DAMAGE_DICE: DiceExpression = DiceExpression {
    count: 1,
    sides: 6,
    modifier: 2,
};

/// Attack a living NPC for `1d6+2` damage.
pub struct AttackFunction;

impl GameFunction for AttackFunction {
    fn name(&self) -> &str {
        "attack"
    }

    fn description(&self) -> &str {
        "Strike a target with a melee attack"
    }

    fn priority(&self) -> u8 {
        10
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
        transaction: &mut StateTransaction,
    ) -> Result<ExecutionResult, FunctionError> {
        let target = &context.intent.target;
        let npc = match state.world.find_npc(target) {
            Some(npc) => npc,
            None => {
                return Ok(ExecutionResult::failure(
                    format!("attack {}", target),
                    format!("no target named '{}'", target),
                ))
            }
        };
        if !npc.is_alive() {
            return Ok(ExecutionResult::failure(
                format!("attack {}", npc.name),
                format!("{} is already defeated", npc.name),
            ));
        }

        let roll = context.roll(&DAMAGE_DICE);
        let damage = roll.total.max(0);
        transaction.add_change(StateChange::modify(
            ChangeTarget::npc(&npc.name),
            "hp",
            json!(-damage),
        ));

        let mut result =
            ExecutionResult::success(format!("attack {} for {} damage", npc.name, damage))
                .with_dice(roll);
        if npc.hp <= damage {
            result = result.with_world_change(format!("{} falls", npc.name));
        }
        Ok(result)
    }
}
