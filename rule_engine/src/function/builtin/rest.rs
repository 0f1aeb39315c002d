//! Resting to recover hit points and mana.

use serde_json::json;

use game_state::{ChangeTarget, DiceExpression, GameState, StateChange, StateTransaction};

use crate::function::{FunctionContext, FunctionError, GameFunction};
use crate::intent::Intent;
use crate::result::ExecutionResult;

const CATEGORY: &str = "rest";
const RECOVERY_DICE: DiceExpression = DiceExpression {
    count: 1,
    sides: 4,
    modifier: 0,
};

/// Recover 1d4 hp and 1d4 mp, capped at the respective maxima.
///
/// Resting is impossible while hostiles share the location.
pub struct RestFunction;

impl GameFunction for RestFunction {
    fn name(&self) -> &str {
        "rest"
    }

    fn description(&self) -> &str {
        "Rest to recover hit points and mana"
    }

    fn can_execute(&self, intent: &Intent, _state: &GameState) -> bool {
        intent.category == CATEGORY
    }

    fn execute(
        &self,
        context: &mut FunctionContext<'_>,
        state: &GameState,
        transaction: &mut StateTransaction,
    ) -> Result<ExecutionResult, FunctionError> {
        if state.world.hostiles_present() {
            return Ok(ExecutionResult::failure(
                "rest",
                "cannot rest while enemies are near",
            ));
        }

        let hp_roll = context.roll(&RECOVERY_DICE);
        let mp_roll = context.roll(&RECOVERY_DICE);

        transaction.add_change(StateChange::modify(
            ChangeTarget::Player,
            "hp",
            json!(hp_roll.total),
        ));
        transaction.add_change(StateChange::modify(
            ChangeTarget::Player,
            "mp",
            json!(mp_roll.total),
        ));

        Ok(ExecutionResult::success(format!(
            "rest and recover {} hp, {} mp",
            hp_roll.total, mp_roll.total
        ))
        .with_dice(hp_roll)
        .with_dice(mp_roll))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::IntentType;
    use game_state::{FixedSource, Npc, NpcArchetype};

    #[test]
    fn test_rest_recovers_up_to_maximum() {
        let mut state = GameState::new();
        state.player.hp = 18;
        state.player.mp = 9;
        let intent = Intent::new(IntentType::Execute, "rest");
        // Raw 2 -> d4 face 3 for both rolls.
        let mut rng = FixedSource::new([2]);
        let mut context = FunctionContext {
            intent: &intent,
            rng: &mut rng,
            content: None,
        };
        let mut txn = state.begin().unwrap();

        let result = RestFunction
            .execute(&mut context, &state, &mut txn)
            .unwrap();
        assert!(result.success);
        state.commit(txn, result.summary()).unwrap();

        assert_eq!(state.player.hp, 20);
        assert_eq!(state.player.mp, 10);
    }

    #[test]
    fn test_hostile_in_another_location_does_not_block_rest() {
        let mut state = GameState::new();
        state
            .world
            .add_location(game_state::Location::new("camp", "a safe clearing"));
        state
            .world
            .add_location(game_state::Location::new("cave", "a damp cave"));
        state.world.current_location = "camp".to_string();
        state.player.location = "camp".to_string();
        state.player.hp = 15;
        state
            .world
            .add_npc(Npc::new("goblin", NpcArchetype::Hostile, 15).with_location("cave"));

        let intent = Intent::new(IntentType::Execute, "rest");
        let mut rng = FixedSource::new([2]);
        let mut context = FunctionContext {
            intent: &intent,
            rng: &mut rng,
            content: None,
        };
        let mut txn = state.begin().unwrap();

        let result = RestFunction
            .execute(&mut context, &state, &mut txn)
            .unwrap();
        assert!(result.success);
        state.commit(txn, result.summary()).unwrap();
        assert_eq!(state.player.hp, 18);
    }

    #[test]
    fn test_hostiles_block_rest() {
        let mut state = GameState::new();
        state
            .world
            .add_npc(Npc::new("goblin", NpcArchetype::Hostile, 15));
        let intent = Intent::new(IntentType::Execute, "rest");
        let mut rng = FixedSource::new([0]);
        let mut context = FunctionContext {
            intent: &intent,
            rng: &mut rng,
            content: None,
        };
        let mut txn = state.begin().unwrap();

        let result = RestFunction
            .execute(&mut context, &state, &mut txn)
            .unwrap();
        assert!(!result.success);
        assert!(txn.is_empty());
    }
}
