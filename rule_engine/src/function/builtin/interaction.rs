//! Interacting with objects in the environment.

use game_state::{DiceExpression, GameState, StateTransaction};

use crate::function::{FunctionContext, FunctionError, GameFunction};
use crate::intent::Intent;
use crate::result::ExecutionResult;

const CATEGORY: &str = "interaction";
const INTERACTION_DICE: DiceExpression = DiceExpression {
    count: 1,
    sides: 20,
    modifier: 0,
};
const INTERACTION_DC: i32 = 12;

/// Use, open or otherwise manipulate an object, rolled against DC 12.
///
/// The mechanical outcome is only whether the object responds; what it
/// does is up to the narrator.
pub struct InteractionFunction;

impl GameFunction for InteractionFunction {
    fn name(&self) -> &str {
        "interaction"
    }

    fn description(&self) -> &str {
        "Manipulate an object in the surroundings"
    }

    fn can_execute(&self, intent: &Intent, _state: &GameState) -> bool {
        intent.category == CATEGORY
    }

    fn execute(
        &self,
        context: &mut FunctionContext<'_>,
        _state: &GameState,
        _transaction: &mut StateTransaction,
    ) -> Result<ExecutionResult, FunctionError> {
        let target = if context.intent.target.is_empty() {
            "the surroundings".to_string()
        } else {
            context.intent.target.clone()
        };

        let roll = context.roll(&INTERACTION_DICE);
        if roll.total < INTERACTION_DC {
            return Ok(ExecutionResult::failure(
                format!("interact with {}", target),
                format!("{} does not respond", target),
            )
            .with_dice(roll));
        }

        Ok(ExecutionResult::success(format!("interact with {}", target))
            .with_dice(roll)
            .with_world_change(format!("{} yields to the attempt", target)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::IntentType;
    use game_state::FixedSource;

    #[test]
    fn test_interaction_check_against_difficulty() {
        let mut state = GameState::new();
        let intent = Intent::new(IntentType::Execute, "interaction").with_target("rusty lever");

        // Raw 11 -> d20 face 12, exactly meets the DC.
        let mut rng = FixedSource::new([11]);
        let mut context = FunctionContext {
            intent: &intent,
            rng: &mut rng,
            content: None,
        };
        let mut txn = state.begin().unwrap();
        let result = InteractionFunction
            .execute(&mut context, &state, &mut txn)
            .unwrap();
        assert!(result.success);
        assert_eq!(result.action_taken, "interact with rusty lever");
        assert!(txn.is_empty());
        state.rollback(txn);

        // Raw 10 -> face 11, one short.
        let mut rng = FixedSource::new([10]);
        let mut context = FunctionContext {
            intent: &intent,
            rng: &mut rng,
            content: None,
        };
        let mut txn = state.begin().unwrap();
        let result = InteractionFunction
            .execute(&mut context, &state, &mut txn)
            .unwrap();
        assert!(!result.success);
        assert_eq!(
            result.failure_reason.as_deref(),
            Some("rusty lever does not respond")
        );
    }
}
