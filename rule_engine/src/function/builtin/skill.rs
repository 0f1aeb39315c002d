//! Generic skill checks, including healing.

use serde_json::json;

use game_state::{ChangeTarget, DiceExpression, GameState, StateChange, StateTransaction};

use crate::function::{FunctionContext, FunctionError, GameFunction};
use crate::intent::Intent;
use crate::result::ExecutionResult;

const CATEGORY: &str = "skill";
const CHECK_DICE: DiceExpression = DiceExpression {
    count: 1,
    sides: 20,
    modifier: 2,
};
const HEAL_DICE: DiceExpression = DiceExpression {
    count: 1,
    sides: 8,
    modifier: 2,
};
const DIFFICULTY: i32 = 10;

/// Roll 1d20+2 against DC 10 for any named skill.
///
/// A successful healing check additionally restores 1d8+2 hp.
pub struct SkillFunction;

impl SkillFunction {
    fn skill_name(intent: &Intent) -> &str {
        if !intent.action.is_empty() {
            &intent.action
        } else {
            intent.parameter_str("skill").unwrap_or("skill")
        }
    }
}

impl GameFunction for SkillFunction {
    fn name(&self) -> &str {
        "skill"
    }

    fn description(&self) -> &str {
        "Attempt a skill check against a fixed difficulty"
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
        let skill = Self::skill_name(context.intent).to_string();
        let check = context.roll(&CHECK_DICE);

        if check.total < DIFFICULTY {
            return Ok(ExecutionResult::failure(
                format!("use {} skill", skill),
                format!("check rolled {} against difficulty {}", check.total, DIFFICULTY),
            )
            .with_dice(check));
        }

        let mut result =
            ExecutionResult::success(format!("use {} skill", skill)).with_dice(check);

        if skill.to_lowercase().contains("heal") && state.player.hp < state.player.max_hp {
            let healing = context.roll(&HEAL_DICE);
            transaction.add_change(StateChange::modify(
                ChangeTarget::Player,
                "hp",
                json!(healing.total),
            ));
            result = result
                .with_world_change(format!("healing restores {} hp", healing.total))
                .with_dice(healing);
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::IntentType;
    use game_state::FixedSource;

    #[test]
    fn test_check_below_difficulty_fails() {
        let mut state = GameState::new();
        let intent = Intent::new(IntentType::Execute, "skill").with_action("climb");
        // Raw 4 -> d20 face 5, +2 = 7 < 10.
        let mut rng = FixedSource::new([4]);
        let mut context = FunctionContext {
            intent: &intent,
            rng: &mut rng,
            content: None,
        };
        let mut txn = state.begin().unwrap();

        let result = SkillFunction
            .execute(&mut context, &state, &mut txn)
            .unwrap();
        assert!(!result.success);
        assert!(txn.is_empty());
    }

    #[test]
    fn test_successful_heal_restores_hp() {
        let mut state = GameState::new();
        state.player.hp = 8;
        let intent = Intent::new(IntentType::Execute, "skill").with_action("heal");
        // Check: raw 11 -> d20 face 12, +2 = 14. Heal: raw 3 -> d8 face 4, +2 = 6.
        let mut rng = FixedSource::new([11, 3]);
        let mut context = FunctionContext {
            intent: &intent,
            rng: &mut rng,
            content: None,
        };
        let mut txn = state.begin().unwrap();

        let result = SkillFunction
            .execute(&mut context, &state, &mut txn)
            .unwrap();
        assert!(result.success);
        state.commit(txn, result.summary()).unwrap();

        assert_eq!(state.player.hp, 14);
        assert_eq!(result.dice_results.len(), 2);
    }

    #[test]
    fn test_plain_skill_success_changes_nothing() {
        let mut state = GameState::new();
        let intent = Intent::new(IntentType::Execute, "skill").with_action("climb");
        let mut rng = FixedSource::new([15]);
        let mut context = FunctionContext {
            intent: &intent,
            rng: &mut rng,
            content: None,
        };
        let mut txn = state.begin().unwrap();

        let result = SkillFunction
            .execute(&mut context, &state, &mut txn)
            .unwrap();
        assert!(result.success);
        assert!(txn.is_empty());
    }
}
