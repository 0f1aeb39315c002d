//! Searching the surroundings, with runtime item discovery.

use serde_json::json;

use game_state::{
    ChangeTarget, Concept, ConceptType, DiceExpression, GameState, StateChange, StateTransaction,
};

use crate::function::{FunctionContext, FunctionError, GameFunction};
use crate::intent::Intent;
use crate::result::ExecutionResult;

const CATEGORY: &str = "search";
const SEARCH_DICE: DiceExpression = DiceExpression {
    count: 1,
    sides: 20,
    modifier: 0,
};
const SEARCH_DC: i32 = 10;

/// Search the area; on a successful check a new item concept may enter the
/// session and land in the current location.
///
/// The item name comes from the intent's `item` parameter. Its description
/// comes from the external content generator when one is wired in.
pub struct SearchFunction;

impl GameFunction for SearchFunction {
    fn name(&self) -> &str {
        "search"
    }

    fn description(&self) -> &str {
        "Search a target or the surrounding area"
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
        let target = if context.intent.target.is_empty() {
            "the area".to_string()
        } else {
            context.intent.target.clone()
        };

        let roll = context.roll(&SEARCH_DICE);
        if roll.total < SEARCH_DC {
            return Ok(ExecutionResult::failure(
                format!("search {}", target),
                "the search turns up nothing",
            )
            .with_dice(roll));
        }

        let mut result =
            ExecutionResult::success(format!("search {}", target)).with_dice(roll);

        if let Some(item_name) = context.intent.parameter_str("item") {
            let generated = context
                .content
                .and_then(|generator| {
                    generator.generate(ConceptType::Item, item_name, &context.intent.action)
                })
                .unwrap_or_default();
            let description = if generated.description.is_empty() {
                format!("Found while searching {}", target)
            } else {
                generated.description
            };

            let mut concept = Concept::new(ConceptType::Item, item_name, description);
            concept.properties = generated.properties;
            transaction.create_concept(concept);
            transaction.add_change(StateChange::add(
                ChangeTarget::World,
                "items",
                json!({ "name": item_name }),
            ));
            if !state.concepts.contains(ConceptType::Item, item_name) {
                result = result.with_world_change(format!("{} uncovered", item_name));
            }
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::{ContentGenerator, GeneratedContent};
    use crate::intent::IntentType;
    use game_state::{FixedSource, Location};

    struct CannedGenerator;

    impl ContentGenerator for CannedGenerator {
        fn generate(
            &self,
            _concept_type: ConceptType,
            name: &str,
            _context: &str,
        ) -> Option<GeneratedContent> {
            let mut content = GeneratedContent {
                description: format!("a gleaming {}", name),
                ..GeneratedContent::default()
            };
            content.properties.insert("rarity".to_string(), json!("rare"));
            Some(content)
        }
    }

    fn sample_state() -> GameState {
        let mut state = GameState::new();
        state
            .world
            .add_location(Location::new("ruin", "collapsed stonework"));
        state.world.current_location = "ruin".to_string();
        state.player.location = "ruin".to_string();
        state
    }

    fn search_intent() -> Intent {
        Intent::new(IntentType::Execute, "search")
            .with_action("search the rubble")
            .with_parameter("item", json!("silvered_blade"))
    }

    #[test]
    fn test_successful_search_creates_item() {
        let mut state = sample_state();
        let intent = search_intent();
        // Raw 9 -> d20 face 10, meets the DC.
        let mut rng = FixedSource::new([9]);
        let mut context = FunctionContext {
            intent: &intent,
            rng: &mut rng,
            content: Some(&CannedGenerator),
        };
        let mut txn = state.begin().unwrap();

        let result = SearchFunction
            .execute(&mut context, &state, &mut txn)
            .unwrap();
        assert!(result.success);
        assert_eq!(txn.changes().len(), 1);
        assert!(!txn.is_empty());
    }

    #[test]
    fn test_failed_check_is_normal_failure() {
        let mut state = sample_state();
        let intent = search_intent();
        // Raw 3 -> d20 face 4, under the DC.
        let mut rng = FixedSource::new([3]);
        let mut context = FunctionContext {
            intent: &intent,
            rng: &mut rng,
            content: None,
        };
        let mut txn = state.begin().unwrap();

        let result = SearchFunction
            .execute(&mut context, &state, &mut txn)
            .unwrap();
        assert!(!result.success);
        assert!(txn.is_empty());
        assert_eq!(result.dice_results.len(), 1);
    }

    #[test]
    fn test_generator_fallback_description() {
        let mut state = sample_state();
        let intent = search_intent();
        let mut rng = FixedSource::new([9]);
        let mut context = FunctionContext {
            intent: &intent,
            rng: &mut rng,
            content: None,
        };
        let mut txn = state.begin().unwrap();

        let result = SearchFunction
            .execute(&mut context, &state, &mut txn)
            .unwrap();
        assert!(result.success);
    }
}
