//! Trading with merchants and friendly NPCs.

use serde_json::json;

use game_state::{ChangeTarget, GameState, StateChange, StateTransaction};

use crate::function::{FunctionContext, FunctionError, GameFunction};
use crate::intent::Intent;
use crate::result::ExecutionResult;

const CATEGORY: &str = "trade";
const CURRENCY: &str = "gold";

/// Buy an item from a willing NPC.
///
/// The intent's `item` parameter names the goods and `cost` the price in
/// gold. Without an `item` parameter the exchange is just opened, which is
/// enough for the narrator to play out browsing.
pub struct TradeFunction;

impl GameFunction for TradeFunction {
    fn name(&self) -> &str {
        "trade"
    }

    fn description(&self) -> &str {
        "Trade with a merchant or friendly character"
    }

    fn can_execute(&self, intent: &Intent, state: &GameState) -> bool {
        intent.category == CATEGORY
            && !intent.target.is_empty()
            && state
                .world
                .find_npc(&intent.target)
                .map(|npc| npc.is_alive() && npc.can_trade())
                .unwrap_or(false)
    }

    fn execute(
        &self,
        context: &mut FunctionContext<'_>,
        state: &GameState,
        transaction: &mut StateTransaction,
    ) -> Result<ExecutionResult, FunctionError> {
        let target = &context.intent.target;
        let npc = match state.world.find_npc(target) {
            Some(npc) if npc.is_alive() && npc.can_trade() => npc,
            _ => {
                return Ok(ExecutionResult::failure(
                    format!("trade with {}", target),
                    format!("no willing trader named '{}'", target),
                ))
            }
        };

        let item = match context.intent.parameter_str("item") {
            Some(item) => item.to_string(),
            None => {
                return Ok(
                    ExecutionResult::success(format!("trade with {}", npc.name))
                        .with_world_change(format!("{} lays out their wares", npc.name)),
                )
            }
        };
        let cost = match context.intent.parameters.get("cost") {
            None => 0,
            Some(value) => match value.as_u64().and_then(|c| u32::try_from(c).ok()) {
                Some(cost) => cost,
                None => {
                    return Ok(ExecutionResult::failure(
                        format!("buy {} from {}", item, npc.name),
                        format!("{} is not a payable price", value),
                    ))
                }
            },
        };

        if cost > 0 && state.player.item_count(CURRENCY) < cost {
            return Ok(ExecutionResult::failure(
                format!("buy {} from {}", item, npc.name),
                format!("not enough {} for {}", CURRENCY, item),
            ));
        }

        if cost > 0 {
            transaction.add_change(StateChange::remove(
                ChangeTarget::Player,
                "inventory",
                json!({ "name": CURRENCY, "quantity": cost }),
            ));
        }
        transaction.add_change(StateChange::add(
            ChangeTarget::Player,
            "inventory",
            json!({ "name": item }),
        ));
        if npc.inventory.contains_key(&item) {
            transaction.add_change(StateChange::remove(
                ChangeTarget::npc(&npc.name),
                "inventory",
                json!({ "name": item }),
            ));
        }

        Ok(ExecutionResult::success(format!(
            "buy {} from {} for {} {}",
            item, npc.name, cost, CURRENCY
        )))
    }
}
