//! Builtin rule functions - the default mechanics of a session.
//!
//! Each mechanic is an independent [`GameFunction`](super::GameFunction)
//! implementor; the engine knows none of them by name. Sessions that want
//! different rules register their own implementors instead of (or on top
//! of) these.

mod attack;
mod dialogue;
mod interaction;
mod movement;
mod rest;
mod search;
mod skill;
mod status;
mod trade;

pub use attack::AttackFunction;
pub use dialogue::DialogueFunction;
pub use interaction::InteractionFunction;
pub use movement::MovementFunction;
pub use rest::RestFunction;
pub use search::SearchFunction;
pub use skill::SkillFunction;
pub use status::StatusFunction;
pub use trade::TradeFunction;

use std::sync::Arc;

use crate::registry::{FunctionMetadata, FunctionRegistry, RegistryError};

/// Register every builtin function with its default metadata.
pub fn register_builtins(registry: &FunctionRegistry) -> Result<(), RegistryError> {
    registry.register(
        Arc::new(AttackFunction),
        FunctionMetadata::new("attack")
            .with_keyword("attack")
            .with_keyword("hit")
            .with_keyword("strike")
            .with_keyword("fight"),
    )?;
    registry.register(
        Arc::new(SearchFunction),
        FunctionMetadata::new("search")
            .with_keyword("search")
            .with_keyword("look")
            .with_keyword("examine"),
    )?;
    registry.register(
        Arc::new(DialogueFunction),
        FunctionMetadata::new("dialogue")
            .with_keyword("talk")
            .with_keyword("speak")
            .with_keyword("ask"),
    )?;
    registry.register(
        Arc::new(TradeFunction),
        FunctionMetadata::new("trade")
            .with_keyword("buy")
            .with_keyword("sell")
            .with_keyword("trade"),
    )?;
    registry.register(
        Arc::new(StatusFunction),
        FunctionMetadata::new("status")
            .with_keyword("status")
            .with_keyword("inventory"),
    )?;
    registry.register(
        Arc::new(MovementFunction),
        FunctionMetadata::new("movement")
            .with_keyword("go")
            .with_keyword("move")
            .with_keyword("walk")
            .with_keyword("travel"),
    )?;
    registry.register(
        Arc::new(RestFunction),
        FunctionMetadata::new("rest")
            .with_keyword("rest")
            .with_keyword("sleep")
            .with_keyword("camp"),
    )?;
    registry.register(
        Arc::new(SkillFunction),
        FunctionMetadata::new("skill")
            .with_keyword("cast")
            .with_keyword("use")
            .with_keyword("skill"),
    )?;
    registry.register(
        Arc::new(InteractionFunction),
        FunctionMetadata::new("interaction")
            .with_keyword("open")
            .with_keyword("pull")
            .with_keyword("push")
            .with_keyword("activate"),
    )?;
    Ok(())
}
