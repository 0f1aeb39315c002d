//! # Rule Engine
//!
//! The "Arbiter" crate - a deterministic execution engine for AI-driven
//! tabletop sessions. A classifier (outside this crate) turns player prose
//! into an [`Intent`]; the [`ExecutionEngine`] routes it through the
//! [`FunctionRegistry`] to a [`GameFunction`](function::GameFunction),
//! runs it inside a state transaction and hands back an
//! [`ExecutionResult`] for narration.
//!
//! The engine itself never generates content and never rolls anything the
//! injected randomness source did not produce; replaying the same intents
//! with the same seed replays the same session.

pub mod engine;
pub mod events;
pub mod function;
pub mod intent;
pub mod registry;
pub mod result;

pub use engine::ExecutionEngine;
pub use events::ConceptObserver;
pub use function::{
    ContentGenerator, FunctionContext, FunctionError, GameFunction, GeneratedContent,
};
pub use intent::{Intent, IntentError, IntentType};
pub use registry::{FunctionMetadata, FunctionRegistry, RegistryError};
pub use result::ExecutionResult;
