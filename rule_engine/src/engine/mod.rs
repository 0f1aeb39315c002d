//! The execution engine - one deterministic turn at a time.
//!
//! [`ExecutionEngine::process`] is the only entry point: it takes a
//! classified intent, picks the best-matching rule function, runs it inside
//! a transaction and returns the structured outcome. The engine is fully
//! deterministic given the same intent, state and randomness seed; all
//! creativity lives outside, in the classifier and the content generator.

use std::sync::Arc;

use tracing::{debug, warn};

use game_state::{GameState, RandomSource, SeededSource};

use crate::events::ConceptObserver;
use crate::function::{ContentGenerator, FunctionContext};
use crate::intent::Intent;
use crate::registry::FunctionRegistry;
use crate::result::ExecutionResult;

/// Drives rule functions against a game state.
///
/// The registry is shared; one engine per session owns the session's
/// randomness stream so replays with the same seed reproduce every roll.
pub struct ExecutionEngine {
    registry: Arc<FunctionRegistry>,
    rng: Box<dyn RandomSource + Send>,
    content: Option<Box<dyn ContentGenerator>>,
    observers: Vec<Box<dyn ConceptObserver>>,
}

impl ExecutionEngine {
    /// Create an engine over a shared registry, seeded for replay.
    pub fn new(registry: Arc<FunctionRegistry>, seed: u64) -> Self {
        Self {
            registry,
            rng: Box::new(SeededSource::new(seed)),
            content: None,
            observers: Vec::new(),
        }
    }

    /// Replace the randomness source, e.g. with a scripted one.
    pub fn with_rng(mut self, rng: Box<dyn RandomSource + Send>) -> Self {
        self.rng = rng;
        self
    }

    /// Attach an external content generator.
    pub fn with_content_generator(mut self, generator: Box<dyn ContentGenerator>) -> Self {
        self.content = Some(generator);
        self
    }

    /// Attach a concept observer.
    pub fn with_observer(mut self, observer: Box<dyn ConceptObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Process one intent against the state and return the outcome.
    ///
    /// Candidates are tried best-first. A candidate whose execution or
    /// commit faults is rolled back and the next one is tried; a candidate
    /// that returns a result, successful or not, ends the turn. The state
    /// is only ever mutated through a committed transaction.
    pub fn process(&mut self, intent: &Intent, state: &mut GameState) -> ExecutionResult {
        let attempted = Self::attempted(intent);

        if let Err(err) = intent.validate() {
            debug!(%err, "rejected intent");
            return ExecutionResult::failure(attempted, "invalid intent");
        }

        let candidates = self.registry.query(intent);
        debug!(
            category = %intent.category,
            candidates = candidates.len(),
            "dispatching intent"
        );

        for function in candidates {
            if !function.can_execute(intent, state) {
                continue;
            }

            let mut transaction = match state.begin() {
                Ok(txn) => txn,
                Err(err) => {
                    warn!(%err, "cannot open transaction");
                    return ExecutionResult::failure(attempted, err.to_string());
                }
            };

            let mut context = FunctionContext {
                intent,
                rng: self.rng.as_mut(),
                content: self.content.as_deref(),
            };
            let mut result = match function.execute(&mut context, state, &mut transaction) {
                Ok(result) => result,
                Err(err) => {
                    warn!(function = function.name(), %err, "function faulted");
                    state.rollback(transaction);
                    continue;
                }
            };

            match state.commit(transaction, result.summary()) {
                Ok(outcome) => {
                    for concept in &outcome.created {
                        for observer in &self.observers {
                            observer.on_concept_created(concept);
                        }
                    }
                    for concept in &outcome.updated {
                        for observer in &self.observers {
                            observer.on_concept_updated(concept);
                        }
                    }
                    for (concept_type, name) in &outcome.deleted {
                        for observer in &self.observers {
                            observer.on_concept_deleted(*concept_type, name);
                        }
                    }
                    result.state_changes = outcome.changes;
                    result.new_concepts = outcome.created;
                    return result;
                }
                Err(err) => {
                    warn!(function = function.name(), %err, "commit rejected");
                    continue;
                }
            }
        }

        ExecutionResult::failure(attempted, "no matching action")
    }

    fn attempted(intent: &Intent) -> String {
        if !intent.action.is_empty() {
            intent.action.clone()
        } else if !intent.target.is_empty() {
            format!("{} {}", intent.category, intent.target)
        } else {
            intent.category.clone()
        }
    }
}
