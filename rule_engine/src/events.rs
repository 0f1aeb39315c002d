//! Concept lifecycle notifications.

use game_state::{Concept, ConceptType};

/// Observer of concept lifecycle events emitted at commit time.
///
/// Implementors hook external systems (indexing, content pipelines) into
/// the session without the engine knowing about them. All methods default
/// to no-ops so an observer only implements what it cares about.
pub trait ConceptObserver: Send + Sync {
    fn on_concept_created(&self, _concept: &Concept) {}

    fn on_concept_updated(&self, _concept: &Concept) {}

    fn on_concept_deleted(&self, _concept_type: ConceptType, _name: &str) {}
}
