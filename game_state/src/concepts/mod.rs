//! Concepts - runtime-discovered game entities tracked by name.
//!
//! Items, skills, status effects, locations and house rules can be invented
//! mid-session by rule functions or by an external content generator. The
//! registry is scoped to one [`GameState`](crate::state::GameState); it is
//! never shared across sessions.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::error::StateError;

/// Kinds of runtime-created concepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConceptType {
    Item,
    Skill,
    Status,
    Location,
    Rule,
}

impl std::fmt::Display for ConceptType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ConceptType::Item => "item",
            ConceptType::Skill => "skill",
            ConceptType::Status => "status",
            ConceptType::Location => "location",
            ConceptType::Rule => "rule",
        };
        write!(f, "{}", name)
    }
}

/// A runtime-created game entity.
///
/// Names are unique per [`ConceptType`]. Other state refers to concepts by
/// name and resolves them at read time, never by owning pointer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Concept {
    pub concept_type: ConceptType,
    pub name: String,
    pub description: String,
    /// Open-ended properties supplied by rules or content generation.
    #[serde(default)]
    pub properties: Map<String, Value>,
    /// Turn on which the concept entered the registry.
    #[serde(default)]
    pub created_turn: u64,
}

impl Concept {
    /// Create a new concept.
    pub fn new(
        concept_type: ConceptType,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            concept_type,
            name: name.into(),
            description: description.into(),
            properties: Map::new(),
            created_turn: 0,
        }
    }

    /// Attach a property.
    pub fn with_property(mut self, key: impl Into<String>, value: Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }
}

/// Per-session registry of concepts, keyed by type and name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ConceptRegistry {
    concepts: BTreeMap<ConceptType, BTreeMap<String, Concept>>,
}

impl ConceptRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a concept. Fails if the type/name pair is taken.
    pub fn create(&mut self, concept: Concept) -> Result<(), StateError> {
        let by_name = self.concepts.entry(concept.concept_type).or_default();
        if by_name.contains_key(&concept.name) {
            return Err(StateError::DuplicateConcept {
                concept_type: concept.concept_type,
                name: concept.name,
            });
        }
        by_name.insert(concept.name.clone(), concept);
        Ok(())
    }

    /// Register a concept, or return the existing one for this type/name.
    ///
    /// Two distinct concepts can never share a type/name pair.
    pub fn get_or_create(&mut self, concept: Concept) -> &Concept {
        self.concepts
            .entry(concept.concept_type)
            .or_default()
            .entry(concept.name.clone())
            .or_insert(concept)
    }

    /// Look up a concept.
    pub fn get(&self, concept_type: ConceptType, name: &str) -> Option<&Concept> {
        self.concepts.get(&concept_type)?.get(name)
    }

    /// Merge new properties into an existing concept.
    pub fn update(
        &mut self,
        concept_type: ConceptType,
        name: &str,
        properties: Map<String, Value>,
    ) -> Result<&Concept, StateError> {
        let concept = self
            .concepts
            .get_mut(&concept_type)
            .and_then(|by_name| by_name.get_mut(name))
            .ok_or(StateError::ConceptNotFound {
                concept_type,
                name: name.to_string(),
            })?;
        concept.properties.extend(properties);
        Ok(concept)
    }

    /// Remove a concept. Idempotent; returns whether anything was removed.
    pub fn delete(&mut self, concept_type: ConceptType, name: &str) -> bool {
        self.concepts
            .get_mut(&concept_type)
            .map(|by_name| by_name.remove(name).is_some())
            .unwrap_or(false)
    }

    /// Whether a concept is registered.
    pub fn contains(&self, concept_type: ConceptType, name: &str) -> bool {
        self.get(concept_type, name).is_some()
    }

    /// Iterate all concepts in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &Concept> {
        self.concepts.values().flat_map(|by_name| by_name.values())
    }

    /// Total number of registered concepts.
    pub fn len(&self) -> usize {
        self.concepts.values().map(|by_name| by_name.len()).sum()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
