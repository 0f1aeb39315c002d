//! Intents - the structured requests produced by the external classifier.
//!
//! The engine consumes intents read-only. Whatever model produced them, the
//! only contract is this schema; validation happens once at the engine
//! boundary.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Broad kind of player request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentType {
    /// Perform an action with mechanical consequences.
    Execute,
    /// Ask about the current state.
    Query,
    /// Probe the scene or converse.
    Explore,
    /// Hypothetical or imaginative reasoning.
    Imagine,
}

/// Validation failure for a malformed intent.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IntentError {
    #[error("intent category must not be empty")]
    EmptyCategory,
    #[error("intent confidence {0} outside [0, 1]")]
    ConfidenceOutOfRange(f32),
}

/// One classified player request, immutable for the duration of a turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    pub intent_type: IntentType,
    /// Free-form tag, e.g. "attack" or "search".
    pub category: String,
    /// The player's action, as described by the classifier.
    pub action: String,
    /// Target name, or empty when the action has none.
    pub target: String,
    /// Extension parameters passed through to rule functions.
    #[serde(default)]
    pub parameters: Map<String, Value>,
    /// Classifier confidence in [0, 1].
    pub confidence: f32,
}

impl Intent {
    /// Create an intent with the given type and category.
    pub fn new(intent_type: IntentType, category: impl Into<String>) -> Self {
        Self {
            intent_type,
            category: category.into(),
            action: String::new(),
            target: String::new(),
            parameters: Map::new(),
            confidence: 1.0,
        }
    }

    /// Set the action description.
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = action.into();
        self
    }

    /// Set the target name.
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    /// Attach an extension parameter.
    pub fn with_parameter(mut self, key: impl Into<String>, value: Value) -> Self {
        self.parameters.insert(key.into(), value);
        self
    }

    /// Set the classifier confidence.
    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = confidence;
        self
    }

    /// Check the intent schema: non-empty category, confidence in [0, 1].
    pub fn validate(&self) -> Result<(), IntentError> {
        if self.category.trim().is_empty() {
            return Err(IntentError::EmptyCategory);
        }
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(IntentError::ConfidenceOutOfRange(self.confidence));
        }
        Ok(())
    }

    /// Lowercase word tokens of the action and target, for keyword matching.
    pub fn tokens(&self) -> Vec<String> {
        self.action
            .split_whitespace()
            .chain(self.target.split_whitespace())
            .map(|word| {
                word.trim_matches(|c: char| !c.is_alphanumeric())
                    .to_lowercase()
            })
            .filter(|word| !word.is_empty())
            .collect()
    }

    /// String parameter accessor.
    pub fn parameter_str(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validate_catches_bad_intents() {
        let intent = Intent::new(IntentType::Execute, "attack");
        assert!(intent.validate().is_ok());

        let empty = Intent::new(IntentType::Execute, "  ");
        assert_eq!(empty.validate(), Err(IntentError::EmptyCategory));

        let overconfident = Intent::new(IntentType::Execute, "attack").with_confidence(1.5);
        assert!(matches!(
            overconfident.validate(),
            Err(IntentError::ConfidenceOutOfRange(_))
        ));

        let nan = Intent::new(IntentType::Execute, "attack").with_confidence(f32::NAN);
        assert!(nan.validate().is_err());
    }

    #[test]
    fn test_tokens_lowercase_and_strip_punctuation() {
        let intent = Intent::new(IntentType::Execute, "attack")
            .with_action("Swing my sword!")
            .with_target("Goblin Scout");
        assert_eq!(intent.tokens(), vec!["swing", "my", "sword", "goblin", "scout"]);
    }

    #[test]
    fn test_parameter_str() {
        let intent =
            Intent::new(IntentType::Execute, "trade").with_parameter("item", json!("rope"));
        assert_eq!(intent.parameter_str("item"), Some("rope"));
        assert_eq!(intent.parameter_str("cost"), None);
    }
}
