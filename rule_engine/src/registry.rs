//! Function registry - lookup of rule handlers by category and keyword.

use std::cmp::Reverse;
use std::collections::BTreeSet;
use std::sync::{Arc, PoisonError, RwLock};

use thiserror::Error;
use tracing::debug;

use crate::function::GameFunction;
use crate::intent::Intent;

/// Errors from registry bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("a function named '{0}' is already registered")]
    DuplicateRegistration(String),
}

/// Routing metadata attached to a function at registration time.
///
/// The category is the primary route; keywords catch intents whose
/// category the classifier got wrong but whose wording is unambiguous.
#[derive(Debug, Clone, Default)]
pub struct FunctionMetadata {
    pub category: String,
    pub keywords: BTreeSet<String>,
    /// Overrides the function's own priority when set.
    pub priority: Option<u8>,
}

impl FunctionMetadata {
    /// Metadata routing one intent category.
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            ..Self::default()
        }
    }

    /// Add a routing keyword.
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keywords.insert(keyword.into().to_lowercase());
        self
    }

    /// Override the function's priority.
    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = Some(priority);
        self
    }
}

struct Entry {
    function: Arc<dyn GameFunction>,
    category: String,
    keywords: BTreeSet<String>,
    priority: u8,
    /// Registration order, the tie-breaker between equal priorities.
    sequence: u64,
}

impl Entry {
    fn matches(&self, intent: &Intent) -> bool {
        if self.category == intent.category {
            return true;
        }
        intent
            .tokens()
            .iter()
            .any(|token| self.keywords.contains(token))
    }
}

#[derive(Default)]
struct Inner {
    entries: Vec<Entry>,
    next_sequence: u64,
}

/// Thread-safe registry of every function a session can dispatch to.
///
/// Shared across sessions behind an [`Arc`]; queries take a read lock
/// and clone out the matching handles.
#[derive(Default)]
pub struct FunctionRegistry {
    inner: RwLock<Inner>,
}

impl FunctionRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a function under its metadata.
    ///
    /// Function names are the registry identity; registering a second
    /// function with an existing name is an error.
    pub fn register(
        &self,
        function: Arc<dyn GameFunction>,
        metadata: FunctionMetadata,
    ) -> Result<(), RegistryError> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        if inner.entries.iter().any(|e| e.function.name() == function.name()) {
            return Err(RegistryError::DuplicateRegistration(
                function.name().to_string(),
            ));
        }
        let priority = metadata.priority.unwrap_or_else(|| function.priority());
        let sequence = inner.next_sequence;
        inner.next_sequence += 1;
        debug!(
            name = function.name(),
            category = %metadata.category,
            priority,
            "registered function"
        );
        inner.entries.push(Entry {
            function,
            category: metadata.category,
            keywords: metadata.keywords,
            priority,
            sequence,
        });
        Ok(())
    }

    /// Remove a function by name; returns whether it was present.
    pub fn unregister(&self, name: &str) -> bool {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let before = inner.entries.len();
        inner.entries.retain(|e| e.function.name() != name);
        inner.entries.len() != before
    }

    /// Functions matching the intent, best candidate first.
    ///
    /// A function matches on category equality or on any intent token
    /// appearing among its keywords. Candidates are ordered by priority
    /// descending, then by registration order.
    pub fn query(&self, intent: &Intent) -> Vec<Arc<dyn GameFunction>> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        let mut matched: Vec<&Entry> =
            inner.entries.iter().filter(|e| e.matches(intent)).collect();
        matched.sort_by_key(|e| (Reverse(e.priority), e.sequence));
        matched.into_iter().map(|e| Arc::clone(&e.function)).collect()
    }

    /// All registered categories, deduplicated.
    pub fn categories(&self) -> BTreeSet<String> {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        inner.entries.iter().map(|e| e.category.clone()).collect()
    }

    /// Number of registered functions.
    pub fn len(&self) -> usize {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::builtin::register_builtins;
    use crate::intent::IntentType;

    #[test]
    fn test_register_rejects_duplicate_name() {
        let registry = FunctionRegistry::new();
        register_builtins(&registry).unwrap();
        let result = registry.register(
            Arc::new(crate::function::builtin::AttackFunction),
            FunctionMetadata::new("attack"),
        );
        assert_eq!(
            result,
            Err(RegistryError::DuplicateRegistration("attack".to_string()))
        );
    }

    #[test]
    fn test_query_matches_category() {
        let registry = FunctionRegistry::new();
        register_builtins(&registry).unwrap();
        let intent = Intent::new(IntentType::Execute, "attack").with_target("goblin");
        let candidates = registry.query(&intent);
        assert_eq!(candidates[0].name(), "attack");
    }

    #[test]
    fn test_query_matches_keyword_when_category_unknown() {
        let registry = FunctionRegistry::new();
        register_builtins(&registry).unwrap();
        let intent = Intent::new(IntentType::Execute, "combat")
            .with_action("strike the goblin");
        let candidates = registry.query(&intent);
        assert!(candidates.iter().any(|f| f.name() == "attack"));
    }

    #[test]
    fn test_query_orders_by_priority_then_sequence() {
        let registry = FunctionRegistry::new();
        registry
            .register(
                Arc::new(crate::function::builtin::StatusFunction),
                FunctionMetadata::new("report").with_priority(1),
            )
            .unwrap();
        registry
            .register(
                Arc::new(crate::function::builtin::AttackFunction),
                FunctionMetadata::new("report"),
            )
            .unwrap();
        let intent = Intent::new(IntentType::Execute, "report");
        let names: Vec<_> = registry.query(&intent).iter().map(|f| f.name().to_string()).collect();
        // AttackFunction keeps its own priority 10 and outranks the override.
        assert_eq!(names, vec!["attack", "status"]);
    }

    #[test]
    fn test_equal_priority_falls_back_to_registration_order() {
        let registry = FunctionRegistry::new();
        // Both keep the default priority 5; registration order decides.
        registry
            .register(
                Arc::new(crate::function::builtin::StatusFunction),
                FunctionMetadata::new("report"),
            )
            .unwrap();
        registry
            .register(
                Arc::new(crate::function::builtin::DialogueFunction),
                FunctionMetadata::new("report"),
            )
            .unwrap();
        let intent = Intent::new(IntentType::Execute, "report");
        let names: Vec<_> = registry
            .query(&intent)
            .iter()
            .map(|f| f.name().to_string())
            .collect();
        assert_eq!(names, vec!["status", "dialogue"]);
    }

    #[test]
    fn test_unregister() {
        let registry = FunctionRegistry::new();
        register_builtins(&registry).unwrap();
        let before = registry.len();
        assert!(registry.unregister("rest"));
        assert!(!registry.unregister("rest"));
        assert_eq!(registry.len(), before - 1);
    }
}
