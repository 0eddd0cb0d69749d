use std::collections::BTreeMap;
use std::sync::Arc;

use crate::errors::TranslationError;
use crate::providers::Engine;

/// Engines by identifier
#[derive(Debug, Clone, Default)]
pub struct EngineRegistry {
    engines: BTreeMap<String, Arc<dyn Engine>>,
}

impl EngineRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `engine` under `name`, replacing any previous entry
    pub fn register(&mut self, name: &str, engine: Arc<dyn Engine>) {
        self.engines.insert(name.to_lowercase(), engine);
    }

    /// Look an engine up by name (case-insensitive)
    pub fn get(&self, name: &str) -> Result<Arc<dyn Engine>, TranslationError> {
        self.engines
            .get(&name.to_lowercase())
            .cloned()
            .ok_or_else(|| TranslationError::UnknownEngine(name.to_string()))
    }

    /// Registered names in sorted order
    pub fn names(&self) -> Vec<String> {
        self.engines.keys().cloned().collect()
    }
}
