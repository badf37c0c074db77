use crate::engine_trait::SpeechEngine;
use std::collections::HashMap;
use voxdrive_core::AsrError;

pub struct EngineRegistry {
    factories: HashMap<String, fn() -> Box<dyn SpeechEngine>>,
}

impl EngineRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            factories: HashMap::new(),
        };
        registry.register("scripted", || {
            Box::new(crate::scripted_engine::ScriptedEngine::new())
        });
        #[cfg(feature = "vosk")]
        registry.register("vosk", || Box::new(crate::vosk_engine::VoskEngine::new()));
        registry
    }

    pub fn register(&mut self, name: &str, factory: fn() -> Box<dyn SpeechEngine>) {
        self.factories.insert(name.to_string(), factory);
    }

    pub fn create(&self, name: &str) -> Result<Box<dyn SpeechEngine>, AsrError> {
        self.factories
            .get(name)
            .map(|f| f())
            .ok_or_else(|| {
                AsrError::EngineNotFound(format!(
                    "{name} (available: {})",
                    self.list_engines().join(", ")
                ))
            })
    }

    /// Create `name` and initialize it in one step.
    pub fn create_initialized(
        &self,
        name: &str,
        config: toml::Value,
        sample_rate: u32,
    ) -> Result<Box<dyn SpeechEngine>, AsrError> {
        let mut engine = self.create(name)?;
        engine.initialize(config, sample_rate)?;
        Ok(engine)
    }

    pub fn list_engines(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

impl Default for EngineRegistry {
    fn default() -> Self {
        Self::new()
    }
}
