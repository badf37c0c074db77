use crate::engine_trait::{EngineOutput, SpeechEngine};
use std::collections::VecDeque;
use voxdrive_core::AsrError;

const DEFAULT_BLOCKS_PER_UTTERANCE: usize = 3;

/// Engine that ignores the audio and "recognizes" a fixed list of transcripts.
///
/// Each utterance takes `blocks_per_utterance` blocks: the leading blocks yield
/// partials revealing the words progressively, the last yields the final.
/// Once the script runs out every block yields an empty partial.
pub struct ScriptedEngine {
    script: VecDeque<String>,
    blocks_per_utterance: usize,
    block_in_utterance: usize,
    feed_count: usize,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self {
            script: VecDeque::new(),
            blocks_per_utterance: DEFAULT_BLOCKS_PER_UTTERANCE,
            block_in_utterance: 0,
            feed_count: 0,
        }
    }

    pub fn with_script<I, S>(script: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            script: script.into_iter().map(Into::into).collect(),
            ..Self::new()
        }
    }

    pub fn feed_count(&self) -> usize {
        self.feed_count
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }

    fn revealed_words(&self, text: &str) -> String {
        let words: Vec<&str> = text.split_whitespace().collect();
        let shown = (words.len() * self.block_in_utterance).div_ceil(self.blocks_per_utterance);
        words[..shown.min(words.len())].join(" ")
    }
}

impl Default for ScriptedEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeechEngine for ScriptedEngine {
    fn name(&self) -> &str {
        "scripted"
    }

    fn initialize(&mut self, config: toml::Value, _sample_rate: u32) -> Result<(), AsrError> {
        if let Some(script) = config.get("script") {
            let entries = script.as_array().ok_or_else(|| {
                AsrError::InitializationFailed("'script' must be an array of strings".to_string())
            })?;
            self.script = entries
                .iter()
                .map(|v| {
                    v.as_str().map(str::to_string).ok_or_else(|| {
                        AsrError::InitializationFailed(format!("non-string script entry: {v}"))
                    })
                })
                .collect::<Result<_, _>>()?;
        }

        if let Some(n) = config.get("blocks_per_utterance") {
            self.blocks_per_utterance = n
                .as_integer()
                .filter(|n| *n > 0)
                .map(|n| n as usize)
                .ok_or_else(|| {
                    AsrError::InitializationFailed(
                        "'blocks_per_utterance' must be a positive integer".to_string(),
                    )
                })?;
        }

        tracing::info!(
            utterances = self.script.len(),
            blocks_per_utterance = self.blocks_per_utterance,
            "ScriptedEngine initialized"
        );
        Ok(())
    }

    fn accept(&mut self, pcm: &[u8]) -> Result<EngineOutput, AsrError> {
        self.feed_count += 1;
        tracing::trace!("ScriptedEngine fed block #{}, {} bytes", self.feed_count, pcm.len());

        let Some(current) = self.script.front() else {
            return Ok(EngineOutput {
                is_final: false,
                raw: serde_json::json!({ "partial": "" }).to_string(),
            });
        };

        self.block_in_utterance += 1;
        if self.block_in_utterance < self.blocks_per_utterance {
            let partial = self.revealed_words(current);
            return Ok(EngineOutput {
                is_final: false,
                raw: serde_json::json!({ "partial": partial }).to_string(),
            });
        }

        self.block_in_utterance = 0;
        let text = self.script.pop_front().unwrap_or_default();
        Ok(EngineOutput {
            is_final: true,
            raw: serde_json::json!({ "text": text }).to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{parse_final, parse_partial};

    fn config(toml_str: &str) -> toml::Value {
        toml::from_str(toml_str).unwrap()
    }

    #[test]
    fn test_scripted_engine_name() {
        assert_eq!(ScriptedEngine::new().name(), "scripted");
    }

    #[test]
    fn test_scripted_engine_initialize_reads_script() {
        let mut engine = ScriptedEngine::new();
        engine
            .initialize(config(r#"script = ["stop", "close claw"]"#), 16000)
            .unwrap();
        assert_eq!(engine.remaining(), 2);
    }

    #[test]
    fn test_scripted_engine_rejects_non_string_entries() {
        let mut engine = ScriptedEngine::new();
        let result = engine.initialize(config("script = [1, 2]"), 16000);
        assert!(matches!(result, Err(AsrError::InitializationFailed(_))));
    }

    #[test]
    fn test_scripted_engine_rejects_zero_blocks_per_utterance() {
        let mut engine = ScriptedEngine::new();
        let result = engine.initialize(config("blocks_per_utterance = 0"), 16000);
        match result {
            Err(AsrError::InitializationFailed(msg)) => assert!(msg.contains("blocks_per_utterance")),
            _ => panic!("expected InitializationFailed"),
        }
    }

    #[test]
    fn test_scripted_engine_reveals_words_then_finalizes() {
        let mut engine = ScriptedEngine::with_script(["go forward three feet"]);
        engine
            .initialize(config("blocks_per_utterance = 4"), 16000)
            .unwrap();

        let outputs: Vec<EngineOutput> = (0..4).map(|_| engine.accept(&[0; 8]).unwrap()).collect();
        assert_eq!(parse_partial(&outputs[0].raw).unwrap(), "go");
        assert_eq!(parse_partial(&outputs[1].raw).unwrap(), "go forward");
        assert_eq!(parse_partial(&outputs[2].raw).unwrap(), "go forward three");
        assert!(outputs[3].is_final);
        assert_eq!(parse_final(&outputs[3].raw).unwrap(), "go forward three feet");
        assert_eq!(engine.remaining(), 0);
    }

    #[test]
    fn test_scripted_engine_empty_partials_after_script() {
        let mut engine = ScriptedEngine::new();
        let out = engine.accept(&[]).unwrap();
        assert!(!out.is_final);
        assert_eq!(parse_partial(&out.raw).unwrap(), "");
        assert_eq!(engine.feed_count(), 1);
    }

    #[test]
    fn test_scripted_engine_single_block_utterances() {
        let mut engine = ScriptedEngine::with_script(["stop", "open claw"]);
        engine
            .initialize(config("blocks_per_utterance = 1"), 16000)
            .unwrap();
        let first = engine.accept(&[]).unwrap();
        let second = engine.accept(&[]).unwrap();
        assert_eq!(parse_final(&first.raw).unwrap(), "stop");
        assert_eq!(parse_final(&second.raw).unwrap(), "open claw");
    }

    #[test]
    fn test_scripted_engine_implements_send() {
        fn assert_send<T: Send>() {}
        assert_send::<ScriptedEngine>();
    }
}
