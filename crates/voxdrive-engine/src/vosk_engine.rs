use crate::engine_trait::{EngineOutput, SpeechEngine};
use std::path::Path;
use voxdrive_core::AsrError;
use vosk::{DecodingState, Model, Recognizer};

pub const DEFAULT_MODEL_PATH: &str = "vosk-model-small-en-us-0.15";

pub struct VoskEngine {
    recognizer: Option<Recognizer>,
    // Kept loaded for as long as the recognizer runs.
    _model: Option<Model>,
    samples: Vec<i16>,
}

impl VoskEngine {
    pub fn new() -> Self {
        Self {
            recognizer: None,
            _model: None,
            samples: Vec::new(),
        }
    }
}

impl Default for VoskEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeechEngine for VoskEngine {
    fn name(&self) -> &str {
        "vosk"
    }

    fn initialize(&mut self, config: toml::Value, sample_rate: u32) -> Result<(), AsrError> {
        let model_path = config
            .get("model_path")
            .and_then(|v| v.as_str())
            .unwrap_or(DEFAULT_MODEL_PATH);

        if !Path::new(model_path).exists() {
            return Err(AsrError::InitializationFailed(format!(
                "model not found at '{model_path}'; download one from \
                 https://alphacephei.com/vosk/models and unpack it there"
            )));
        }

        let model = Model::new(model_path).ok_or_else(|| {
            AsrError::InitializationFailed(format!("failed to load model from '{model_path}'"))
        })?;
        let recognizer = Recognizer::new(&model, sample_rate as f32).ok_or_else(|| {
            AsrError::InitializationFailed(format!(
                "failed to create recognizer at {sample_rate} Hz"
            ))
        })?;

        tracing::info!(model_path = %model_path, sample_rate, "VoskEngine initialized");
        self.recognizer = Some(recognizer);
        self._model = Some(model);
        Ok(())
    }

    fn accept(&mut self, pcm: &[u8]) -> Result<EngineOutput, AsrError> {
        let recognizer = self
            .recognizer
            .as_mut()
            .ok_or_else(|| AsrError::ProcessingFailed("engine not initialized".to_string()))?;

        self.samples.clear();
        self.samples.extend(
            pcm.chunks_exact(2)
                .map(|pair| i16::from_le_bytes([pair[0], pair[1]])),
        );

        let state = recognizer
            .accept_waveform(&self.samples)
            .map_err(|e| AsrError::ProcessingFailed(format!("{e:?}")))?;

        match state {
            DecodingState::Finalized => {
                let text = recognizer
                    .result()
                    .single()
                    .map(|r| r.text.to_string())
                    .unwrap_or_default();
                Ok(EngineOutput {
                    is_final: true,
                    raw: serde_json::json!({ "text": text }).to_string(),
                })
            }
            DecodingState::Running => {
                let partial = recognizer.partial_result().partial.to_string();
                Ok(EngineOutput {
                    is_final: false,
                    raw: serde_json::json!({ "partial": partial }).to_string(),
                })
            }
            DecodingState::Failed => Err(AsrError::ProcessingFailed(
                "decoder failed on block".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vosk_engine_name() {
        assert_eq!(VoskEngine::new().name(), "vosk");
    }

    #[test]
    fn test_vosk_engine_missing_model_fails() {
        let mut engine = VoskEngine::new();
        let mut table = toml::map::Map::new();
        table.insert(
            "model_path".to_string(),
            toml::Value::String("/nonexistent/vosk-model".to_string()),
        );
        match engine.initialize(toml::Value::Table(table), 16000) {
            Err(AsrError::InitializationFailed(msg)) => assert!(msg.contains("model not found")),
            _ => panic!("expected InitializationFailed"),
        }
    }

    #[test]
    fn test_vosk_engine_accept_before_initialize_fails() {
        let mut engine = VoskEngine::new();
        assert!(matches!(
            engine.accept(&[0; 4]),
            Err(AsrError::ProcessingFailed(_))
        ));
    }
}
