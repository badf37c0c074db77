use voxdrive_core::AsrError;

/// What a streaming recognizer hands back for one chunk of audio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineOutput {
    /// The engine decided the current utterance is complete.
    pub is_final: bool,
    /// Result document as produced by the engine, e.g. `{"text": "stop"}` for a
    /// final or `{"partial": "sto"}` for a partial.
    pub raw: String,
}

/// A streaming speech-to-text engine. Utterance boundary detection is the
/// engine's business; callers only feed PCM in order and read what comes back.
pub trait SpeechEngine: Send {
    fn name(&self) -> &str;
    fn initialize(&mut self, config: toml::Value, sample_rate: u32) -> Result<(), AsrError>;
    /// Feed little-endian i16 mono PCM.
    fn accept(&mut self, pcm: &[u8]) -> Result<EngineOutput, AsrError>;
}
