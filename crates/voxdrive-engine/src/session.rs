use crate::engine_trait::SpeechEngine;
use serde::Deserialize;
use voxdrive_core::{AsrError, AudioBlock, RecognitionEvent};

#[derive(Deserialize)]
struct FinalDocument {
    text: String,
}

#[derive(Deserialize)]
struct PartialDocument {
    partial: String,
}

/// Extract the transcript from a final result document.
pub fn parse_final(raw: &str) -> Result<String, AsrError> {
    serde_json::from_str::<FinalDocument>(raw)
        .map(|doc| doc.text)
        .map_err(|e| AsrError::MalformedOutput(format!("{e} in {raw:?}")))
}

/// Extract the hypothesis from a partial result document.
pub fn parse_partial(raw: &str) -> Result<String, AsrError> {
    serde_json::from_str::<PartialDocument>(raw)
        .map(|doc| doc.partial)
        .map_err(|e| AsrError::MalformedOutput(format!("{e} in {raw:?}")))
}

/// Owns one engine instance and turns its output into [`RecognitionEvent`]s.
pub struct RecognizerSession {
    engine: Box<dyn SpeechEngine>,
    last_partial: String,
}

impl RecognizerSession {
    pub fn new(engine: Box<dyn SpeechEngine>) -> Self {
        Self {
            engine,
            last_partial: String::new(),
        }
    }

    pub fn engine_name(&self) -> &str {
        self.engine.name()
    }

    /// Feed one block and report where the engine stands.
    ///
    /// Engine failures and malformed documents never escape: a bad final
    /// becomes `Final("")`, while a bad partial and a failed feed both repeat
    /// the last partial.
    pub fn accept(&mut self, block: AudioBlock) -> RecognitionEvent {
        let output = match self.engine.accept(block.as_bytes()) {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!(engine = %self.engine.name(), "engine rejected block: {e}");
                return RecognitionEvent::Partial(self.last_partial.clone());
            }
        };

        if output.is_final {
            let text = parse_final(&output.raw).unwrap_or_else(|e| {
                tracing::warn!("{e}; treating utterance as empty");
                String::new()
            });
            RecognitionEvent::Final(text)
        } else {
            let text = parse_partial(&output.raw).unwrap_or_else(|e| {
                tracing::warn!("{e}; ignoring partial");
                self.last_partial.clone()
            });
            RecognitionEvent::Partial(text)
        }
    }

    /// Like [`accept`](Self::accept), but swallows partials identical to the
    /// previous one. A final always comes through and resets the comparison.
    pub fn next_event(&mut self, block: AudioBlock) -> Option<RecognitionEvent> {
        match self.accept(block) {
            RecognitionEvent::Partial(text) => {
                if text == self.last_partial {
                    return None;
                }
                self.last_partial.clone_from(&text);
                Some(RecognitionEvent::Partial(text))
            }
            event @ RecognitionEvent::Final(_) => {
                self.last_partial.clear();
                Some(event)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_trait::EngineOutput;
    use std::collections::VecDeque;

    /// Replays canned engine outputs, one per block.
    struct CannedEngine {
        outputs: VecDeque<Result<EngineOutput, AsrError>>,
    }

    impl CannedEngine {
        fn boxed(outputs: Vec<Result<EngineOutput, AsrError>>) -> Box<dyn SpeechEngine> {
            Box::new(Self {
                outputs: outputs.into(),
            })
        }
    }

    impl SpeechEngine for CannedEngine {
        fn name(&self) -> &str {
            "canned"
        }

        fn initialize(&mut self, _config: toml::Value, _sample_rate: u32) -> Result<(), AsrError> {
            Ok(())
        }

        fn accept(&mut self, _pcm: &[u8]) -> Result<EngineOutput, AsrError> {
            self.outputs.pop_front().unwrap_or_else(|| Ok(partial("")))
        }
    }

    fn partial(text: &str) -> EngineOutput {
        EngineOutput {
            is_final: false,
            raw: format!(r#"{{"partial" : "{text}"}}"#),
        }
    }

    fn final_(text: &str) -> EngineOutput {
        EngineOutput {
            is_final: true,
            raw: format!("{{\n  \"text\" : \"{text}\"\n}}"),
        }
    }

    fn block() -> AudioBlock {
        AudioBlock::from_samples(&[0; 16])
    }

    #[test]
    fn test_parse_final_vosk_document() {
        assert_eq!(parse_final("{\n  \"text\" : \"go forward\"\n}").unwrap(), "go forward");
    }

    #[test]
    fn test_parse_partial_vosk_document() {
        assert_eq!(parse_partial(r#"{"partial" : "go for"}"#).unwrap(), "go for");
    }

    #[test]
    fn test_parse_final_malformed() {
        assert!(matches!(parse_final("not json"), Err(AsrError::MalformedOutput(_))));
        assert!(matches!(
            parse_final(r#"{"partial": "x"}"#),
            Err(AsrError::MalformedOutput(_))
        ));
    }

    #[test]
    fn test_accept_maps_final_and_partial() {
        let mut session = RecognizerSession::new(CannedEngine::boxed(vec![
            Ok(partial("go")),
            Ok(final_("go forward")),
        ]));
        assert_eq!(session.accept(block()), RecognitionEvent::Partial("go".into()));
        assert_eq!(
            session.accept(block()),
            RecognitionEvent::Final("go forward".into())
        );
    }

    #[test]
    fn test_malformed_final_degrades_to_empty_transcript() {
        let mut session = RecognizerSession::new(CannedEngine::boxed(vec![Ok(EngineOutput {
            is_final: true,
            raw: "<garbage>".to_string(),
        })]));
        assert_eq!(session.accept(block()), RecognitionEvent::Final(String::new()));
    }

    #[test]
    fn test_engine_error_repeats_last_partial() {
        let mut session = RecognizerSession::new(CannedEngine::boxed(vec![
            Ok(partial("lift")),
            Err(AsrError::ProcessingFailed("decoder hiccup".into())),
        ]));
        assert_eq!(
            session.next_event(block()),
            Some(RecognitionEvent::Partial("lift".into()))
        );
        // Failed feed reports nothing new.
        assert_eq!(session.next_event(block()), None);
    }

    #[test]
    fn test_malformed_partial_keeps_duplicate_filter_intact() {
        let mut session = RecognizerSession::new(CannedEngine::boxed(vec![
            Ok(partial("open")),
            Ok(EngineOutput {
                is_final: false,
                raw: "{broken".to_string(),
            }),
            Ok(partial("open")),
            Ok(partial("open claw")),
        ]));
        assert_eq!(
            session.next_event(block()),
            Some(RecognitionEvent::Partial("open".into()))
        );
        assert_eq!(session.next_event(block()), None);
        assert_eq!(session.next_event(block()), None);
        assert_eq!(
            session.next_event(block()),
            Some(RecognitionEvent::Partial("open claw".into()))
        );
    }

    #[test]
    fn test_next_event_suppresses_duplicate_partials() {
        let mut session = RecognizerSession::new(CannedEngine::boxed(vec![
            Ok(partial("turn")),
            Ok(partial("turn")),
            Ok(partial("turn left")),
            Ok(partial("turn left")),
        ]));
        assert_eq!(
            session.next_event(block()),
            Some(RecognitionEvent::Partial("turn".into()))
        );
        assert_eq!(session.next_event(block()), None);
        assert_eq!(
            session.next_event(block()),
            Some(RecognitionEvent::Partial("turn left".into()))
        );
        assert_eq!(session.next_event(block()), None);
    }

    #[test]
    fn test_leading_empty_partial_is_suppressed() {
        let mut session = RecognizerSession::new(CannedEngine::boxed(vec![Ok(partial(""))]));
        assert_eq!(session.next_event(block()), None);
    }

    #[test]
    fn test_final_resets_partial_tracking() {
        let mut session = RecognizerSession::new(CannedEngine::boxed(vec![
            Ok(partial("stop")),
            Ok(final_("stop")),
            Ok(partial("stop")),
        ]));
        assert!(session.next_event(block()).is_some());
        assert_eq!(
            session.next_event(block()),
            Some(RecognitionEvent::Final("stop".into()))
        );
        // Same words, new utterance: reported again.
        assert_eq!(
            session.next_event(block()),
            Some(RecognitionEvent::Partial("stop".into()))
        );
    }

    #[test]
    fn test_repeated_finals_are_never_suppressed() {
        let mut session = RecognizerSession::new(CannedEngine::boxed(vec![
            Ok(final_("stop")),
            Ok(final_("stop")),
        ]));
        assert!(session.next_event(block()).unwrap().is_final());
        assert!(session.next_event(block()).unwrap().is_final());
    }

    #[test]
    fn test_engine_name_passthrough() {
        let session = RecognizerSession::new(CannedEngine::boxed(vec![]));
        assert_eq!(session.engine_name(), "canned");
    }
}
