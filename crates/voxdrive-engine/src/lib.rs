pub mod engine_trait;
pub mod registry;
pub mod scripted_engine;
pub mod session;
#[cfg(feature = "vosk")]
pub mod vosk_engine;

pub use engine_trait::{EngineOutput, SpeechEngine};
pub use registry::EngineRegistry;
pub use scripted_engine::ScriptedEngine;
pub use session::{parse_final, parse_partial, RecognizerSession};
#[cfg(feature = "vosk")]
pub use vosk_engine::VoskEngine;
