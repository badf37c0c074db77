pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, RewriteConfig, SinkConfig};
pub use error::{AsrError, AudioError, ConfigError, SinkError};
pub use types::{
    block_byte_len, ActuatorCommand, AudioBlock, DeviceFault, DispatchedCommand, Magnitude,
    RecognitionEvent, Unit, SAMPLE_WIDTH,
};
