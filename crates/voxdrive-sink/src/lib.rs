pub mod archive;
pub mod file_sink;
pub mod host;
pub mod log_sink;
pub mod registry;
pub mod sink_trait;

pub use archive::AudioArchive;
pub use file_sink::FileSink;
pub use host::SinkHost;
pub use log_sink::LogSink;
pub use registry::SinkRegistry;
pub use sink_trait::ActuatorSink;
