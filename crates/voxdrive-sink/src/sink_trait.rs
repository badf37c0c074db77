use async_trait::async_trait;
use voxdrive_core::{DispatchedCommand, SinkError};

/// Where dispatched commands end up: the actuator interface.
///
/// Implementations are registered via [`SinkRegistry`](crate::SinkRegistry)
/// and receive one call to [`send_command`](Self::send_command) per final
/// utterance that produced a command. Delivery is fire-and-forget; the
/// processing loop never waits on a sink.
#[async_trait]
pub trait ActuatorSink: Send + Sync {
    /// Returns the sink's plugin name (e.g. `"log"`, `"file"`).
    fn name(&self) -> &str;
    /// One-time initialisation with sink-specific TOML configuration.
    async fn initialize(&mut self, config: toml::Value) -> Result<(), SinkError>;
    async fn send_command(&self, command: &DispatchedCommand) -> Result<(), SinkError>;
    /// Returns `true` if the sink is currently able to accept commands.
    fn is_healthy(&self) -> bool;
    async fn shutdown(&self) -> Result<(), SinkError>;
}
