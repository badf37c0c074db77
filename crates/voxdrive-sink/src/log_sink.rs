use crate::sink_trait::ActuatorSink;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use voxdrive_core::{DispatchedCommand, SinkError};

/// Reports each command in words through `tracing`, the way an operator
/// watching the console expects to read it ("turning right 90 degrees").
pub struct LogSink {
    send_count: AtomicUsize,
}

impl LogSink {
    pub fn new() -> Self {
        Self {
            send_count: AtomicUsize::new(0),
        }
    }

    pub fn send_count(&self) -> usize {
        self.send_count.load(Ordering::Relaxed)
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ActuatorSink for LogSink {
    fn name(&self) -> &str {
        "log"
    }

    async fn initialize(&mut self, _config: toml::Value) -> Result<(), SinkError> {
        Ok(())
    }

    async fn send_command(&self, command: &DispatchedCommand) -> Result<(), SinkError> {
        tracing::info!(utterance = command.utterance, "{}", command.command);
        self.send_count.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn is_healthy(&self) -> bool {
        true
    }

    async fn shutdown(&self) -> Result<(), SinkError> {
        Ok(())
    }
}
