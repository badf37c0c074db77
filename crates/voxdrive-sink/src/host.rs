use crate::registry::SinkRegistry;
use crate::sink_trait::ActuatorSink;
use tokio::sync::mpsc;
use voxdrive_core::{DispatchedCommand, SinkError};

/// Owns the configured sinks and fans every dispatched command out to each
/// of them from a single tokio task.
pub struct SinkHost {
    registry: SinkRegistry,
    sinks: Vec<Box<dyn ActuatorSink>>,
    command_rx: Option<mpsc::UnboundedReceiver<DispatchedCommand>>,
    task_handle: Option<tokio::task::JoinHandle<usize>>,
}

impl SinkHost {
    pub fn new(command_rx: mpsc::UnboundedReceiver<DispatchedCommand>) -> Self {
        Self::with_registry(command_rx, SinkRegistry::new())
    }

    pub fn with_registry(
        command_rx: mpsc::UnboundedReceiver<DispatchedCommand>,
        registry: SinkRegistry,
    ) -> Self {
        Self {
            registry,
            sinks: Vec::new(),
            command_rx: Some(command_rx),
            task_handle: None,
        }
    }

    pub async fn add_sink(&mut self, kind: &str, config: toml::Value) -> Result<(), SinkError> {
        let mut sink = self.registry.create(kind)?;
        sink.initialize(config).await?;
        tracing::debug!(sink = kind, "sink ready");
        self.sinks.push(sink);
        Ok(())
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    /// Spawns the fan-out task. The task runs until every sender of the
    /// command channel is dropped, then shuts the sinks down.
    pub fn start(&mut self) {
        let Some(mut rx) = self.command_rx.take() else {
            tracing::warn!("sink host already started");
            return;
        };
        let sinks = std::mem::take(&mut self.sinks);

        let handle = tokio::spawn(async move {
            let mut delivered = 0;
            while let Some(command) = rx.recv().await {
                for sink in &sinks {
                    if !sink.is_healthy() {
                        tracing::warn!(sink = %sink.name(), "skipping unhealthy sink");
                        continue;
                    }
                    if let Err(e) = sink.send_command(&command).await {
                        tracing::error!(
                            utterance = command.utterance,
                            sink = %sink.name(),
                            "send_command failed: {e}"
                        );
                    }
                }
                delivered += 1;
            }

            for sink in &sinks {
                if let Err(e) = sink.shutdown().await {
                    tracing::error!(sink = %sink.name(), "shutdown failed: {e}");
                }
            }
            delivered
        });

        self.task_handle = Some(handle);
    }

    /// Waits for the fan-out task to drain and returns how many commands it
    /// delivered.
    pub async fn shutdown(&mut self) -> usize {
        match self.task_handle.take() {
            Some(handle) => match handle.await {
                Ok(delivered) => delivered,
                Err(e) => {
                    tracing::error!("sink host task failed: {e}");
                    0
                }
            },
            None => 0,
        }
    }
}
