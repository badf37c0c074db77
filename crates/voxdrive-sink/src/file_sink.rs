use crate::sink_trait::ActuatorSink;
use async_trait::async_trait;
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use voxdrive_core::{DispatchedCommand, SinkError};

/// Appends one line per command: `<prefix><rendered command>`.
pub struct FileSink {
    output_path: Option<PathBuf>,
    prefix: String,
    send_count: AtomicUsize,
}

impl FileSink {
    pub fn new() -> Self {
        Self {
            output_path: None,
            prefix: String::new(),
            send_count: AtomicUsize::new(0),
        }
    }

    pub fn send_count(&self) -> usize {
        self.send_count.load(Ordering::Relaxed)
    }
}

impl Default for FileSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ActuatorSink for FileSink {
    fn name(&self) -> &str {
        "file"
    }

    async fn initialize(&mut self, config: toml::Value) -> Result<(), SinkError> {
        let path = config
            .get("path")
            .and_then(|v| v.as_str())
            .ok_or_else(|| SinkError::InitializationFailed("missing 'path' in config".to_string()))?;
        self.prefix = config
            .get("prefix")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        self.output_path = Some(PathBuf::from(path));
        Ok(())
    }

    async fn send_command(&self, command: &DispatchedCommand) -> Result<(), SinkError> {
        let path = self
            .output_path
            .as_ref()
            .ok_or_else(|| SinkError::SendFailed("not initialized".to_string()))?;

        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| SinkError::SendFailed(e.to_string()))?;

        writeln!(file, "{}{}", self.prefix, command.command)
            .map_err(|e| SinkError::SendFailed(e.to_string()))?;

        self.send_count.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn is_healthy(&self) -> bool {
        self.output_path.is_some()
    }

    async fn shutdown(&self) -> Result<(), SinkError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxdrive_core::ActuatorCommand;

    fn file_config(path: &str, prefix: Option<&str>) -> toml::Value {
        let mut t = toml::map::Map::new();
        t.insert("path".to_string(), toml::Value::String(path.to_string()));
        if let Some(prefix) = prefix {
            t.insert("prefix".to_string(), toml::Value::String(prefix.to_string()));
        }
        toml::Value::Table(t)
    }

    fn dispatched(utterance: u64, command: ActuatorCommand) -> DispatchedCommand {
        DispatchedCommand {
            utterance,
            transcript: String::new(),
            command,
        }
    }

    #[test]
    fn test_file_sink_name() {
        assert_eq!(FileSink::new().name(), "file");
    }

    #[tokio::test]
    async fn test_file_sink_initialize_missing_path_fails() {
        let mut sink = FileSink::new();
        let result = sink.initialize(toml::Value::Table(Default::default())).await;
        match result {
            Err(SinkError::InitializationFailed(msg)) => assert!(msg.contains("path")),
            _ => panic!("expected InitializationFailed"),
        }
        assert!(!sink.is_healthy());
    }

    #[tokio::test]
    async fn test_file_sink_appends_rendered_commands() {
        let dir = std::env::temp_dir().join("voxdrive_file_sink_append");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("commands.log");
        let _ = std::fs::remove_file(&path);

        let mut sink = FileSink::new();
        sink.initialize(file_config(&path.to_string_lossy(), None))
            .await
            .unwrap();
        assert!(sink.is_healthy());

        sink.send_command(&dispatched(1, ActuatorCommand::MoveForward(36)))
            .await
            .unwrap();
        sink.send_command(&dispatched(2, ActuatorCommand::Stop))
            .await
            .unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "moving forward 36 inches\nstopping\n");
        assert_eq!(sink.send_count(), 2);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_file_sink_prefix() {
        let dir = std::env::temp_dir().join("voxdrive_file_sink_prefix");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("commands.log");
        let _ = std::fs::remove_file(&path);

        let mut sink = FileSink::new();
        sink.initialize(file_config(&path.to_string_lossy(), Some("[rover] ")))
            .await
            .unwrap();
        sink.send_command(&dispatched(1, ActuatorCommand::Lift(12)))
            .await
            .unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "[rover] lifting 12 degrees\n");

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_file_sink_send_before_initialize_fails() {
        let sink = FileSink::new();
        let result = sink.send_command(&dispatched(1, ActuatorCommand::Stop)).await;
        assert!(matches!(result, Err(SinkError::SendFailed(_))));
    }

    #[test]
    fn test_file_sink_implements_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FileSink>();
    }
}
