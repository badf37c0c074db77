use crate::dispatcher::dispatch;
use crate::extractor::extract;
use crate::normalizer::CommandNormalizer;
use voxdrive_core::{ActuatorCommand, Magnitude, RewriteConfig};

/// A final transcript after correction, with the argument the matched
/// command gives it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedCommand {
    text: String,
    magnitude: Option<Magnitude>,
}

impl NormalizedCommand {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn magnitude(&self) -> Option<Magnitude> {
        self.magnitude
    }
}

/// Everything learned from one final transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpretation {
    pub raw: String,
    pub normalized: NormalizedCommand,
    /// Normalization changed the transcript.
    pub corrected: bool,
    pub command: ActuatorCommand,
}

/// Final transcript in, exactly one [`ActuatorCommand`] out. Holds no state
/// between calls beyond its rewrite table.
#[derive(Debug, Clone, Default)]
pub struct CommandInterpreter {
    normalizer: CommandNormalizer,
}

impl CommandInterpreter {
    pub fn new(normalizer: CommandNormalizer) -> Self {
        Self { normalizer }
    }

    pub fn with_extra_rewrites(extra: &[RewriteConfig]) -> Self {
        Self::new(CommandNormalizer::with_extra(extra))
    }

    pub fn normalizer(&self) -> &CommandNormalizer {
        &self.normalizer
    }

    pub fn interpret(&self, raw: &str) -> Interpretation {
        if raw.trim().is_empty() {
            tracing::debug!("empty transcript");
        } else {
            tracing::info!("command: {raw}");
        }

        let text = self.normalizer.normalize(raw);
        let corrected = text != raw;
        if corrected {
            tracing::info!("command corrected to '{text}'");
        }

        let argument = extract(&text);
        let command = dispatch(&text, argument.value);
        if command.is_noop() && !text.trim().is_empty() {
            tracing::debug!(transcript = %text, "no matching command");
        }

        Interpretation {
            raw: raw.to_string(),
            normalized: NormalizedCommand {
                text,
                magnitude: command.magnitude(),
            },
            corrected,
            command,
        }
    }
}
