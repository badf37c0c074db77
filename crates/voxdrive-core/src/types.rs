use std::fmt;

/// Bytes per sample of the signed 16-bit PCM the capture side produces.
pub const SAMPLE_WIDTH: usize = 2;

/// Byte length of one block of `frames` frames with `channels` interleaved channels.
pub fn block_byte_len(frames: u32, channels: u16) -> usize {
    frames as usize * channels as usize * SAMPLE_WIDTH
}

/// Raw little-endian i16 PCM captured by one callback invocation.
///
/// Deliberately not `Clone`: a block moves from the capture callback into the
/// queue and from the queue into the recognizer exactly once.
#[derive(Debug, PartialEq, Eq)]
pub struct AudioBlock {
    bytes: Box<[u8]>,
}

impl AudioBlock {
    pub fn from_bytes(bytes: impl Into<Box<[u8]>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    pub fn from_samples(samples: &[i16]) -> Self {
        let mut bytes = Vec::with_capacity(samples.len() * SAMPLE_WIDTH);
        for s in samples {
            bytes.extend_from_slice(&s.to_le_bytes());
        }
        Self::from_bytes(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Decode the block back into samples. A trailing odd byte is ignored.
    pub fn samples(&self) -> impl Iterator<Item = i16> + '_ {
        self.bytes
            .chunks_exact(SAMPLE_WIDTH)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionEvent {
    /// Revisable hypothesis for the utterance still in progress.
    Partial(String),
    /// Committed transcript of a completed utterance.
    Final(String),
}

impl RecognitionEvent {
    pub fn text(&self) -> &str {
        match self {
            RecognitionEvent::Partial(text) | RecognitionEvent::Final(text) => text,
        }
    }

    pub fn is_final(&self) -> bool {
        matches!(self, RecognitionEvent::Final(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Degrees,
    Inches,
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::Degrees => f.write_str("degrees"),
            Unit::Inches => f.write_str("inches"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Magnitude {
    pub value: i64,
    pub unit: Unit,
}

/// The closed set of intents the rover understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorCommand {
    Stop,
    MoveForward(i64),
    MoveBackward(i64),
    TurnRight(i64),
    TurnLeft(i64),
    Lift(i64),
    Lower(i64),
    CloseClaw(i64),
    OpenClaw(i64),
    NoOp,
}

impl ActuatorCommand {
    /// Argument of the command with the unit the command gives it.
    pub fn magnitude(&self) -> Option<Magnitude> {
        let (value, unit) = match *self {
            ActuatorCommand::MoveForward(v) | ActuatorCommand::MoveBackward(v) => (v, Unit::Inches),
            ActuatorCommand::TurnRight(v)
            | ActuatorCommand::TurnLeft(v)
            | ActuatorCommand::Lift(v)
            | ActuatorCommand::Lower(v)
            | ActuatorCommand::CloseClaw(v)
            | ActuatorCommand::OpenClaw(v) => (v, Unit::Degrees),
            ActuatorCommand::Stop | ActuatorCommand::NoOp => return None,
        };
        Some(Magnitude { value, unit })
    }

    pub fn is_noop(&self) -> bool {
        matches!(self, ActuatorCommand::NoOp)
    }
}

impl fmt::Display for ActuatorCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActuatorCommand::Stop => f.write_str("stopping"),
            ActuatorCommand::MoveForward(x) => write!(f, "moving forward {x} inches"),
            ActuatorCommand::MoveBackward(x) => write!(f, "moving backward {x} inches"),
            ActuatorCommand::TurnRight(x) => write!(f, "turning right {x} degrees"),
            ActuatorCommand::TurnLeft(x) => write!(f, "turning left {x} degrees"),
            ActuatorCommand::Lift(x) => write!(f, "lifting {x} degrees"),
            ActuatorCommand::Lower(x) => write!(f, "lowering {x} degrees"),
            ActuatorCommand::CloseClaw(x) => write!(f, "closing claw {x} degrees"),
            ActuatorCommand::OpenClaw(x) => write!(f, "opening claw {x} degrees"),
            ActuatorCommand::NoOp => f.write_str("no command"),
        }
    }
}

/// A command on its way to the actuator sinks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchedCommand {
    /// Monotonic count of final utterances seen by the loop, starting at 1.
    pub utterance: u64,
    /// Normalized transcript the command was derived from.
    pub transcript: String,
    pub command: ActuatorCommand,
}

/// Status reported by the audio subsystem from outside the sample callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceFault {
    pub message: String,
    /// The device is gone and acquisition cannot continue.
    pub fatal: bool,
}
