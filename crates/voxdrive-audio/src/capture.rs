use crate::queue::BlockProducer;
use cpal::traits::{DeviceTrait, StreamTrait};
use cpal::{Device, FromSample, Sample, SampleFormat, SampleRate, SizedSample, Stream, StreamConfig};
use tokio::sync::mpsc;
use voxdrive_core::{block_byte_len, AudioBlock, AudioError, DeviceFault, SAMPLE_WIDTH};

const CHANNELS: u16 = 1;

fn append_samples<T>(out: &mut Vec<u8>, data: &[T])
where
    T: Sample,
    i16: FromSample<T>,
{
    for &sample in data {
        out.extend_from_slice(&sample.to_sample::<i16>().to_le_bytes());
    }
}

/// Convert device samples into an i16 PCM block.
pub fn encode_block<T>(data: &[T]) -> AudioBlock
where
    T: Sample,
    i16: FromSample<T>,
{
    let mut bytes = Vec::with_capacity(data.len() * SAMPLE_WIDTH);
    append_samples(&mut bytes, data);
    AudioBlock::from_bytes(bytes)
}

/// Regroups whatever the device delivers per callback into blocks of exactly
/// `block_size` frames. A partial block is held until the next callback.
pub struct BlockAccumulator {
    pending: Vec<u8>,
    block_bytes: usize,
}

impl BlockAccumulator {
    /// A `block_size` of zero is treated as one frame.
    pub fn new(block_size: u32) -> Self {
        let block_bytes = block_byte_len(block_size.max(1), CHANNELS);
        Self {
            pending: Vec::with_capacity(block_bytes),
            block_bytes,
        }
    }

    pub fn block_bytes(&self) -> usize {
        self.block_bytes
    }

    /// Bytes waiting for the rest of their block.
    pub fn pending_bytes(&self) -> usize {
        self.pending.len()
    }

    /// Append `data`, handing every completed block to `emit` in order.
    pub fn push_samples<T>(&mut self, data: &[T], mut emit: impl FnMut(AudioBlock))
    where
        T: Sample,
        i16: FromSample<T>,
    {
        let mut rest = data;
        while !rest.is_empty() {
            let room = (self.block_bytes - self.pending.len()) / SAMPLE_WIDTH;
            let (head, tail) = rest.split_at(room.min(rest.len()));
            append_samples(&mut self.pending, head);
            rest = tail;
            if self.pending.len() == self.block_bytes {
                let full =
                    std::mem::replace(&mut self.pending, Vec::with_capacity(self.block_bytes));
                emit(AudioBlock::from_bytes(full));
            }
        }
    }
}

fn classify_stream_error(err: &cpal::StreamError) -> DeviceFault {
    DeviceFault {
        message: err.to_string(),
        fatal: matches!(err, cpal::StreamError::DeviceNotAvailable),
    }
}

// ── CaptureNode ───────────────────────────────────────────────

/// A running mono input stream feeding a [`BlockProducer`].
///
/// Capture stops when the node is dropped.
pub struct CaptureNode {
    _stream: Stream,
    sample_rate: u32,
}

impl CaptureNode {
    pub fn new(
        device: &Device,
        producer: BlockProducer,
        sample_rate: u32,
        block_size: u32,
        faults: mpsc::UnboundedSender<DeviceFault>,
    ) -> Result<Self, AudioError> {
        let format = device
            .default_input_config()
            .map_err(|e| AudioError::DeviceConfig(e.to_string()))?
            .sample_format();

        let config = StreamConfig {
            channels: CHANNELS,
            sample_rate: SampleRate(sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let stream = match format {
            SampleFormat::I16 => build_stream::<i16>(device, &config, block_size, producer, faults),
            SampleFormat::U16 => build_stream::<u16>(device, &config, block_size, producer, faults),
            SampleFormat::I32 => build_stream::<i32>(device, &config, block_size, producer, faults),
            SampleFormat::F32 => build_stream::<f32>(device, &config, block_size, producer, faults),
            SampleFormat::F64 => build_stream::<f64>(device, &config, block_size, producer, faults),
            other => {
                return Err(AudioError::StreamBuild(format!(
                    "unsupported sample format: {other:?}"
                )))
            }
        }?;

        stream
            .play()
            .map_err(|e| AudioError::StreamPlay(e.to_string()))?;

        tracing::info!(
            sample_rate,
            block_size,
            format = ?format,
            "capture stream started"
        );

        Ok(Self {
            _stream: stream,
            sample_rate,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

fn fault_reporter(
    faults: mpsc::UnboundedSender<DeviceFault>,
) -> impl FnMut(cpal::StreamError) + Send + 'static {
    move |err: cpal::StreamError| {
        let fault = classify_stream_error(&err);
        if fault.fatal {
            tracing::error!("capture stream error: {}", fault.message);
        } else {
            tracing::warn!("capture stream status: {}", fault.message);
        }
        let _ = faults.send(fault);
    }
}

fn build_stream<T>(
    device: &Device,
    config: &StreamConfig,
    block_size: u32,
    mut producer: BlockProducer,
    faults: mpsc::UnboundedSender<DeviceFault>,
) -> Result<Stream, AudioError>
where
    T: SizedSample,
    i16: FromSample<T>,
{
    let mut accumulator = BlockAccumulator::new(block_size);

    device
        .build_input_stream(
            config,
            move |data: &[T], _: &cpal::InputCallbackInfo| {
                // Overflow is counted by the queue and reported by the consumer.
                accumulator.push_samples(data, |block| {
                    let _ = producer.push(block);
                });
            },
            fault_reporter(faults),
            None,
        )
        .map_err(|e| AudioError::StreamBuild(e.to_string()))
}
