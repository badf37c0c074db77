pub mod capture;
pub mod device;
pub mod queue;

pub use capture::{encode_block, BlockAccumulator, CaptureNode};
pub use device::DeviceManager;
pub use queue::{block_queue, BlockConsumer, BlockProducer, PushOutcome, QueueHandle, QueueStats};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[ignore] // Requires audio hardware
    fn test_device_enumeration() {
        let manager = DeviceManager::new();
        let inputs = manager.list_input_devices().unwrap();
        println!("Input devices: {}", inputs.len());
        for (i, (name, _)) in inputs.iter().enumerate() {
            println!("  {i}: {name}");
        }
    }

    #[test]
    #[ignore] // Requires audio hardware
    fn test_default_device_sample_rate() {
        let manager = DeviceManager::new();
        let device = manager.get_input_device("default").unwrap();
        assert!(manager.default_sample_rate(&device).unwrap() > 0);
    }
}
