use cpal::traits::{DeviceTrait, HostTrait};
use cpal::{Device, Host};
use voxdrive_core::AudioError;

pub struct DeviceManager {
    host: Host,
}

impl DeviceManager {
    pub fn new() -> Self {
        Self {
            host: cpal::default_host(),
        }
    }

    pub fn list_input_devices(&self) -> Result<Vec<(String, Device)>, AudioError> {
        let devices = self
            .host
            .input_devices()
            .map_err(|e| AudioError::DeviceEnumeration(e.to_string()))?;

        let mut result = Vec::new();
        for device in devices {
            let name = device.name().unwrap_or_else(|_| "unknown".to_string());
            result.push((name, device));
        }
        Ok(result)
    }

    /// Resolve `selector` to an input device: `"default"`, a numeric index
    /// into [`list_input_devices`](Self::list_input_devices), an exact name,
    /// or failing those the first name containing it.
    pub fn get_input_device(&self, selector: &str) -> Result<Device, AudioError> {
        if selector == "default" {
            return self
                .host
                .default_input_device()
                .ok_or_else(|| AudioError::DeviceNotFound("no default input device".to_string()));
        }

        let devices = self.list_input_devices()?;
        let names: Vec<&str> = devices.iter().map(|(n, _)| n.as_str()).collect();
        let index = select_device(&names, selector).ok_or_else(|| {
            AudioError::DeviceNotFound(format!("input device not found: {}", selector))
        })?;
        devices
            .into_iter()
            .nth(index)
            .map(|(_, device)| device)
            .ok_or_else(|| AudioError::DeviceNotFound(format!("input device not found: {}", selector)))
    }

    /// Default capture rate of `device`, used when no sample rate is configured.
    pub fn default_sample_rate(&self, device: &Device) -> Result<u32, AudioError> {
        let config = device
            .default_input_config()
            .map_err(|e| AudioError::DeviceConfig(e.to_string()))?;
        Ok(config.sample_rate().0)
    }
}

impl Default for DeviceManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Index, exact name, then substring; first hit wins.
pub(crate) fn select_device(names: &[&str], selector: &str) -> Option<usize> {
    if let Ok(index) = selector.parse::<usize>() {
        if index < names.len() {
            return Some(index);
        }
    }
    names
        .iter()
        .position(|n| *n == selector)
        .or_else(|| names.iter().position(|n| n.contains(selector)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAMES: [&str; 3] = ["Built-in Microphone", "USB Audio Device", "USB Audio Device 2"];

    #[test]
    fn test_select_device_by_index() {
        assert_eq!(select_device(&NAMES, "1"), Some(1));
    }

    #[test]
    fn test_select_device_index_out_of_range_falls_back_to_name() {
        assert_eq!(select_device(&NAMES, "7"), None);
        assert_eq!(select_device(&["Mic 7"], "7"), Some(0));
    }

    #[test]
    fn test_select_device_exact_name_beats_substring() {
        assert_eq!(select_device(&NAMES, "USB Audio Device 2"), Some(2));
        assert_eq!(select_device(&NAMES, "USB Audio Device"), Some(1));
    }

    #[test]
    fn test_select_device_substring() {
        assert_eq!(select_device(&NAMES, "Built-in"), Some(0));
    }

    #[test]
    fn test_select_device_unknown() {
        assert_eq!(select_device(&NAMES, "Bluetooth"), None);
    }
}
