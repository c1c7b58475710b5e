use crate::message::{DeviceRecord, DeviceStatus};

/// Read-only, ordered table of known rovers.
///
/// Built once at startup and shared behind an `Arc`; there is no mutation path.
#[derive(Clone, Debug)]
pub struct DeviceRegistry {
    devices: Vec<DeviceRecord>,
}

impl DeviceRegistry {
    pub fn new(devices: Vec<DeviceRecord>) -> Self {
        Self { devices }
    }

    /// The three demo rovers the feed ships with.
    pub fn with_defaults() -> Self {
        Self::new(vec![
            DeviceRecord::new("rb-001", "Rover 001", DeviceStatus::Online),
            DeviceRecord::new("rb-002", "Rover 002", DeviceStatus::Online),
            DeviceRecord::new("rb-003", "Rover 003", DeviceStatus::Offline),
        ])
    }

    /// All devices, in insertion order
    pub fn list(&self) -> &[DeviceRecord] {
        &self.devices
    }

    pub fn find(&self, id: &str) -> Option<&DeviceRecord> {
        self.devices.iter().find(|d| d.id == id)
    }
}

impl Default for DeviceRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
