// ── Response caches ──
//
// One slot per device plus one each for telemetry and health. Slots are
// independent cells: writes to different keys never contend, and no lock
// is held across a request.

mod slot;

pub use slot::{Failure, FailureKind, Slot, SlotCell};

use std::sync::Arc;

use strum::EnumCount;

use crate::model::Device;

/// Process-lifetime cache backing every accessor.
#[derive(Debug)]
pub struct CacheStore {
    devices: [SlotCell; Device::COUNT],
    telemetry: SlotCell,
    health: SlotCell,
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheStore {
    /// All slots start empty.
    pub fn new() -> Self {
        Self {
            devices: std::array::from_fn(|_| SlotCell::new()),
            telemetry: SlotCell::new(),
            health: SlotCell::new(),
        }
    }

    pub fn device(&self, device: Device) -> Arc<Slot> {
        self.devices[device.index()].load()
    }

    pub fn set_device(&self, device: Device, slot: Slot) {
        self.devices[device.index()].replace(slot);
    }

    pub fn telemetry(&self) -> Arc<Slot> {
        self.telemetry.load()
    }

    pub fn set_telemetry(&self, slot: Slot) {
        self.telemetry.replace(slot);
    }

    pub fn health(&self) -> Arc<Slot> {
        self.health.load()
    }

    pub fn set_health(&self, slot: Slot) {
        self.health.replace(slot);
    }
}
