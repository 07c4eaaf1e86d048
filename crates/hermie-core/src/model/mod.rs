// ── Domain model ──

pub mod device;
pub mod payload;
pub mod reading;

pub use device::{Command, Device, DeviceState};
pub use payload::{EMPTY, Payload};
pub use reading::{AlertFlag, HealthReport, HealthStatus, SensorReading};
