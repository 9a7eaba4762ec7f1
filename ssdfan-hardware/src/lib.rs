//! ssdfan-hardware
//!
//! Hardware access crate for the hwmon sysfs interface: attribute I/O,
//! device discovery, fan actuation and temperature sensing. Used by the
//! daemon to drive the GPU fan from the SSD temperature.
//
//! Public API:
//! - `attribute::SysfsAttributes`: integer attribute I/O under a hwmon directory
//! - `locator::locate_devices`: find the GPU and SSD hwmon directories
//! - `fan_controller::FanController`: mode and PWM actuation
//! - `sensor::TemperatureSensor`: SSD temperature readings

pub mod attribute;
pub mod fan_controller;
pub mod locator;
pub mod sensor;

pub use attribute::{Attribute, AttributeStore, SysfsAttributes};
pub use fan_controller::FanController;
pub use locator::{locate_devices, DevicePaths};
pub use sensor::TemperatureSensor;
