//! Fake hwmon tree for daemon tests

use crate::control::FanLoop;
use ssdfan_core::config::DeviceConfig;
use ssdfan_core::{Result, TemperatureRange};
use ssdfan_hardware::{FanController, SysfsAttributes, TemperatureSensor};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// A temporary directory laid out like `/sys/class/hwmon` with an unrelated
/// sensor, an NVMe SSD and an AMD GPU fan.
///
/// The GPU starts in mode `2` at PWM 80 with bounds 100..=255; the SSD reads
/// 45000 millidegrees.
pub(crate) struct FakeHwmon {
    root: TempDir,
}

impl FakeHwmon {
    pub(crate) fn new() -> Self {
        let root = TempDir::new().unwrap();
        let hwmon = Self { root };

        hwmon.add_device("hwmon0", "acpitz");
        hwmon.add_device("hwmon1", "nvme");
        hwmon.add_device("hwmon2", "amdgpu");

        hwmon.set_ssd_value("temp1_input", "45000");
        hwmon.set_gpu_value("pwm1_enable", "2");
        hwmon.set_gpu_value("pwm1", "80");
        hwmon.set_gpu_value("pwm1_min", "100");
        hwmon.set_gpu_value("pwm1_max", "255");
        hwmon.set_gpu_value("fan1_input", "1200");

        hwmon
    }

    fn add_device(&self, dir: &str, name: &str) {
        let path = self.root.path().join(dir);
        fs::create_dir_all(&path).unwrap();
        fs::write(path.join("name"), format!("{}\n", name)).unwrap();
    }

    pub(crate) fn gpu(&self) -> PathBuf {
        self.root.path().join("hwmon2")
    }

    pub(crate) fn ssd(&self) -> PathBuf {
        self.root.path().join("hwmon1")
    }

    /// Discovery settings pointing at this tree
    pub(crate) fn device_config(&self) -> DeviceConfig {
        DeviceConfig {
            hwmon_glob: self.root.path().join("hwmon*").to_string_lossy().into_owned(),
            ..DeviceConfig::default()
        }
    }

    pub(crate) fn set_gpu_value(&self, attribute: &str, value: &str) {
        fs::write(self.gpu().join(attribute), format!("{}\n", value)).unwrap();
    }

    pub(crate) fn gpu_value(&self, attribute: &str) -> String {
        fs::read_to_string(self.gpu().join(attribute))
            .unwrap()
            .trim()
            .to_string()
    }

    pub(crate) fn remove_gpu_value(&self, attribute: &str) {
        fs::remove_file(self.gpu().join(attribute)).unwrap();
    }

    pub(crate) fn set_ssd_value(&self, attribute: &str, value: &str) {
        fs::write(self.ssd().join(attribute), format!("{}\n", value)).unwrap();
    }

    pub(crate) fn remove_ssd_value(&self, attribute: &str) {
        fs::remove_file(self.ssd().join(attribute)).unwrap();
    }

    pub(crate) fn set_temperature(&self, millidegrees: i64) {
        self.set_ssd_value("temp1_input", &millidegrees.to_string());
    }

    /// Initialize a control loop over this tree with thresholds 40000..60000
    pub(crate) async fn fan_loop(
        &self,
        max_step: u32,
    ) -> Result<FanLoop<SysfsAttributes, SysfsAttributes>> {
        FanLoop::initialize(
            FanController::new(SysfsAttributes::new(self.gpu())),
            TemperatureSensor::new(SysfsAttributes::new(self.ssd())),
            TemperatureRange::new(40000, 60000).unwrap(),
            max_step,
        )
        .await
    }
}
