//! Static configuration loaded once at startup
//!
//! This configuration is read-only after the daemon starts.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{Result, SsdFanError};
use crate::policy::{TemperatureRange, DEFAULT_MAX_STEP};

/// Device discovery configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Glob of candidate hwmon directories. Only the final path component
    /// may contain a wildcard, and only a single `*`.
    pub hwmon_glob: String,
    /// Name prefix identifying the GPU fan controller
    pub gpu_name: String,
    /// Name prefix identifying the SSD temperature sensor
    pub ssd_name: String,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            hwmon_glob: "/sys/class/hwmon/hwmon*".to_string(),
            gpu_name: "amdgpu".to_string(),
            ssd_name: "nvme".to_string(),
        }
    }
}

/// Glob metacharacters the candidate matcher does not implement
const UNSUPPORTED_GLOB_CHARS: &[char] = &['?', '[', ']'];

impl DeviceConfig {
    /// Check that `hwmon_glob` only uses the supported wildcard form: plain
    /// directories followed by a last component with at most one `*`.
    pub fn check_glob(&self) -> Result<()> {
        let glob = Path::new(&self.hwmon_glob);
        let pattern = glob
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                SsdFanError::Config(format!("Invalid hwmon_glob '{}'", self.hwmon_glob))
            })?;

        if self.hwmon_glob.contains(UNSUPPORTED_GLOB_CHARS) {
            return Err(SsdFanError::Config(format!(
                "hwmon_glob '{}' uses unsupported wildcards; only '*' is allowed",
                self.hwmon_glob
            )));
        }

        let parent_has_wildcard = glob
            .parent()
            .is_some_and(|parent| parent.to_string_lossy().contains('*'));
        if parent_has_wildcard || pattern.matches('*').count() > 1 {
            return Err(SsdFanError::Config(format!(
                "hwmon_glob '{}' may only use a single '*' in its last component",
                self.hwmon_glob
            )));
        }

        Ok(())
    }
}

/// Control loop configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// Temperature (millidegrees) at or below which the fan runs at minimum PWM
    pub temp_min: i64,
    /// Temperature (millidegrees) at or above which the fan runs at maximum PWM
    pub temp_max: i64,
    /// Maximum PWM change per tick
    pub max_step: u32,
    /// Seconds between ticks
    pub interval_secs: u64,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            temp_min: 40_000,
            temp_max: 60_000,
            max_step: DEFAULT_MAX_STEP,
            interval_secs: DEFAULT_MAX_STEP as u64,
        }
    }
}

/// Shutdown behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShutdownConfig {
    /// Write the fan mode found at startup back on exit
    pub restore_mode: bool,
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self { restore_mode: true }
    }
}

/// Static configuration for the ssdfan daemon.
///
/// Located at `~/.config/ssdfan/config.toml` by default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticConfig {
    /// Device discovery settings
    pub devices: DeviceConfig,

    /// Control loop thresholds and timing
    pub control: ControlConfig,

    /// Shutdown settings
    pub shutdown: ShutdownConfig,
}

impl StaticConfig {
    /// Parse StaticConfig from TOML string.
    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize StaticConfig to TOML string.
    pub fn to_toml(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        self.temperature_range()?;

        if self.control.max_step == 0 {
            return Err(SsdFanError::Config("max_step must be at least 1".to_string()));
        }
        if self.control.interval_secs == 0 {
            return Err(SsdFanError::Config(
                "interval_secs must be at least 1".to_string(),
            ));
        }

        let devices = &self.devices;
        if devices.gpu_name.trim().is_empty() || devices.ssd_name.trim().is_empty() {
            return Err(SsdFanError::Config(
                "gpu_name and ssd_name must not be empty".to_string(),
            ));
        }

        devices.check_glob()
    }

    /// Temperature thresholds as a validated range.
    pub fn temperature_range(&self) -> Result<TemperatureRange> {
        TemperatureRange::new(self.control.temp_min, self.control.temp_max)
            .map_err(|e| SsdFanError::Config(e.to_string()))
    }

    /// Control loop tick period.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.control.interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_static_config() {
        let config = StaticConfig::default();
        assert_eq!(config.devices.hwmon_glob, "/sys/class/hwmon/hwmon*");
        assert_eq!(config.devices.gpu_name, "amdgpu");
        assert_eq!(config.devices.ssd_name, "nvme");
        assert_eq!(config.control.temp_min, 40_000);
        assert_eq!(config.control.temp_max, 60_000);
        assert_eq!(config.control.max_step, 5);
        assert_eq!(config.interval(), Duration::from_secs(5));
        assert!(config.shutdown.restore_mode);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_static_config_serialization() {
        let config = StaticConfig::default();
        let toml_str = config.to_toml().unwrap();

        assert!(toml_str.contains("[devices]"));
        assert!(toml_str.contains("[control]"));
        assert!(toml_str.contains("[shutdown]"));
        assert!(toml_str.contains("gpu_name = \"amdgpu\""));
    }

    #[test]
    fn test_static_config_deserialization() {
        let toml_str = r#"
            [devices]
            hwmon_glob = "/tmp/hwmon/hwmon*"
            gpu_name = "radeon"
            ssd_name = "nvme"

            [control]
            temp_min = 32000
            temp_max = 55000
            max_step = 3
            interval_secs = 10

            [shutdown]
            restore_mode = false
        "#;

        let config = StaticConfig::from_toml(toml_str).unwrap();
        assert_eq!(config.devices.hwmon_glob, "/tmp/hwmon/hwmon*");
        assert_eq!(config.devices.gpu_name, "radeon");
        assert_eq!(config.control.temp_min, 32000);
        assert_eq!(config.control.max_step, 3);
        assert_eq!(config.interval(), Duration::from_secs(10));
        assert!(!config.shutdown.restore_mode);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = StaticConfig::from_toml("[control]\ntemp_max = 70000\n").unwrap();
        assert_eq!(config.control.temp_min, 40_000);
        assert_eq!(config.control.temp_max, 70_000);
        assert_eq!(config.devices, DeviceConfig::default());

        let empty = StaticConfig::from_toml("").unwrap();
        assert_eq!(empty, StaticConfig::default());
    }

    #[test]
    fn test_validate_inverted_thresholds() {
        let mut config = StaticConfig::default();
        config.control.temp_min = 60_000;
        config.control.temp_max = 40_000;

        let result = config.validate();
        assert!(matches!(result, Err(SsdFanError::Config(_))));
    }

    #[test]
    fn test_validate_zero_step_and_interval() {
        let mut config = StaticConfig::default();
        config.control.max_step = 0;
        assert!(config.validate().is_err());

        let mut config = StaticConfig::default();
        config.control.interval_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_empty_device_name() {
        let mut config = StaticConfig::default();
        config.devices.ssd_name = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_glob_shapes() {
        let mut config = StaticConfig::default();

        config.devices.hwmon_glob = "/sys/class/*/hwmon*".to_string();
        assert!(config.validate().is_err());

        config.devices.hwmon_glob = "/sys/class/hwmon/*mon*".to_string();
        assert!(config.validate().is_err());

        config.devices.hwmon_glob = "/sys/class/hwmon/*".to_string();
        assert!(config.validate().is_ok());

        config.devices.hwmon_glob = "/sys/class/hwmon/hwmon3".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_unsupported_wildcards() {
        let mut config = StaticConfig::default();

        for glob in [
            "/sys/class/hwmon/hwmon?",
            "/sys/class/hwmon/hwmon[0-9]",
            "/sys/class/hwmon[01]/hwmon*",
        ] {
            config.devices.hwmon_glob = glob.to_string();
            let result = config.validate();
            assert!(
                matches!(result, Err(SsdFanError::Config(_))),
                "{} should be rejected",
                glob
            );
        }
    }
}
