//! Core types and data structures for ssdfan

use crate::error::{Result, SsdFanError};
use std::fmt;

/// Fan control mode as exposed by `pwm1_enable`.
///
/// Only manual mode carries meaning for the controller. Any other value is
/// kept verbatim so the mode found at startup can be written back unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanMode {
    /// Firmware-controlled fan speed (`0`)
    Automatic,
    /// Software-controlled fan speed (`1`)
    Manual,
    /// Any other driver-specific mode
    Other(i64),
}

impl FanMode {
    /// Decode the raw `pwm1_enable` value.
    pub fn from_raw(raw: i64) -> Self {
        match raw {
            0 => FanMode::Automatic,
            1 => FanMode::Manual,
            other => FanMode::Other(other),
        }
    }

    /// Raw value to write back to `pwm1_enable`.
    pub fn as_raw(&self) -> i64 {
        match self {
            FanMode::Automatic => 0,
            FanMode::Manual => 1,
            FanMode::Other(raw) => *raw,
        }
    }
}

impl fmt::Display for FanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FanMode::Automatic => write!(f, "automatic (0)"),
            FanMode::Manual => write!(f, "manual (1)"),
            FanMode::Other(raw) => write!(f, "mode {}", raw),
        }
    }
}

/// PWM duty-cycle range reported by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PwmBounds {
    min: u32,
    max: u32,
}

impl PwmBounds {
    /// Create bounds, rejecting `min > max`.
    pub fn new(min: u32, max: u32) -> Result<Self> {
        if min > max {
            return Err(SsdFanError::InvalidInput(format!(
                "PWM minimum {} exceeds maximum {}",
                min, max
            )));
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn max(&self) -> u32 {
        self.max
    }
}

impl fmt::Display for PwmBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fan_mode_raw_values() {
        assert_eq!(FanMode::from_raw(0), FanMode::Automatic);
        assert_eq!(FanMode::from_raw(1), FanMode::Manual);
        assert_eq!(FanMode::from_raw(2), FanMode::Other(2));

        for raw in [0, 1, 2, 5] {
            assert_eq!(FanMode::from_raw(raw).as_raw(), raw);
        }
    }

    #[test]
    fn test_fan_mode_display() {
        assert_eq!(FanMode::Manual.to_string(), "manual (1)");
        assert_eq!(FanMode::Other(2).to_string(), "mode 2");
    }

    #[test]
    fn test_pwm_bounds() {
        let bounds = PwmBounds::new(100, 255).unwrap();
        assert_eq!(bounds.min(), 100);
        assert_eq!(bounds.max(), 255);
        assert_eq!(bounds.to_string(), "100..=255");

        assert!(PwmBounds::new(80, 80).is_ok());
    }

    #[test]
    fn test_pwm_bounds_inverted() {
        let result = PwmBounds::new(255, 0);
        assert!(matches!(result, Err(SsdFanError::InvalidInput(_))));
    }
}
