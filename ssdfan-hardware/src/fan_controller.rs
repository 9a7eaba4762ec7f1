//! Fan Controller - PWM fan actuation through hwmon attributes
//!
//! Every write is preceded by a read of the current on-device value and
//! skipped when the device already holds the requested value.

use crate::attribute::{Attribute, AttributeStore};
use ssdfan_core::{FanMode, PwmBounds, Result, SsdFanError};
use tracing::{debug, info};

/// Fan controller interface
///
/// Generic over the attribute store, allowing real sysfs directories
/// (`SysfsAttributes`) or in-memory stores for testing. Clones share the
/// same device.
#[derive(Clone)]
pub struct FanController<S: AttributeStore> {
    store: S,
}

impl<S: AttributeStore> FanController<S> {
    /// Create a new FanController over the GPU's attribute store
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Read a non-negative integer attribute
    async fn read_unsigned(&self, attribute: Attribute) -> Result<u32> {
        let raw = self.store.read_int(attribute).await?;
        u32::try_from(raw).map_err(|_| SsdFanError::InvalidAttribute {
            path: self.store.attribute_path(attribute),
            content: raw.to_string(),
        })
    }

    /// Current fan control mode
    pub async fn fan_mode(&self) -> Result<FanMode> {
        let raw = self.store.read_int(Attribute::FanMode).await?;
        Ok(FanMode::from_raw(raw))
    }

    /// Switch the fan control mode, returning the mode found on the device.
    ///
    /// No write happens if the device is already in `mode`.
    pub async fn set_fan_mode(&self, mode: FanMode) -> Result<FanMode> {
        let previous = self.fan_mode().await?;
        if previous == mode {
            debug!("Fan mode already {}", mode);
            return Ok(previous);
        }

        self.store.write_int(Attribute::FanMode, mode.as_raw()).await?;
        info!("Fan mode changed from {} to {}", previous, mode);
        Ok(previous)
    }

    /// Current PWM duty value
    pub async fn pwm(&self) -> Result<u32> {
        self.read_unsigned(Attribute::FanPwm).await
    }

    /// Set the PWM duty value, returning the value found on the device.
    ///
    /// No write happens if the device already holds `pwm`.
    pub async fn set_fan_pwm(&self, pwm: u32) -> Result<u32> {
        let previous = self.pwm().await?;
        if previous == pwm {
            debug!("Fan PWM already {}", pwm);
            return Ok(previous);
        }

        self.store.write_int(Attribute::FanPwm, i64::from(pwm)).await?;
        debug!("Fan PWM changed from {} to {}", previous, pwm);
        Ok(previous)
    }

    /// Read the PWM range supported by the fan
    pub async fn pwm_bounds(&self) -> Result<PwmBounds> {
        let min = self.read_unsigned(Attribute::FanPwmMin).await?;
        let max = self.read_unsigned(Attribute::FanPwmMax).await?;
        PwmBounds::new(min, max)
    }

    /// Current fan speed in RPM
    pub async fn fan_speed(&self) -> Result<u32> {
        self.read_unsigned(Attribute::FanSpeed).await
    }

    /// Put the fan in manual mode and command `pwm`.
    ///
    /// Stops at the first failure; the PWM is not written if the mode
    /// switch failed.
    pub async fn apply(&self, pwm: u32) -> Result<()> {
        self.set_fan_mode(FanMode::Manual).await?;
        self.set_fan_pwm(pwm).await?;
        Ok(())
    }
}
