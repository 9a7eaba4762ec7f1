//! Attribute store for hwmon sysfs files
//!
//! Each hwmon device directory exposes its sensors and controls as small
//! text files holding one decimal integer. This module names the files the
//! controller uses and provides async read/write access to them.

use async_trait::async_trait;
use ssdfan_core::{Result, SsdFanError};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error};

/// hwmon attributes used by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    /// Device name, used for discovery
    Name,
    /// Fan control mode (`1` = manual)
    FanMode,
    /// Fan PWM duty value
    FanPwm,
    /// Lowest accepted PWM duty value
    FanPwmMin,
    /// Highest accepted PWM duty value
    FanPwmMax,
    /// Fan speed in RPM
    FanSpeed,
    /// Temperature in millidegrees Celsius
    Temperature,
}

impl Attribute {
    /// File name of the attribute inside a hwmon directory
    pub fn file_name(&self) -> &'static str {
        match self {
            Attribute::Name => "name",
            Attribute::FanMode => "pwm1_enable",
            Attribute::FanPwm => "pwm1",
            Attribute::FanPwmMin => "pwm1_min",
            Attribute::FanPwmMax => "pwm1_max",
            Attribute::FanSpeed => "fan1_input",
            Attribute::Temperature => "temp1_input",
        }
    }
}

/// Trait for integer attribute access
///
/// This trait enables testing of `FanController` and `TemperatureSensor`
/// without real hardware by allowing in-memory implementations.
#[async_trait]
pub trait AttributeStore: Send + Sync {
    /// Full path of an attribute, used in error reports
    fn attribute_path(&self, attribute: Attribute) -> PathBuf;

    /// Read an attribute as a decimal integer
    async fn read_int(&self, attribute: Attribute) -> Result<i64>;

    /// Write a decimal integer to an attribute
    async fn write_int(&self, attribute: Attribute, value: i64) -> Result<()>;
}

/// Parse attribute content, taking the first whitespace-delimited token.
pub fn parse_int(path: &Path, content: &str) -> Result<i64> {
    content
        .split_whitespace()
        .next()
        .and_then(|token| token.parse::<i64>().ok())
        .ok_or_else(|| SsdFanError::InvalidAttribute {
            path: path.to_path_buf(),
            content: content.trim().to_string(),
        })
}

/// Attribute store backed by a sysfs hwmon directory
#[derive(Debug, Clone)]
pub struct SysfsAttributes {
    base: PathBuf,
}

impl SysfsAttributes {
    /// Create a store rooted at a hwmon directory (e.g. `/sys/class/hwmon/hwmon2`)
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }
}

#[async_trait]
impl AttributeStore for SysfsAttributes {
    fn attribute_path(&self, attribute: Attribute) -> PathBuf {
        self.base.join(attribute.file_name())
    }

    async fn read_int(&self, attribute: Attribute) -> Result<i64> {
        let path = self.attribute_path(attribute);

        let content = fs::read_to_string(&path)
            .await
            .map_err(|source| SsdFanError::AttributeIo {
                path: path.clone(),
                source,
            })?;

        let value = parse_int(&path, &content)?;
        debug!("Read {} = {}", path.display(), value);
        Ok(value)
    }

    async fn write_int(&self, attribute: Attribute, value: i64) -> Result<()> {
        let path = self.attribute_path(attribute);
        debug!("Writing {} = {}", path.display(), value);

        let io_error = |source| SsdFanError::AttributeIo {
            path: path.clone(),
            source,
        };

        // sysfs attributes always exist; never create them
        let mut file = fs::OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&path)
            .await
            .map_err(io_error)?;

        file.write_all(value.to_string().as_bytes())
            .await
            .map_err(io_error)?;
        file.flush().await.map_err(|source| {
            error!("Flush of {} failed: {}", path.display(), source);
            SsdFanError::AttributeIo {
                path: path.clone(),
                source,
            }
        })?;

        Ok(())
    }
}
