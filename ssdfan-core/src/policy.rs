//! Temperature-to-PWM policy and slew limiting
//!
//! The policy maps an SSD temperature onto the fan's PWM range with a single
//! linear segment between two thresholds. The limiter then bounds how far
//! the commanded value may move in one control tick.

use crate::error::{Result, SsdFanError};
use crate::types::PwmBounds;

/// Default maximum PWM change per tick
pub const DEFAULT_MAX_STEP: u32 = 5;

/// Temperature thresholds in millidegrees Celsius.
///
/// At or below `min` the fan runs at the PWM minimum, at or above `max` it
/// runs at the PWM maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemperatureRange {
    min: i64,
    max: i64,
}

impl TemperatureRange {
    /// Create a range, rejecting `min >= max`.
    pub fn new(min: i64, max: i64) -> Result<Self> {
        if min >= max {
            return Err(SsdFanError::InvalidInput(format!(
                "temperature minimum {} must be below maximum {}",
                min, max
            )));
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }
}

/// Compute the target PWM for a temperature reading.
///
/// - Returns `bounds.max` if the reading is unavailable
/// - Returns `bounds.min` at or below the range minimum
/// - Returns `bounds.max` at or above the range maximum
/// - Linearly interpolates otherwise, truncating the fractional part
pub fn compute_target_pwm(
    temperature: Option<i64>,
    bounds: PwmBounds,
    range: TemperatureRange,
) -> u32 {
    let Some(temp) = temperature else {
        return bounds.max();
    };

    if temp <= range.min {
        return bounds.min();
    }
    if temp >= range.max {
        return bounds.max();
    }

    // Widened so thresholds near the i64 limits cannot overflow
    let offset = i128::from(temp) - i128::from(range.min);
    let width = i128::from(range.max) - i128::from(range.min);
    let ratio = offset as f64 / width as f64;
    let span = (bounds.max() - bounds.min()) as f64;
    bounds.min() + (ratio * span) as u32
}

/// Mutable controller state carried between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerState {
    /// PWM value most recently handed to the actuator
    pub last_commanded_pwm: u32,
}

/// Bounds the per-tick change of the commanded PWM.
#[derive(Debug, Clone)]
pub struct SlewLimiter {
    state: ControllerState,
    max_step: u32,
}

impl SlewLimiter {
    /// Create a limiter seeded with the first (un-limited) commanded value.
    pub fn new(initial_pwm: u32, max_step: u32) -> Self {
        Self {
            state: ControllerState {
                last_commanded_pwm: initial_pwm,
            },
            max_step,
        }
    }

    /// Move toward `target` by at most `max_step` and remember the result.
    pub fn limit(&mut self, target: u32) -> u32 {
        let last = self.state.last_commanded_pwm;
        let next = if target > last {
            target.min(last.saturating_add(self.max_step))
        } else {
            target.max(last.saturating_sub(self.max_step))
        };
        self.state.last_commanded_pwm = next;
        next
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }
}
