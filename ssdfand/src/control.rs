//! Fan control loop
//!
//! Owns the actuator, the sensor and the slew limiter. One tick reads the SSD
//! temperature, maps it onto the fan's PWM range, limits the change against
//! the previously commanded value and writes the result.

use ssdfan_core::{
    compute_target_pwm, FanMode, PwmBounds, Result, SlewLimiter, TemperatureRange,
};
use ssdfan_hardware::{AttributeStore, FanController, TemperatureSensor};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Control loop state for one fan driven by one temperature sensor
pub struct FanLoop<G: AttributeStore, S: AttributeStore> {
    fan: FanController<G>,
    sensor: TemperatureSensor<S>,
    bounds: PwmBounds,
    range: TemperatureRange,
    limiter: SlewLimiter,
    original_mode: FanMode,
}

impl<G: AttributeStore, S: AttributeStore> FanLoop<G, S> {
    /// Take control of the fan.
    ///
    /// Reads the PWM bounds and the current fan mode, then switches to manual
    /// mode and commands the un-limited target for the current temperature.
    /// The limiter is seeded with that target. If actuation fails the
    /// original mode is written back before the error is returned.
    pub async fn initialize(
        fan: FanController<G>,
        sensor: TemperatureSensor<S>,
        range: TemperatureRange,
        max_step: u32,
    ) -> Result<Self> {
        let bounds = fan.pwm_bounds().await?;
        info!("PWM range: {}", bounds);

        let original_mode = fan.fan_mode().await?;
        info!("Original fan mode: {}", original_mode);

        let temperature = read_temperature(&sensor).await;
        let target = compute_target_pwm(temperature, bounds, range);
        info!(
            "Initial temperature {:?} -> PWM {} (max step {})",
            temperature, target, max_step
        );

        if let Err(e) = fan.apply(target).await {
            if let Err(restore_err) = fan.set_fan_mode(original_mode).await {
                warn!("Failed to restore fan mode after startup failure: {}", restore_err);
            }
            return Err(e);
        }

        Ok(Self {
            fan,
            sensor,
            bounds,
            range,
            limiter: SlewLimiter::new(target, max_step),
            original_mode,
        })
    }

    /// Fan mode found on the device before the controller took over
    pub fn original_mode(&self) -> FanMode {
        self.original_mode
    }

    pub fn fan(&self) -> &FanController<G> {
        &self.fan
    }

    /// PWM value most recently commanded
    pub fn last_commanded_pwm(&self) -> u32 {
        self.limiter.state().last_commanded_pwm
    }

    /// Run one control step, returning the commanded PWM.
    ///
    /// The limiter advances even when the write fails, so the next tick
    /// continues from the value this tick attempted.
    pub async fn tick(&mut self) -> Result<u32> {
        let temperature = read_temperature(&self.sensor).await;
        let target = compute_target_pwm(temperature, self.bounds, self.range);
        let pwm = self.limiter.limit(target);
        debug!(
            "Tick: temperature={:?} target={} commanded={}",
            temperature, target, pwm
        );

        self.fan.apply(pwm).await?;

        match self.fan.fan_speed().await {
            Ok(rpm) => debug!("Fan speed: {} RPM", rpm),
            Err(e) => debug!("Fan speed unavailable: {}", e),
        }

        Ok(pwm)
    }

    /// Tick every `period` until `shutdown` fires.
    ///
    /// The first tick happens one full period after the call. Shutdown is
    /// only observed between ticks; a tick in progress always completes.
    /// Returns the loop once it has stopped.
    pub async fn run(mut self, period: Duration, mut shutdown: watch::Receiver<bool>) -> Self {
        info!("Control loop started with {}s interval", period.as_secs_f64());

        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            if *shutdown.borrow() {
                break;
            }

            tokio::select! {
                biased;
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        debug!("Shutdown sender dropped");
                    }
                    break;
                }
                _ = ticker.tick() => {
                    if let Err(e) = self.tick().await {
                        warn!("Control tick failed: {}", e);
                    }
                }
            }
        }

        info!("Control loop stopped at PWM {}", self.last_commanded_pwm());
        self
    }
}

/// Read the sensor, logging failures. `None` selects the fail-safe target.
async fn read_temperature<S: AttributeStore>(sensor: &TemperatureSensor<S>) -> Option<i64> {
    match sensor.read_temperature().await {
        Ok(temperature) => Some(temperature),
        Err(e) => {
            warn!("Temperature unavailable, using maximum PWM: {}", e);
            None
        }
    }
}
