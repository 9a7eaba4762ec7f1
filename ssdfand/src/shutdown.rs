//! Shutdown handling for graceful daemon termination
//!
//! The main task waits for a termination signal, stops the control loop and
//! only then writes the original fan mode back, so the worker can never
//! re-assert manual mode after restoration.

use crate::control::FanLoop;
use ssdfan_core::FanMode;
use ssdfan_hardware::{AttributeStore, FanController};
use std::future::Future;
use std::time::Duration;
use tokio::signal::unix::{signal, Signal, SignalKind};
use tokio::sync::watch;
use tracing::{error, info};

/// Termination signals handled by the daemon
pub struct ShutdownSignals {
    terminate: Signal,
    interrupt: Signal,
    quit: Signal,
    hangup: Signal,
}

impl ShutdownSignals {
    /// Register handlers for SIGTERM, SIGINT, SIGQUIT and SIGHUP.
    pub fn install() -> std::io::Result<Self> {
        Ok(Self {
            terminate: signal(SignalKind::terminate())?,
            interrupt: signal(SignalKind::interrupt())?,
            quit: signal(SignalKind::quit())?,
            hangup: signal(SignalKind::hangup())?,
        })
    }

    /// Wait until any of the signals is delivered.
    pub async fn recv(mut self) {
        let name = tokio::select! {
            _ = self.terminate.recv() => "SIGTERM",
            _ = self.interrupt.recv() => "SIGINT",
            _ = self.quit.recv() => "SIGQUIT",
            _ = self.hangup.recv() => "SIGHUP",
        };
        info!("Received {}, shutting down gracefully...", name);
    }
}

/// Write the original fan mode back.
///
/// Failures are logged only; the daemon is exiting either way.
pub async fn restore_fan_mode<G: AttributeStore>(
    fan: &FanController<G>,
    mode: FanMode,
    enabled: bool,
) {
    if !enabled {
        info!("Fan mode restoration disabled in config");
        return;
    }

    info!("Restoring fan mode {}...", mode);

    match fan.set_fan_mode(mode).await {
        Ok(_) => info!("Fan mode restored"),
        Err(e) => error!("Failed to restore fan mode: {}", e),
    }
}

/// Run the control loop in its own task until `shutdown` completes, then
/// stop it and restore the fan mode.
///
/// Restoration goes through a handle kept by the caller, so it still happens
/// if the worker task panicked.
pub async fn run_until_shutdown<G, S, F>(
    fan_loop: FanLoop<G, S>,
    period: Duration,
    restore_mode: bool,
    shutdown: F,
) where
    G: AttributeStore + Clone + 'static,
    S: AttributeStore + 'static,
    F: Future<Output = ()>,
{
    let original_mode = fan_loop.original_mode();
    let fan = fan_loop.fan().clone();

    let (stop_tx, stop_rx) = watch::channel(false);
    let worker = tokio::spawn(fan_loop.run(period, stop_rx));

    shutdown.await;

    // Receiver is only gone if the worker already exited
    let _ = stop_tx.send(true);

    if let Err(e) = worker.await {
        error!("Control loop task failed: {}", e);
    }

    restore_fan_mode(&fan, original_mode, restore_mode).await;
}
