//! ssdfan Core Library
//!
//! Shared types, control policy and configuration for the ssdfan controller.
//! This crate is used by both the hardware layer and the daemon.

pub mod config;
pub mod error;
pub mod policy;
pub mod types;

// Re-export commonly used types
pub use config::{default_config_path, StaticConfig};
pub use error::*;
pub use policy::{compute_target_pwm, ControllerState, SlewLimiter, TemperatureRange};
pub use types::*;
