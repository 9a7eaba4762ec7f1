//! Configuration types for ssdfan
//!
//! The daemon reads a single TOML file once at startup into [`StaticConfig`].
//! Every section and field has a default, so an absent file is equivalent to
//! an empty one.

mod paths;
mod static_config;

pub use paths::default_config_path;
pub use static_config::{ControlConfig, DeviceConfig, ShutdownConfig, StaticConfig};
