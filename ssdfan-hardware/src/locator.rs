//! hwmon device discovery
//!
//! Expands the configured candidate glob, reads each candidate's `name`
//! attribute, and picks the first GPU and the first SSD by name prefix.

use crate::attribute::Attribute;
use ssdfan_core::config::DeviceConfig;
use ssdfan_core::{Result, SsdFanError};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Base directories of the two devices the controller drives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevicePaths {
    /// hwmon directory of the GPU fan controller
    pub gpu: PathBuf,
    /// hwmon directory of the SSD temperature sensor
    pub ssd: PathBuf,
}

/// Match a file name against a pattern with at most one `*` wildcard.
fn matches_pattern(pattern: &str, name: &str) -> bool {
    match pattern.split_once('*') {
        Some((prefix, suffix)) => {
            name.len() >= prefix.len() + suffix.len()
                && name.starts_with(prefix)
                && name.ends_with(suffix)
        }
        None => pattern == name,
    }
}

/// List candidate directories matching `glob`, sorted by path.
async fn expand_glob(glob: &str) -> Result<Vec<PathBuf>> {
    let glob_path = Path::new(glob);
    let pattern = glob_path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| SsdFanError::Discovery(format!("Invalid candidate glob '{}'", glob)))?;
    let parent = glob_path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut entries = fs::read_dir(parent).await.map_err(|e| {
        SsdFanError::Discovery(format!("Failed to list {}: {}", parent.display(), e))
    })?;

    let mut candidates = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(|e| {
        SsdFanError::Discovery(format!("Failed to list {}: {}", parent.display(), e))
    })? {
        let name = entry.file_name();
        if matches_pattern(pattern, &name.to_string_lossy()) {
            candidates.push(entry.path());
        }
    }

    candidates.sort();
    Ok(candidates)
}

/// Locate the GPU and SSD hwmon directories.
///
/// The glob is checked first, so an unsupported wildcard is reported as a
/// configuration error rather than a missing device. Candidates whose
/// `name` cannot be read are skipped. Fails with
/// [`SsdFanError::DeviceNotFound`] if either device is missing after all
/// candidates have been checked.
pub async fn locate_devices(config: &DeviceConfig) -> Result<DevicePaths> {
    config.check_glob()?;
    debug!("Searching for hwmon devices in {}", config.hwmon_glob);

    let mut gpu: Option<PathBuf> = None;
    let mut ssd: Option<PathBuf> = None;

    for candidate in expand_glob(&config.hwmon_glob).await? {
        if gpu.is_some() && ssd.is_some() {
            break;
        }

        let name = match fs::read_to_string(candidate.join(Attribute::Name.file_name())).await {
            Ok(name) => name,
            Err(e) => {
                debug!("Skipping {}: {}", candidate.display(), e);
                continue;
            }
        };
        let name = name.trim();
        debug!("Checking {}: name={}", candidate.display(), name);

        if gpu.is_none() && name.starts_with(&config.gpu_name) {
            info!("Found GPU '{}' at {}", name, candidate.display());
            gpu = Some(candidate.clone());
        }
        if ssd.is_none() && name.starts_with(&config.ssd_name) {
            info!("Found SSD '{}' at {}", name, candidate.display());
            ssd = Some(candidate);
        }
    }

    let gpu = gpu.ok_or_else(|| {
        SsdFanError::DeviceNotFound(format!("GPU (name starting with '{}')", config.gpu_name))
    })?;
    let ssd = ssd.ok_or_else(|| {
        SsdFanError::DeviceNotFound(format!("SSD (name starting with '{}')", config.ssd_name))
    })?;

    Ok(DevicePaths { gpu, ssd })
}
