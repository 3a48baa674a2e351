use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{CvaultError, CvaultResult};
use crate::version::BackupVersion;

/// Top-level configuration (loaded from cvault.toml)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CvaultConfig {
    pub logging: LoggingConfig,
    pub restore: RestoreConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (default: info)
    pub level: String,
    /// Log format: "json" or "text"
    pub format: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestoreConfig {
    /// Worker thread count (0 = cpu_count)
    pub workers: usize,
    /// Backups at or after this version always carry a location ref
    pub location_ref_version: BackupVersion,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "text".into(),
        }
    }
}

impl Default for RestoreConfig {
    fn default() -> Self {
        Self {
            workers: 0,
            location_ref_version: BackupVersion::ONE_DRIVE_7_LOCATION_REF,
        }
    }
}

impl CvaultConfig {
    /// Load from a TOML file. A missing file yields the defaults.
    pub fn load(path: &Path) -> CvaultResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
            .map_err(|e| CvaultError::Config(format!("parsing {}: {e}", path.display())))
    }

    pub fn from_toml(s: &str) -> CvaultResult<Self> {
        toml::from_str(s).map_err(|e| CvaultError::Config(e.to_string()))
    }

    pub fn to_toml(&self) -> CvaultResult<String> {
        toml::to_string(self).map_err(|e| CvaultError::Config(e.to_string()))
    }

    /// Worker count with 0 resolved to the available parallelism.
    pub fn restore_workers(&self) -> usize {
        match self.restore.workers {
            0 => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            n => n,
        }
    }
}
