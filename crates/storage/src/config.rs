//! Store configuration via `slap.toml`
//!
//! On first open a default `slap.toml` is written into the data directory.
//! To change settings, edit the file and reopen the store.

use std::path::Path;

use serde::{Deserialize, Serialize};
use slap_core::{Error, Result};

/// Config file name placed in the data directory
pub const CONFIG_FILE_NAME: &str = "slap.toml";

/// How hard a commit works to reach the disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurabilityMode {
    /// Every commit is fsynced before it returns
    Standard,
    /// Fsync plus two-phase commit with checksum verification
    Always,
}

/// Store configuration loaded from `slap.toml`
///
/// # Example
///
/// ```toml
/// durability = "standard"
/// cache_size_mb = 64
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Durability mode: `"standard"` or `"always"`
    #[serde(default = "default_durability_str")]
    pub durability: String,
    /// Page cache size for the redb engine, in MiB
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_size_mb: Option<usize>,
}

fn default_durability_str() -> String {
    "standard".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            durability: default_durability_str(),
            cache_size_mb: None,
        }
    }
}

impl StoreConfig {
    /// Parse the durability string
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the string is not `"standard"` or `"always"`.
    pub fn durability_mode(&self) -> Result<DurabilityMode> {
        match self.durability.as_str() {
            "standard" => Ok(DurabilityMode::Standard),
            "always" => Ok(DurabilityMode::Always),
            other => Err(Error::Config(format!(
                "invalid durability mode '{}', expected \"standard\" or \"always\"",
                other
            ))),
        }
    }

    /// Cache size in bytes, if configured
    pub fn cache_size_bytes(&self) -> Option<usize> {
        self.cache_size_mb.map(|mb| mb.saturating_mul(1024 * 1024))
    }

    /// Default config file content with comments
    pub fn default_toml() -> &'static str {
        r#"# slapdb store configuration
#
# Durability mode: "standard" (default) or "always"
#   "standard" = fsync on every commit
#   "always"   = fsync plus two-phase commit with checksum verification
durability = "standard"

# Page cache for the on-disk engine, in MiB (engine default when unset)
# cache_size_mb = 64
"#
    }

    /// Read and parse config from a file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or names an
    /// unknown durability mode.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: StoreConfig = toml::from_str(&content).map_err(|e| {
            Error::Config(format!(
                "failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        config.durability_mode()?;
        Ok(config)
    }

    /// Write the default config file if it does not already exist
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml())?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to `path`
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
