//! Configuration management for cjsrt
//!
//! Settings live in a TOML file (`cjsrt.toml`); command-line flags override
//! them. Every key is optional:
//!
//! ```toml
//! origin = "http://localhost:8080"
//! fixtures_dir = "tests/circuits"
//! fixtures = ["ohms.txt", "cap.txt"]
//!
//! [harness]
//! settle_ms = 100
//! poll_timeout_ms = 2000
//! call_timeout_ms = 10000
//! count_mismatch = "warn"
//!
//! [report]
//! max_diffs = 3
//! preview_chars = 80
//!
//! [launch]
//! nw_path = "/opt/nwjs/nw"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use cjs_harness::{CountMismatchPolicy, DriverConfig, SettlePolicy};
use serde::{Deserialize, Serialize};

use crate::error::{CliError, CliResult};

/// Origin fixtures are fetched from when nothing else is configured
pub const DEFAULT_ORIGIN: &str = "http://localhost:8080";

/// Global CLI configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// HTTP origin serving `/circuits/<name>`
    pub origin: Option<String>,

    /// Local directory of fixtures; preferred over `origin` when both are set
    pub fixtures_dir: Option<PathBuf>,

    /// Fixture list used by `run` when none are named
    pub fixtures: Option<Vec<String>>,

    /// Roundtrip settings
    pub harness: HarnessSettings,

    /// Console report settings
    pub report: ReportSettings,

    /// Debug launcher settings
    pub launch: LaunchSettings,
}

/// Roundtrip driver settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessSettings {
    /// Fixed settle delay after each import
    pub settle_ms: u64,

    /// Poll the engine instead of sleeping, giving up after this long
    pub poll_timeout_ms: Option<u64>,

    /// Delay between settle polls
    pub poll_interval_ms: u64,

    /// Upper bound for each engine call
    pub call_timeout_ms: Option<u64>,

    /// How element count mismatches are judged
    pub count_mismatch: CountMismatchPolicy,
}

impl Default for HarnessSettings {
    fn default() -> Self {
        Self {
            settle_ms: 100,
            poll_timeout_ms: None,
            poll_interval_ms: 10,
            call_timeout_ms: None,
            count_mismatch: CountMismatchPolicy::Fail,
        }
    }
}

impl HarnessSettings {
    /// Driver configuration for these settings
    pub fn driver_config(&self) -> DriverConfig {
        let settle = match self.poll_timeout_ms {
            Some(timeout) => SettlePolicy::Poll {
                interval: Duration::from_millis(self.poll_interval_ms.max(1)),
                timeout: Duration::from_millis(timeout),
            },
            None => SettlePolicy::Fixed(Duration::from_millis(self.settle_ms)),
        };
        DriverConfig {
            settle,
            call_timeout: self.call_timeout_ms.map(Duration::from_millis),
            count_mismatch: self.count_mismatch,
        }
    }
}

/// Console report settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// Differences listed per failed fixture
    pub max_diffs: usize,

    /// Characters shown per differing line
    pub preview_chars: usize,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            max_diffs: cjs_harness::report::DEFAULT_MAX_DIFFS,
            preview_chars: cjs_harness::report::DEFAULT_PREVIEW_CHARS,
        }
    }
}

/// Debug launcher settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchSettings {
    /// nw.js executable
    pub nw_path: Option<String>,
}

impl CliConfig {
    /// Load configuration from file
    pub fn load_from_file(path: &Path) -> CliResult<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content).map_err(|e| CliError::config(format!("Invalid config file: {}", e)))
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save_to_file(&self, path: &Path) -> CliResult<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| CliError::config(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path
    pub fn default_config_path() -> CliResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CliError::config("Could not determine config directory"))?;
        Ok(config_dir.join("cjsrt").join("config.toml"))
    }

    /// Resolve the active configuration.
    ///
    /// An explicit path must exist. Otherwise `./cjsrt.toml` is used when
    /// present, then the per-user file, then built-in defaults.
    pub fn resolve(explicit: Option<&Path>) -> CliResult<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(CliError::missing_resource(format!(
                    "config file {}",
                    path.display()
                )));
            }
            return Self::load_from_file(path);
        }

        let local = Path::new("cjsrt.toml");
        if local.exists() {
            return Self::load_from_file(local);
        }
        match Self::default_config_path() {
            Ok(path) => Self::load_from_file(&path),
            Err(_) => Ok(Self::default()),
        }
    }
}
