//! Debug launcher for the CircuitJS1 desktop app
//!
//! Example:
//!   cjsrt launch devmode
//!   cjsrt launch --level verbose gwt
//!   cjsrt launch --level full release
//!
//! Notes:
//! - devmode and gwt run the nw.js executable on a site directory followed by
//!   the Chromium logging flags of the chosen level.
//! - release runs the packaged binary without flags (it ignores them) and sets
//!   debug environment variables instead.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use clap::{Args, ValueEnum};
use tokio::process::Command;
use tracing::{debug, info};

use crate::config::CliConfig;
use crate::error::{CliError, CliResult};

/// Packaged release executable, relative to the project root
pub const RELEASE_EXECUTABLE: &str = "./out/linux-x64/CircuitJS1 Desktop Mod/CircuitSimulator";

/// Chromium logging flag sets
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum DebugLevel {
    Basic,
    Verbose,
    Full,
    Gpu,
    Network,
}

impl DebugLevel {
    /// Flags passed to nw.js for this level
    pub fn flags(self) -> &'static [&'static str] {
        match self {
            DebugLevel::Basic => &["--enable-logging", "--v=1", "--log-level=0"],
            DebugLevel::Verbose => &[
                "--enable-logging",
                "--v=2",
                "--log-level=0",
                "--enable-logging=stderr",
            ],
            DebugLevel::Full => &[
                "--enable-logging",
                "--v=3",
                "--log-level=0",
                "--enable-logging=stderr",
                "--vmodule=*=3",
            ],
            DebugLevel::Gpu => &[
                "--enable-logging",
                "--v=1",
                "--log-level=0",
                "--enable-gpu-debug-layer",
                "--enable-gpu-service-logging",
            ],
            DebugLevel::Network => &[
                "--enable-logging",
                "--v=1",
                "--log-level=0",
                "--log-net-log",
                "--net-log-capture-mode=Everything",
            ],
        }
    }
}

impl fmt::Display for DebugLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DebugLevel::Basic => "basic",
            DebugLevel::Verbose => "verbose",
            DebugLevel::Full => "full",
            DebugLevel::Gpu => "gpu",
            DebugLevel::Network => "network",
        };
        f.write_str(name)
    }
}

/// What to launch
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LaunchTarget {
    /// Development mode site (./scripts/devmode)
    Devmode,
    /// Built GWT site (./target/site)
    Gwt,
    /// Packaged release build
    Release,
}

impl fmt::Display for LaunchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LaunchTarget::Devmode => "devmode",
            LaunchTarget::Gwt => "gwt",
            LaunchTarget::Release => "release",
        };
        f.write_str(name)
    }
}

/// A fully resolved process to start
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
}

impl LaunchPlan {
    /// Resolve the plan for a target and level
    pub fn build(target: LaunchTarget, level: DebugLevel, nw: &str) -> Self {
        let flags = level.flags().iter().map(|f| f.to_string());
        match target {
            LaunchTarget::Devmode => Self {
                program: PathBuf::from(nw),
                args: std::iter::once("./scripts/devmode".to_string()).chain(flags).collect(),
                env: Vec::new(),
            },
            LaunchTarget::Gwt => Self {
                program: PathBuf::from(nw),
                args: std::iter::once("./target/site".to_string()).chain(flags).collect(),
                env: Vec::new(),
            },
            LaunchTarget::Release => Self {
                program: PathBuf::from(RELEASE_EXECUTABLE),
                args: Vec::new(),
                env: [("NWJS_DEBUG", "1"), ("DEBUG", "*"), ("NODE_DEBUG", "*")]
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            },
        }
    }
}

/// Launch the desktop app with debug logging
#[derive(Args, Debug)]
pub struct LaunchCommand {
    /// Target to launch
    #[arg(value_enum)]
    pub target: LaunchTarget,

    /// Debug level
    #[arg(long, value_enum, default_value = "basic")]
    pub level: DebugLevel,

    /// nw.js executable
    #[arg(long, env = "NW_PATH")]
    pub nw: Option<String>,

    /// Print the plan without starting anything
    #[arg(long)]
    pub dry_run: bool,
}

impl LaunchCommand {
    pub async fn execute(self, config: &CliConfig) -> CliResult<()> {
        let nw = self
            .nw
            .clone()
            .or_else(|| config.launch.nw_path.clone())
            .unwrap_or_else(|| "nw".to_string());
        let plan = LaunchPlan::build(self.target, self.level, &nw);

        println!("Starting {} with debug level: {}", self.target, self.level);
        println!("Debug arguments: {}", self.level.flags().join(" "));
        println!("---");

        if self.dry_run {
            let line: Vec<String> = plan
                .env
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .chain(std::iter::once(plan.program.display().to_string()))
                .chain(plan.args.iter().cloned())
                .collect();
            println!("{}", line.join(" "));
            return Ok(());
        }

        if self.target == LaunchTarget::Release && !Path::new(&plan.program).exists() {
            return Err(CliError::missing_resource(format!(
                "Release executable not found at: {} (build the release version first)",
                plan.program.display()
            )));
        }

        if self.target == LaunchTarget::Release {
            info!("Release builds ignore Chromium flags; using debug environment variables");
        }
        debug!("spawning {:?}", plan);

        let mut child = Command::new(&plan.program)
            .args(&plan.args)
            .envs(plan.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| CliError::launch(format!("Error starting process: {}", e)))?;

        let status = child.wait().await?;
        match status.code() {
            Some(code) => println!("\n--- Process exited with code: {}", code),
            None => println!("\n--- Process terminated by signal"),
        }
        Ok(())
    }
}
