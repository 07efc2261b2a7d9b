//! CLI command implementations for cjsrt

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use cjs_harness::{
    ConsoleReporter, CountMismatchPolicy, DirectoryFixtures, DriverConfig, FixtureSource,
    HttpFixtures, SettlePolicy,
};
use tracing::debug;

use crate::config::{CliConfig, DEFAULT_ORIGIN};
use crate::error::CliResult;

pub mod completions;
pub mod config;
pub mod current;
pub mod diff;
pub mod fixtures;
pub mod launch;
pub mod run;
pub mod single;

/// cjsrt - text/JSON roundtrip verifier for CircuitJS1 circuits
#[derive(Parser, Debug)]
#[command(
    name = "cjsrt",
    version,
    about = "Text/JSON roundtrip verifier for CircuitJS1 circuits",
    long_about = "cjsrt loads CircuitJS1 circuit files, drives them through a circuit engine's \
                  text and JSON import/export, and reports whether the roundtripped text is \
                  equivalent to the original. It also launches the desktop app with debug logging."
)]
pub struct CjsCli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "CJSRT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Roundtrip a batch of fixtures (the built-in list by default)
    #[command(alias = "test")]
    Run(run::RunCommand),

    /// Roundtrip one fixture and show every difference
    Single(single::SingleCommand),

    /// Load a circuit file into the engine and roundtrip what it holds
    Current(current::CurrentCommand),

    /// Compare two text-format circuit files
    Diff(diff::DiffCommand),

    /// List fixture names
    #[command(alias = "ls")]
    Fixtures(fixtures::FixturesCommand),

    /// Launch the desktop app with debug logging
    Launch(launch::LaunchCommand),

    /// Show or write the configuration file
    Config(config::ConfigCommand),

    /// Generate shell completions
    Completions(completions::CompletionsCommand),
}

impl CjsCli {
    /// Default log filter for this invocation
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }

    /// Execute the CLI command
    pub async fn execute(self) -> CliResult<()> {
        if let Commands::Completions(cmd) = &self.command {
            return cmd.execute();
        }
        if let Commands::Config(cmd) = self.command {
            return cmd.execute(self.config).await;
        }

        let config = CliConfig::resolve(self.config.as_deref())?;
        debug!("configuration: {:?}", config);

        match self.command {
            Commands::Run(cmd) => cmd.execute(&config).await,
            Commands::Single(cmd) => cmd.execute(&config).await,
            Commands::Current(cmd) => cmd.execute(&config).await,
            Commands::Diff(cmd) => cmd.execute(&config).await,
            Commands::Fixtures(cmd) => cmd.execute(&config).await,
            Commands::Launch(cmd) => cmd.execute(&config).await,
            Commands::Config(_) | Commands::Completions(_) => Ok(()),
        }
    }
}

/// Where fixtures are loaded from
#[derive(Args, Debug, Clone, Default)]
pub struct SourceArgs {
    /// HTTP origin serving /circuits/<name>
    #[arg(long, env = "CJSRT_ORIGIN", conflicts_with = "dir")]
    pub origin: Option<String>,

    /// Local directory containing fixture files
    #[arg(long)]
    pub dir: Option<PathBuf>,
}

impl SourceArgs {
    /// Build the fixture source: flags first, then config, then the
    /// default origin.
    pub fn build(&self, config: &CliConfig) -> CliResult<Box<dyn FixtureSource>> {
        if let Some(dir) = &self.dir {
            return Ok(Box::new(DirectoryFixtures::new(dir)));
        }
        if let Some(origin) = &self.origin {
            return Ok(Box::new(HttpFixtures::new(origin.as_str())?));
        }
        if let Some(dir) = &config.fixtures_dir {
            return Ok(Box::new(DirectoryFixtures::new(dir)));
        }
        let origin = config.origin.as_deref().unwrap_or(DEFAULT_ORIGIN);
        Ok(Box::new(HttpFixtures::new(origin)?))
    }
}

/// Count mismatch handling, as accepted on the command line
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum CountMismatchArg {
    /// A count mismatch fails the fixture
    Fail,
    /// A count mismatch is only a warning
    Warn,
}

impl From<CountMismatchArg> for CountMismatchPolicy {
    fn from(arg: CountMismatchArg) -> Self {
        match arg {
            CountMismatchArg::Fail => CountMismatchPolicy::Fail,
            CountMismatchArg::Warn => CountMismatchPolicy::Warn,
        }
    }
}

/// Roundtrip timing and judgement overrides
#[derive(Args, Debug, Clone, Default)]
pub struct HarnessArgs {
    /// Fixed settle delay after each import, in milliseconds
    #[arg(long, value_name = "MS")]
    pub settle_ms: Option<u64>,

    /// Poll the engine until settled, giving up after this many milliseconds
    #[arg(long, value_name = "MS")]
    pub poll_timeout_ms: Option<u64>,

    /// Upper bound for each engine call, in milliseconds
    #[arg(long, value_name = "MS")]
    pub call_timeout_ms: Option<u64>,

    /// What an element count mismatch means
    #[arg(long, value_enum)]
    pub count_mismatch: Option<CountMismatchArg>,
}

impl HarnessArgs {
    /// Driver configuration with flag overrides applied
    pub fn driver_config(&self, config: &CliConfig) -> DriverConfig {
        let mut driver = config.harness.driver_config();
        if let Some(ms) = self.settle_ms {
            driver.settle = SettlePolicy::Fixed(Duration::from_millis(ms));
        }
        if let Some(ms) = self.poll_timeout_ms {
            driver.settle = SettlePolicy::Poll {
                interval: Duration::from_millis(config.harness.poll_interval_ms.max(1)),
                timeout: Duration::from_millis(ms),
            };
        }
        if let Some(ms) = self.call_timeout_ms {
            driver.call_timeout = Some(Duration::from_millis(ms));
        }
        if let Some(policy) = self.count_mismatch {
            driver.count_mismatch = policy.into();
        }
        driver
    }
}

/// Console reporter on stdout with configured limits
pub fn stdout_reporter(config: &CliConfig) -> ConsoleReporter<std::io::Stdout> {
    ConsoleReporter::stdout()
        .with_max_diffs(config.report.max_diffs)
        .with_preview_chars(config.report.preview_chars)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        CjsCli::command().debug_assert();
    }

    #[test]
    fn flags_override_config() {
        let config = CliConfig::default();
        let args = HarnessArgs {
            settle_ms: Some(5),
            call_timeout_ms: Some(250),
            count_mismatch: Some(CountMismatchArg::Warn),
            ..Default::default()
        };
        let driver = args.driver_config(&config);
        assert_eq!(driver.settle, SettlePolicy::Fixed(Duration::from_millis(5)));
        assert_eq!(driver.call_timeout, Some(Duration::from_millis(250)));
        assert_eq!(driver.count_mismatch, CountMismatchPolicy::Warn);
    }

    #[test]
    fn poll_flag_wins_over_settle_flag() {
        let args = HarnessArgs {
            settle_ms: Some(5),
            poll_timeout_ms: Some(1000),
            ..Default::default()
        };
        assert!(matches!(
            args.driver_config(&CliConfig::default()).settle,
            SettlePolicy::Poll { .. }
        ));
    }

    #[test]
    fn verbose_lowers_the_filter() {
        let cli = CjsCli::parse_from(["cjsrt", "-v", "fixtures"]);
        assert_eq!(cli.log_filter(), "debug");
        let cli = CjsCli::parse_from(["cjsrt", "fixtures"]);
        assert_eq!(cli.log_filter(), "info");
    }
}
