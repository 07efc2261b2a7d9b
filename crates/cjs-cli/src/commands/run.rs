//! Batch roundtrip command
//!
//! Example:
//!   cjsrt run --dir ./circuits
//!   cjsrt run ohms.txt cap.txt --origin http://localhost:8080 --json results.json

use std::path::PathBuf;

use clap::Args;
use cjs_harness::{default_fixture_names, BatchRunner, DocumentEngine, RoundtripDriver};
use tracing::info;

use super::{stdout_reporter, HarnessArgs, SourceArgs};
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};

/// Roundtrip a batch of fixtures
#[derive(Args, Debug)]
pub struct RunCommand {
    /// Fixture names; defaults to the configured list or the built-in circuits
    pub fixtures: Vec<String>,

    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub harness: HarnessArgs,

    /// Write the machine-readable batch result to this file
    #[arg(long, value_name = "PATH")]
    pub json: Option<PathBuf>,
}

impl RunCommand {
    pub async fn execute(self, config: &CliConfig) -> CliResult<()> {
        let names = if !self.fixtures.is_empty() {
            self.fixtures.clone()
        } else if let Some(list) = &config.fixtures {
            list.clone()
        } else {
            default_fixture_names()
        };

        let source = self.source.build(config)?;
        let runner = BatchRunner::new(RoundtripDriver::new(self.harness.driver_config(config)));
        let mut engine = DocumentEngine::new();
        let mut reporter = stdout_reporter(config);

        info!("Fixture source: {}", source.describe());
        let result = runner
            .run_all(&mut engine, source.as_ref(), &names, &mut reporter)
            .await;

        if let Some(path) = &self.json {
            let body = serde_json::to_string_pretty(&result)?;
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, body)?;
            info!("Batch result written to {}", path.display());
        }

        if result.has_failures() {
            return Err(CliError::FixturesFailed {
                failed: result.failed,
                total: result.total,
            });
        }
        Ok(())
    }
}
