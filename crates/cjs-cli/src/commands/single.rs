//! Single fixture command

use clap::Args;
use cjs_harness::{BatchRunner, DocumentEngine, FixtureStatus, RoundtripDriver};

use super::{stdout_reporter, HarnessArgs, SourceArgs};
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};

/// Roundtrip one fixture and show every difference
#[derive(Args, Debug)]
pub struct SingleCommand {
    /// Fixture name, e.g. ohms.txt
    pub fixture: String,

    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub harness: HarnessArgs,
}

impl SingleCommand {
    pub async fn execute(self, config: &CliConfig) -> CliResult<()> {
        let source = self.source.build(config)?;
        let runner = BatchRunner::new(RoundtripDriver::new(self.harness.driver_config(config)));
        let mut engine = DocumentEngine::new();

        let outcome = runner
            .run_single(&mut engine, source.as_ref(), &self.fixture)
            .await;

        match outcome.status {
            FixtureStatus::Skipped => Err(CliError::missing_resource(format!(
                "could not load {} from {}",
                self.fixture,
                source.describe()
            ))),
            FixtureStatus::Failed => {
                stdout_reporter(config).single(&outcome)?;
                Err(CliError::FixturesFailed {
                    failed: 1,
                    total: 1,
                })
            }
            FixtureStatus::Passed => {
                stdout_reporter(config).single(&outcome)?;
                Ok(())
            }
        }
    }
}
