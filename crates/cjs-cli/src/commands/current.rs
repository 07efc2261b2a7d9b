//! Current circuit command
//!
//! Loads a circuit file (text or JSON) into the engine first, then
//! roundtrips whatever the engine holds, using the engine's own text export
//! as the original.

use std::path::PathBuf;

use clap::Args;
use cjs_harness::{DocumentEngine, RoundtripDriver, SerializedForm};
use tracing::info;

use super::{stdout_reporter, HarnessArgs};
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};

/// Roundtrip the circuit currently loaded in the engine
#[derive(Args, Debug)]
pub struct CurrentCommand {
    /// Circuit file to load (text or JSON)
    pub file: PathBuf,

    #[command(flatten)]
    pub harness: HarnessArgs,
}

impl CurrentCommand {
    pub async fn execute(self, config: &CliConfig) -> CliResult<()> {
        if !self.file.exists() {
            return Err(CliError::missing_resource(self.file.display().to_string()));
        }
        let form = SerializedForm::detect(std::fs::read_to_string(&self.file)?);
        let kind = match form {
            SerializedForm::Text(_) => "text",
            SerializedForm::Json(_) => "JSON",
        };
        info!("Loading {} as {}", self.file.display(), kind);

        let mut engine = DocumentEngine::new();
        form.load_into(&mut engine).await?;

        let name = self
            .file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "current".to_string());
        let driver = RoundtripDriver::new(self.harness.driver_config(config));
        let outcome = driver.run_current(&mut engine, &name).await;

        stdout_reporter(config).current(&outcome)?;
        if outcome.passed() {
            Ok(())
        } else {
            Err(CliError::FixturesFailed {
                failed: 1,
                total: 1,
            })
        }
    }
}
