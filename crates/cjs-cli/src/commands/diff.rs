//! Compare two circuit text files with the roundtrip comparator.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use cjs_harness::compare;

use super::stdout_reporter;
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};

/// Compare two text-format circuit files
#[derive(Args, Debug)]
pub struct DiffCommand {
    /// Original circuit
    pub original: PathBuf,

    /// Candidate circuit
    pub candidate: PathBuf,

    /// Print the comparison report as JSON
    #[arg(long)]
    pub json: bool,
}

impl DiffCommand {
    pub async fn execute(self, config: &CliConfig) -> CliResult<()> {
        let original = std::fs::read_to_string(&self.original)
            .with_context(|| format!("reading {}", self.original.display()))?;
        let candidate = std::fs::read_to_string(&self.candidate)
            .with_context(|| format!("reading {}", self.candidate.display()))?;

        let report = compare(&original, &candidate);

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            println!("Identical: {}", report.identical);
            if !report.identical {
                stdout_reporter(config).all_differences(&report)?;
            }
        }

        if report.identical {
            Ok(())
        } else {
            Err(CliError::Differences(report.differences.len()))
        }
    }
}
