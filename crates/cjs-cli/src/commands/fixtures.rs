//! List fixture names

use std::path::{Path, PathBuf};

use clap::Args;
use cjs_harness::DEFAULT_FIXTURES;
use walkdir::WalkDir;

use crate::config::CliConfig;
use crate::error::{CliError, CliResult};

/// List fixture names
#[derive(Args, Debug)]
pub struct FixturesCommand {
    /// List the .txt circuits found under this directory instead
    #[arg(long)]
    pub dir: Option<PathBuf>,
}

impl FixturesCommand {
    pub async fn execute(self, config: &CliConfig) -> CliResult<()> {
        let names = match self.dir.as_deref().or(config.fixtures_dir.as_deref()) {
            Some(dir) => scan_dir(dir)?,
            None => match &config.fixtures {
                Some(list) => list.clone(),
                None => DEFAULT_FIXTURES.iter().map(|s| s.to_string()).collect(),
            },
        };
        for name in names {
            println!("{}", name);
        }
        Ok(())
    }
}

/// Relative paths of `*.txt` files under `dir`, sorted.
pub fn scan_dir(dir: &Path) -> CliResult<Vec<String>> {
    if !dir.is_dir() {
        return Err(CliError::missing_resource(format!(
            "fixture directory {}",
            dir.display()
        )));
    }

    let mut names = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| CliError::Io(e.into()))?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().map_or(true, |ext| ext != "txt") {
            continue;
        }
        if let Ok(rel) = path.strip_prefix(dir) {
            names.push(rel.to_string_lossy().replace('\\', "/"));
        }
    }
    Ok(names)
}
