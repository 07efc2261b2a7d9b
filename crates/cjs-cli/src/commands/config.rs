//! Configuration file commands

use std::path::PathBuf;

use clap::{Args, Subcommand};
use tracing::info;

use crate::config::CliConfig;
use crate::error::{CliError, CliResult};

#[derive(Args, Debug)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub sub: ConfigSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// Print the active configuration as TOML
    Show,
    /// Write a configuration file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the default configuration file path
    Path,
}

impl ConfigCommand {
    pub async fn execute(self, explicit: Option<PathBuf>) -> CliResult<()> {
        match self.sub {
            ConfigSubcommand::Show => {
                let config = CliConfig::resolve(explicit.as_deref())?;
                let text = toml::to_string_pretty(&config)
                    .map_err(|e| CliError::config(format!("Failed to serialize config: {}", e)))?;
                print!("{}", text);
                Ok(())
            }
            ConfigSubcommand::Init { force } => {
                let path = match explicit {
                    Some(path) => path,
                    None => CliConfig::default_config_path()?,
                };
                if path.exists() && !force {
                    return Err(CliError::invalid_args(format!(
                        "{} already exists (use --force to overwrite)",
                        path.display()
                    )));
                }
                CliConfig::default().save_to_file(&path)?;
                info!("Wrote {}", path.display());
                println!("{}", path.display());
                Ok(())
            }
            ConfigSubcommand::Path => {
                println!("{}", CliConfig::default_config_path()?.display());
                Ok(())
            }
        }
    }
}
