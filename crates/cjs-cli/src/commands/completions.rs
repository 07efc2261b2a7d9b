//! Shell completion generation

use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};

use super::CjsCli;
use crate::error::CliResult;

/// Generate shell completions on stdout
#[derive(Args, Debug)]
pub struct CompletionsCommand {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,
}

impl CompletionsCommand {
    pub fn execute(&self) -> CliResult<()> {
        let mut command = CjsCli::command();
        generate(self.shell, &mut command, "cjsrt", &mut std::io::stdout());
        Ok(())
    }
}
