//! cjsrt CLI crate
//!
//! Purpose:
//! - Command-line front end for the CircuitJS1 roundtrip harness.
//! - Expose the command modules as a library so tests and automation can
//!   drive them without spawning a process.
//!
//! Commands (see [commands]):
//! - run / single / current: roundtrip fixtures through the document engine
//!   and print progress plus a summary; `run --json` also writes the batch
//!   result for other tools.
//! - diff: compare two text files with the same normalizing comparator.
//! - fixtures: list the built-in circuits or the `.txt` files of a directory.
//! - launch: start the desktop app with Chromium debug logging.
//! - config / completions: housekeeping.
//!
//! Notes:
//! - The binary (src/main.rs) wires up logging and argument parsing, then
//!   calls `CjsCli::execute()`. Report lines go to stdout, logs to stderr.

pub mod commands;
pub mod config;
pub mod error;

pub use commands::CjsCli;
pub use config::CliConfig;
pub use error::{CliError, CliResult};
