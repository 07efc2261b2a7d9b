//! CircuitJS1 roundtrip harness
//!
//! Purpose:
//! - Verify that a circuit engine's text → JSON → text roundtrip is lossless.
//!
//! Pipeline (see [driver]):
//! - import text, settle, count elements
//! - export JSON, validate it, clear the engine, import the JSON, settle
//! - export text and compare it with the original (see [compare])
//!
//! Pieces:
//! - [normalize]: canonicalizes long floating point literals so export drift
//!   in the last digits does not count as a difference.
//! - [engine]: the [`CircuitEngine`] seam plus [`DocumentEngine`], an
//!   in-process engine that stores documents without simulating them.
//! - [fixture]: HTTP, directory and in-memory fixture sources.
//! - [batch]: strictly sequential multi-fixture runs and success rates.
//! - [report]: console progress and summaries.
//!
//! Libraries log through `log`; binaries choose the subscriber.

pub mod batch;
pub mod compare;
pub mod driver;
pub mod engine;
pub mod error;
pub mod fixture;
pub mod normalize;
pub mod outcome;
pub mod policy;
pub mod report;

pub use batch::{BatchObserver, BatchRunner, NullObserver};
pub use compare::{compare, compare_lines, ComparisonReport, Difference};
pub use driver::{DriverConfig, RoundtripDriver};
pub use engine::{CircuitEngine, DocumentEngine, SerializedForm};
pub use error::{EngineError, EngineResult, HarnessError, Result};
pub use fixture::{
    default_fixture_names, DirectoryFixtures, Fixture, FixtureSource, HttpFixtures, InlineFixtures,
    DEFAULT_FIXTURES,
};
pub use normalize::{normalize_line, normalize_text, to_precision};
pub use outcome::{BatchResult, FailureKind, FixtureError, FixtureOutcome, FixtureStatus, StepLog};
pub use policy::{CountMismatchPolicy, SettlePolicy};
pub use report::ConsoleReporter;
