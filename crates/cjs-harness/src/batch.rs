//! Sequential batch runner.

use std::io;

use log::{info, warn};

use crate::driver::RoundtripDriver;
use crate::engine::CircuitEngine;
use crate::fixture::FixtureSource;
use crate::outcome::{BatchResult, FixtureOutcome};

/// Receives progress while a batch runs.
///
/// Write failures are logged by the runner and do not stop the batch.
pub trait BatchObserver {
    /// Called once before the first fixture
    fn batch_started(&mut self, _total: usize) -> io::Result<()> {
        Ok(())
    }

    /// Called before each fixture is loaded
    fn fixture_started(&mut self, _name: &str) -> io::Result<()> {
        Ok(())
    }

    /// Called with each fixture's outcome
    fn fixture_finished(&mut self, _outcome: &FixtureOutcome) -> io::Result<()> {
        Ok(())
    }

    /// Called once with the aggregate result
    fn batch_finished(&mut self, _result: &BatchResult) -> io::Result<()> {
        Ok(())
    }
}

/// Observer that discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl BatchObserver for NullObserver {}

/// Runs fixtures one after another through a single engine.
#[derive(Debug, Clone, Default)]
pub struct BatchRunner {
    driver: RoundtripDriver,
}

impl BatchRunner {
    /// Create a runner around a driver
    pub fn new(driver: RoundtripDriver) -> Self {
        Self { driver }
    }

    /// The per-fixture driver
    pub fn driver(&self) -> &RoundtripDriver {
        &self.driver
    }

    /// Run every named fixture in order.
    ///
    /// The engine is borrowed for the whole batch, so no two fixtures
    /// ever share it concurrently.
    pub async fn run_all<E, S, O>(
        &self,
        engine: &mut E,
        source: &S,
        names: &[String],
        observer: &mut O,
    ) -> BatchResult
    where
        E: CircuitEngine + ?Sized,
        S: FixtureSource + ?Sized,
        O: BatchObserver + ?Sized,
    {
        info!("running {} fixtures from {}", names.len(), source.describe());
        let mut result = BatchResult::new(names.len());
        notify(observer.batch_started(names.len()));

        for name in names {
            notify(observer.fixture_started(name));
            let outcome = self.run_fixture(engine, source, name).await;
            notify(observer.fixture_finished(&outcome));
            result.record(outcome);
        }

        info!(
            "batch finished: {} passed, {} failed, {} skipped",
            result.passed, result.failed, result.skipped
        );
        notify(observer.batch_finished(&result));
        result
    }

    /// Run one fixture by name.
    pub async fn run_single<E, S>(&self, engine: &mut E, source: &S, name: &str) -> FixtureOutcome
    where
        E: CircuitEngine + ?Sized,
        S: FixtureSource + ?Sized,
    {
        self.run_fixture(engine, source, name).await
    }

    async fn run_fixture<E, S>(&self, engine: &mut E, source: &S, name: &str) -> FixtureOutcome
    where
        E: CircuitEngine + ?Sized,
        S: FixtureSource + ?Sized,
    {
        match source.load(name).await {
            Ok(fixture) if fixture.text.is_empty() => {
                warn!("skipping {}: empty file", name);
                FixtureOutcome::skipped(name, "Could not load file")
            }
            Ok(fixture) => self.driver.run(engine, &fixture.text, &fixture.name).await,
            Err(err) => {
                warn!("skipping {}: {}", name, err);
                FixtureOutcome::skipped(name, "Could not load file")
            }
        }
    }
}

fn notify(result: io::Result<()>) {
    if let Err(err) = result {
        warn!("progress output failed: {}", err);
    }
}
