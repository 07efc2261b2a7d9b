//! Single-fixture roundtrip driver.
//!
//! text import → settle → count → JSON export → clear → JSON import →
//! settle → count → text export → compare. Steps run in order with no
//! retries; the first hard failure short-circuits the rest. Engine errors
//! are recorded on the outcome and never escape [`RoundtripDriver::run`].

use std::fmt;
use std::future::Future;
use std::time::Duration;

use log::{debug, info, warn};
use tokio::time::{sleep, Instant};

use crate::compare::compare;
use crate::engine::CircuitEngine;
use crate::error::EngineResult;
use crate::outcome::{FailureKind, FixtureError, FixtureOutcome, FixtureStatus};
use crate::policy::{CountMismatchPolicy, SettlePolicy};

/// Driver configuration
#[derive(Debug, Clone, Default)]
pub struct DriverConfig {
    /// Wait strategy after imports
    pub settle: SettlePolicy,
    /// Upper bound for each engine call
    pub call_timeout: Option<Duration>,
    /// How element count mismatches are judged
    pub count_mismatch: CountMismatchPolicy,
}

#[derive(Debug, Clone, Copy)]
enum Step {
    ImportText,
    ElementCount,
    ExportJson,
    Clear,
    ImportJson,
    ExportText,
    Settle,
}

impl Step {
    fn failure_kind(self) -> FailureKind {
        match self {
            Step::ImportText | Step::ImportJson | Step::Settle => FailureKind::ImportFailure,
            Step::ExportJson | Step::ExportText | Step::ElementCount => FailureKind::ExportFailure,
            Step::Clear => FailureKind::ClearFailed,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::ImportText => "importCircuit",
            Step::ElementCount => "elementCount",
            Step::ExportJson => "exportAsJson",
            Step::Clear => "clearCircuit",
            Step::ImportJson => "importFromJson",
            Step::ExportText => "exportCircuit",
            Step::Settle => "isSettled",
        };
        f.write_str(name)
    }
}

/// Runs one fixture through the engine.
#[derive(Debug, Clone, Default)]
pub struct RoundtripDriver {
    config: DriverConfig,
}

impl RoundtripDriver {
    /// Create a driver
    pub fn new(config: DriverConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Roundtrip `text` through `engine` and judge the result.
    pub async fn run<E>(&self, engine: &mut E, text: &str, name: &str) -> FixtureOutcome
    where
        E: CircuitEngine + ?Sized,
    {
        let mut outcome = FixtureOutcome::new(name);
        debug!("roundtrip start: {}", name);

        if let Err(err) = self.roundtrip(engine, text, &mut outcome).await {
            debug!("{}: {:?} {}", name, err.kind, err.message);
            outcome.errors.push(err);
        }

        outcome.status = if outcome.errors.is_empty() {
            FixtureStatus::Passed
        } else {
            FixtureStatus::Failed
        };
        info!("{}: {:?}", name, outcome.status);
        outcome
    }

    /// Roundtrip whatever the engine currently holds. The engine's own text
    /// export serves as the original.
    pub async fn run_current<E>(&self, engine: &mut E, name: &str) -> FixtureOutcome
    where
        E: CircuitEngine + ?Sized,
    {
        match self.call(Step::ExportText, engine.export_text()).await {
            Ok(text) => self.run(engine, &text, name).await,
            Err(err) => {
                let mut outcome = FixtureOutcome::new(name);
                outcome.errors.push(err);
                outcome
            }
        }
    }

    async fn roundtrip<E>(
        &self,
        engine: &mut E,
        text: &str,
        outcome: &mut FixtureOutcome,
    ) -> Result<(), FixtureError>
    where
        E: CircuitEngine + ?Sized,
    {
        outcome.steps.text_size = Some(text.len());
        self.call(Step::ImportText, engine.import_text(text, false)).await?;
        outcome.steps.import_text = true;
        self.settle(engine).await?;

        let initial = self.call(Step::ElementCount, engine.element_count()).await?;
        outcome.steps.element_count_initial = Some(initial);

        let json = self.call(Step::ExportJson, engine.export_json()).await?;
        outcome.steps.export_json = true;
        outcome.steps.json_size = Some(json.len());

        let parsed: serde_json::Value = serde_json::from_str(&json).map_err(|e| {
            FixtureError::new(FailureKind::InvalidJson, format!("Invalid JSON: {}", e))
        })?;
        outcome.steps.json_valid = true;
        outcome.steps.json_element_count = parsed
            .get("elements")
            .and_then(|e| e.as_object())
            .map(|m| m.len());

        self.call(Step::Clear, engine.clear()).await?;
        let remaining = self.call(Step::ElementCount, engine.element_count()).await?;
        if remaining != 0 {
            return Err(FixtureError::new(
                FailureKind::ClearFailed,
                format!("Clear failed: {} elements remaining", remaining),
            ));
        }
        outcome.steps.clear = true;

        self.call(Step::ImportJson, engine.import_json(&json)).await?;
        outcome.steps.import_json = true;
        self.settle(engine).await?;

        let after = self.call(Step::ElementCount, engine.element_count()).await?;
        outcome.steps.element_count_after_json = Some(after);
        if after != initial {
            let err = FixtureError::new(
                FailureKind::ElementCountMismatch,
                format!("Element count mismatch: {} vs {}", initial, after),
            );
            match self.config.count_mismatch {
                CountMismatchPolicy::Fail => outcome.errors.push(err),
                CountMismatchPolicy::Warn => {
                    warn!("{}: {}", outcome.name, err.message);
                    outcome.warnings.push(err);
                }
            }
        }

        let exported = self.call(Step::ExportText, engine.export_text()).await?;
        outcome.steps.export_text = true;

        let report = compare(text, &exported);
        outcome.steps.comparison = true;
        if !report.identical {
            outcome.errors.push(FixtureError::new(
                FailureKind::TextMismatch,
                format!("Text format differences: {} lines differ", report.differences.len()),
            ));
        }
        outcome.comparison = Some(report);
        Ok(())
    }

    async fn settle<E>(&self, engine: &mut E) -> Result<(), FixtureError>
    where
        E: CircuitEngine + ?Sized,
    {
        match self.config.settle {
            SettlePolicy::Fixed(delay) => {
                if !delay.is_zero() {
                    sleep(delay).await;
                }
                Ok(())
            }
            SettlePolicy::Poll { interval, timeout } => {
                let deadline = Instant::now() + timeout;
                loop {
                    if self.call(Step::Settle, engine.is_settled()).await? {
                        return Ok(());
                    }
                    if Instant::now() >= deadline {
                        return Err(FixtureError::new(
                            FailureKind::Timeout,
                            format!("Engine did not settle within {} ms", timeout.as_millis()),
                        ));
                    }
                    sleep(interval).await;
                }
            }
        }
    }

    async fn call<T, F>(&self, step: Step, call: F) -> Result<T, FixtureError>
    where
        F: Future<Output = EngineResult<T>>,
    {
        let result = match self.config.call_timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(result) => result,
                Err(_) => {
                    return Err(FixtureError::new(
                        FailureKind::Timeout,
                        format!("{} timed out after {} ms", step, limit.as_millis()),
                    ))
                }
            },
            None => call.await,
        };
        result.map_err(|e| FixtureError::new(step.failure_kind(), format!("{}: {}", step, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::Difference;
    use crate::error::EngineError;
    use async_trait::async_trait;

    const TEXT: &str = "$ 1 0.000005 10.20027730826997 50 5 43\nr 176 80 384 80 0 10\nw 176 80 176 352 0\n";

    /// Stores text verbatim; JSON wraps it. Knobs inject the failure modes.
    #[derive(Default)]
    struct MockEngine {
        text: String,
        calls: Vec<&'static str>,
        bad_json: bool,
        clear_leaves: usize,
        drop_lines_on_json_import: usize,
        rewrite_on_json_import: Option<String>,
        count_after_json: Option<usize>,
        json_imported: bool,
        hang_on_export_json: bool,
        settle_after_polls: Option<usize>,
        polls: usize,
        fail_import: bool,
    }

    fn count(text: &str) -> usize {
        text.lines()
            .filter(|l| !l.trim().is_empty() && !l.starts_with('$'))
            .count()
    }

    #[async_trait]
    impl CircuitEngine for MockEngine {
        async fn import_text(&mut self, text: &str, _merge: bool) -> EngineResult<()> {
            self.calls.push("import_text");
            if self.fail_import {
                return Err(EngineError::import("unrecognized dump type"));
            }
            self.text = text.to_string();
            self.json_imported = false;
            self.polls = 0;
            Ok(())
        }

        async fn export_json(&mut self) -> EngineResult<String> {
            self.calls.push("export_json");
            if self.hang_on_export_json {
                sleep(Duration::from_secs(30)).await;
            }
            if self.bad_json {
                return Ok("{not json".to_string());
            }
            Ok(serde_json::json!({ "elements": {}, "text": self.text }).to_string())
        }

        async fn export_text(&mut self) -> EngineResult<String> {
            self.calls.push("export_text");
            Ok(self.text.clone())
        }

        async fn clear(&mut self) -> EngineResult<()> {
            self.calls.push("clear");
            if self.clear_leaves == 0 {
                self.text.clear();
            } else {
                let kept: Vec<&str> = self.text.lines().skip(1).take(self.clear_leaves).collect();
                self.text = kept.join("\n");
            }
            Ok(())
        }

        async fn import_json(&mut self, json: &str) -> EngineResult<()> {
            self.calls.push("import_json");
            let value: serde_json::Value =
                serde_json::from_str(json).map_err(|e| EngineError::import(e.to_string()))?;
            let text = value["text"].as_str().unwrap_or_default().to_string();
            self.text = match &self.rewrite_on_json_import {
                Some(rewritten) => rewritten.clone(),
                None => {
                    let lines: Vec<&str> = text.lines().collect();
                    let keep = lines.len().saturating_sub(self.drop_lines_on_json_import);
                    lines[..keep].join("\n")
                }
            };
            self.json_imported = true;
            self.polls = 0;
            Ok(())
        }

        async fn element_count(&mut self) -> EngineResult<usize> {
            match self.count_after_json {
                Some(n) if self.json_imported => Ok(n),
                _ => Ok(count(&self.text)),
            }
        }

        async fn is_settled(&mut self) -> EngineResult<bool> {
            self.polls += 1;
            Ok(match self.settle_after_polls {
                Some(n) => self.polls >= n,
                None => true,
            })
        }
    }

    fn fast() -> DriverConfig {
        DriverConfig {
            settle: SettlePolicy::Fixed(Duration::ZERO),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn identity_engine_passes() {
        let mut engine = MockEngine::default();
        let outcome = RoundtripDriver::new(fast()).run(&mut engine, TEXT, "ohms.txt").await;

        assert_eq!(outcome.status, FixtureStatus::Passed);
        assert!(outcome.errors.is_empty());
        assert!(outcome.comparison.as_ref().is_some_and(|c| c.identical));
        assert_eq!(outcome.steps.element_count_initial, Some(2));
        assert_eq!(outcome.steps.element_count_after_json, Some(2));
        assert!(outcome.steps.json_valid);
        assert_eq!(outcome.steps.json_element_count, Some(0));
        assert_eq!(
            engine.calls,
            vec!["import_text", "export_json", "clear", "import_json", "export_text"]
        );
    }

    #[tokio::test]
    async fn invalid_json_short_circuits_before_clear() {
        let mut engine = MockEngine {
            bad_json: true,
            ..Default::default()
        };
        let outcome = RoundtripDriver::new(fast()).run(&mut engine, TEXT, "x.txt").await;

        assert_eq!(outcome.status, FixtureStatus::Failed);
        assert_eq!(outcome.failure_kind(), Some(FailureKind::InvalidJson));
        assert!(outcome.error().is_some_and(|m| m.starts_with("Invalid JSON")));
        assert!(!engine.calls.contains(&"clear"));
        assert!(outcome.steps.export_json);
        assert!(!outcome.steps.json_valid);
    }

    #[tokio::test]
    async fn clear_that_leaves_elements_stops_the_run() {
        let mut engine = MockEngine {
            clear_leaves: 2,
            ..Default::default()
        };
        let outcome = RoundtripDriver::new(fast()).run(&mut engine, TEXT, "x.txt").await;

        assert_eq!(outcome.failure_kind(), Some(FailureKind::ClearFailed));
        assert_eq!(outcome.error(), Some("Clear failed: 2 elements remaining"));
        assert!(!engine.calls.contains(&"import_json"));
        assert!(!outcome.steps.clear);
    }

    #[tokio::test]
    async fn import_error_is_recorded_not_raised() {
        let mut engine = MockEngine {
            fail_import: true,
            ..Default::default()
        };
        let outcome = RoundtripDriver::new(fast()).run(&mut engine, TEXT, "x.txt").await;

        assert_eq!(outcome.failure_kind(), Some(FailureKind::ImportFailure));
        assert!(outcome.error().is_some_and(|m| m.contains("unrecognized dump type")));
        assert_eq!(engine.calls, vec!["import_text"]);
    }

    #[tokio::test]
    async fn count_mismatch_fails_by_default() {
        let mut engine = MockEngine {
            drop_lines_on_json_import: 1,
            ..Default::default()
        };
        let outcome = RoundtripDriver::new(fast()).run(&mut engine, TEXT, "x.txt").await;

        assert_eq!(outcome.status, FixtureStatus::Failed);
        assert_eq!(outcome.error(), Some("Element count mismatch: 2 vs 1"));
        assert!(outcome.has_error(FailureKind::TextMismatch));
        let report = outcome.comparison.expect("comparison ran");
        assert!(matches!(report.differences[0], Difference::LineCount { original: 3, new: 2 }));
    }

    #[tokio::test]
    async fn count_mismatch_with_identical_text() {
        let mut engine = MockEngine {
            count_after_json: Some(5),
            ..Default::default()
        };
        let outcome = RoundtripDriver::new(fast()).run(&mut engine, TEXT, "x.txt").await;
        assert_eq!(outcome.status, FixtureStatus::Failed);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.failure_kind(), Some(FailureKind::ElementCountMismatch));
        assert!(outcome.comparison.as_ref().is_some_and(|c| c.identical));

        let mut engine = MockEngine {
            count_after_json: Some(5),
            ..Default::default()
        };
        let config = DriverConfig {
            count_mismatch: CountMismatchPolicy::Warn,
            ..fast()
        };
        let outcome = RoundtripDriver::new(config).run(&mut engine, TEXT, "x.txt").await;
        assert_eq!(outcome.status, FixtureStatus::Passed);
        assert_eq!(outcome.warnings.len(), 1);
    }

    #[tokio::test]
    async fn warn_policy_records_a_warning() {
        let mut engine = MockEngine {
            drop_lines_on_json_import: 1,
            ..Default::default()
        };
        let config = DriverConfig {
            count_mismatch: CountMismatchPolicy::Warn,
            ..fast()
        };
        let outcome = RoundtripDriver::new(config).run(&mut engine, TEXT, "x.txt").await;

        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].kind, FailureKind::ElementCountMismatch);
        assert!(!outcome.has_error(FailureKind::ElementCountMismatch));
        assert_eq!(outcome.failure_kind(), Some(FailureKind::TextMismatch));
    }

    #[tokio::test]
    async fn drifted_floats_still_pass() {
        let drifted = TEXT.replace("10.20027730826997", "10.200277308269971");
        let mut engine = MockEngine {
            rewrite_on_json_import: Some(drifted),
            ..Default::default()
        };
        let outcome = RoundtripDriver::new(fast()).run(&mut engine, TEXT, "x.txt").await;
        assert_eq!(outcome.status, FixtureStatus::Passed);
    }

    #[tokio::test]
    async fn hung_call_times_out() {
        let mut engine = MockEngine {
            hang_on_export_json: true,
            ..Default::default()
        };
        let config = DriverConfig {
            call_timeout: Some(Duration::from_millis(50)),
            ..fast()
        };
        let outcome = RoundtripDriver::new(config).run(&mut engine, TEXT, "x.txt").await;

        assert_eq!(outcome.failure_kind(), Some(FailureKind::Timeout));
        assert_eq!(outcome.error(), Some("exportAsJson timed out after 50 ms"));
        assert!(!engine.calls.contains(&"clear"));
    }

    #[tokio::test]
    async fn poll_settle_waits_for_the_engine() {
        let mut engine = MockEngine {
            settle_after_polls: Some(3),
            ..Default::default()
        };
        let config = DriverConfig {
            settle: SettlePolicy::Poll {
                interval: Duration::from_millis(1),
                timeout: Duration::from_secs(5),
            },
            ..Default::default()
        };
        let outcome = RoundtripDriver::new(config).run(&mut engine, TEXT, "x.txt").await;
        assert_eq!(outcome.status, FixtureStatus::Passed);
    }

    #[tokio::test]
    async fn poll_settle_gives_up() {
        let mut engine = MockEngine {
            settle_after_polls: Some(usize::MAX),
            ..Default::default()
        };
        let config = DriverConfig {
            settle: SettlePolicy::Poll {
                interval: Duration::from_millis(5),
                timeout: Duration::from_millis(20),
            },
            ..Default::default()
        };
        let outcome = RoundtripDriver::new(config).run(&mut engine, TEXT, "x.txt").await;
        assert_eq!(outcome.failure_kind(), Some(FailureKind::Timeout));
        assert_eq!(engine.calls, vec!["import_text"]);
    }

    #[tokio::test]
    async fn current_circuit_roundtrip() {
        let mut engine = MockEngine {
            text: TEXT.to_string(),
            ..Default::default()
        };
        let outcome = RoundtripDriver::new(fast()).run_current(&mut engine, "current").await;
        assert_eq!(outcome.status, FixtureStatus::Passed);
        assert_eq!(engine.calls[0], "export_text");
    }
}
