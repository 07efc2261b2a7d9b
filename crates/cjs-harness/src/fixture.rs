//! Fixture loading.
//!
//! A fixture is a named circuit in text format. Sources either fetch
//! `{origin}/circuits/{name}` over HTTP or read `{dir}/{name}` from disk.
//! A fixture that cannot be loaded is skipped by the batch runner, never
//! failed.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;

use crate::error::{HarnessError, Result};

/// Built-in canonical sample circuits.
pub const DEFAULT_FIXTURES: &[&str] = &[
    // Basics
    "ohms.txt",
    "resistors.txt",
    "cap.txt",
    "induct.txt",
    "voltdivide.txt",
    // Semiconductors
    "npn.txt",
    "pnp.txt",
    "diodevar.txt",
    // Oscillators
    "joule-thief.txt",
    "astable.txt",
    // OpAmps
    "amp-invert.txt",
    "amp-noninvert.txt",
    // Digital
    "and.txt",
    "nand.txt",
    "counter.txt",
    // Transformers
    "transformer.txt",
    // Filters
    "filt-lopass.txt",
    "filt-hipass.txt",
    // Power
    "fullrect.txt",
    "rectify.txt",
];

/// Owned list of the built-in fixture names
pub fn default_fixture_names() -> Vec<String> {
    DEFAULT_FIXTURES.iter().map(|s| s.to_string()).collect()
}

/// A loaded circuit fixture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixture {
    /// Identifier (file name)
    pub name: String,
    /// Raw text-format contents
    pub text: String,
}

/// Where fixtures come from
#[async_trait]
pub trait FixtureSource: Send + Sync {
    /// Load one fixture by name
    async fn load(&self, name: &str) -> Result<Fixture>;

    /// Human-readable location, for logs
    fn describe(&self) -> String;
}

/// Fetches `{origin}/circuits/{name}` over HTTP.
#[derive(Debug, Clone)]
pub struct HttpFixtures {
    origin: String,
    client: reqwest::Client,
}

impl HttpFixtures {
    /// Create a source for the given origin (`http://localhost:8080`)
    pub fn new(origin: impl Into<String>) -> Result<Self> {
        Self::with_timeout(origin, Duration::from_secs(30))
    }

    /// Create a source with an explicit request timeout
    pub fn with_timeout(origin: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HarnessError::load("<client>", e.to_string()))?;
        Ok(Self {
            origin: origin.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    /// URL a fixture is fetched from
    pub fn url_for(&self, name: &str) -> String {
        format!("{}/circuits/{}", self.origin, name)
    }
}

#[async_trait]
impl FixtureSource for HttpFixtures {
    async fn load(&self, name: &str) -> Result<Fixture> {
        let url = self.url_for(name);
        debug!("GET {}", url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| HarnessError::load(name, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(HarnessError::load(name, format!("HTTP {}", status.as_u16())));
        }

        let text = response
            .text()
            .await
            .map_err(|e| HarnessError::load(name, e.to_string()))?;
        Ok(Fixture {
            name: name.to_string(),
            text,
        })
    }

    fn describe(&self) -> String {
        format!("{}/circuits", self.origin)
    }
}

/// Reads fixtures from a local directory.
#[derive(Debug, Clone)]
pub struct DirectoryFixtures {
    root: PathBuf,
}

impl DirectoryFixtures {
    /// Create a source rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory the fixtures are read from
    pub fn root(&self) -> &std::path::Path {
        &self.root
    }
}

#[async_trait]
impl FixtureSource for DirectoryFixtures {
    async fn load(&self, name: &str) -> Result<Fixture> {
        let path = self.root.join(name);
        debug!("reading {}", path.display());
        let text = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| HarnessError::load(name, format!("{}: {}", path.display(), e)))?;
        Ok(Fixture {
            name: name.to_string(),
            text,
        })
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

/// Fixtures held in memory, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct InlineFixtures {
    fixtures: BTreeMap<String, String>,
}

impl InlineFixtures {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add a fixture
    pub fn with(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.fixtures.insert(name.into(), text.into());
        self
    }
}

#[async_trait]
impl FixtureSource for InlineFixtures {
    async fn load(&self, name: &str) -> Result<Fixture> {
        self.fixtures
            .get(name)
            .map(|text| Fixture {
                name: name.to_string(),
                text: text.clone(),
            })
            .ok_or_else(|| HarnessError::load(name, "no such fixture"))
    }

    fn describe(&self) -> String {
        format!("{} inline fixtures", self.fixtures.len())
    }
}
