//! The engine seam: the import/export surface the harness drives.
//!
//! A [`CircuitEngine`] is a single mutable resource. The driver and batch
//! runner borrow it mutably for the whole run, so fixtures can never
//! interleave on it. [`DocumentEngine`] is the in-process implementation
//! backed by `cjs-format`; tests substitute their own mocks.

use async_trait::async_trait;
use log::debug;

use cjs_format::{from_json, parse_text, to_json, to_text, CircuitDocument};

use crate::error::EngineResult;

/// Import/export surface of a circuit engine.
#[async_trait]
pub trait CircuitEngine: Send {
    /// Load text-format data. `merge` keeps the current circuit and appends;
    /// otherwise the circuit is replaced.
    async fn import_text(&mut self, text: &str, merge: bool) -> EngineResult<()>;

    /// Export the current circuit as a JSON document
    async fn export_json(&mut self) -> EngineResult<String>;

    /// Export the current circuit in text format
    async fn export_text(&mut self) -> EngineResult<String>;

    /// Remove every element
    async fn clear(&mut self) -> EngineResult<()>;

    /// Replace the current circuit with a JSON document
    async fn import_json(&mut self, json: &str) -> EngineResult<()>;

    /// Number of circuit elements currently loaded
    async fn element_count(&mut self) -> EngineResult<usize>;

    /// Whether post-import analysis has finished. Engines without such a
    /// signal report `true`.
    async fn is_settled(&mut self) -> EngineResult<bool> {
        Ok(true)
    }
}

/// A circuit in one of the two serializations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SerializedForm {
    /// Line-oriented text format; line order is significant
    Text(String),
    /// JSON document; `elements` key order is not significant
    Json(String),
}

impl SerializedForm {
    /// Classify raw data: a leading `{` means JSON.
    pub fn detect(data: impl Into<String>) -> Self {
        let data = data.into();
        if data.trim_start().starts_with('{') {
            SerializedForm::Json(data)
        } else {
            SerializedForm::Text(data)
        }
    }

    /// Raw contents
    pub fn as_str(&self) -> &str {
        match self {
            SerializedForm::Text(s) | SerializedForm::Json(s) => s,
        }
    }

    /// Replace the engine's circuit with this data
    pub async fn load_into<E>(&self, engine: &mut E) -> EngineResult<()>
    where
        E: CircuitEngine + ?Sized,
    {
        match self {
            SerializedForm::Text(text) => engine.import_text(text, false).await,
            SerializedForm::Json(json) => engine.import_json(json).await,
        }
    }
}

/// In-process engine holding a [`CircuitDocument`].
///
/// It never simulates; imports are complete when the call returns.
#[derive(Debug, Default)]
pub struct DocumentEngine {
    document: CircuitDocument,
}

impl DocumentEngine {
    /// Create an engine with an empty circuit
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine preloaded with a document
    pub fn with_document(document: CircuitDocument) -> Self {
        Self { document }
    }

    /// The current document
    pub fn document(&self) -> &CircuitDocument {
        &self.document
    }
}

#[async_trait]
impl CircuitEngine for DocumentEngine {
    async fn import_text(&mut self, text: &str, merge: bool) -> EngineResult<()> {
        let imported = parse_text(text)?;
        debug!(
            "text import: {} elements (merge={})",
            imported.element_count(),
            merge
        );
        if merge {
            self.document.merge(imported);
        } else {
            self.document = imported;
        }
        Ok(())
    }

    async fn export_json(&mut self) -> EngineResult<String> {
        Ok(to_json(&self.document)?)
    }

    async fn export_text(&mut self) -> EngineResult<String> {
        Ok(to_text(&self.document))
    }

    async fn clear(&mut self) -> EngineResult<()> {
        self.document.clear();
        Ok(())
    }

    async fn import_json(&mut self, json: &str) -> EngineResult<()> {
        self.document = from_json(json)?;
        Ok(())
    }

    async fn element_count(&mut self) -> EngineResult<usize> {
        Ok(self.document.element_count())
    }
}
