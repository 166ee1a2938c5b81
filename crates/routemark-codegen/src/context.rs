//! The generation context threaded through pre-generation hooks

use chrono::{DateTime, SecondsFormat, Utc};
use routemark_core::{RouteMetadata, SchemaMetadata};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Everything the generator renders, built once per run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationContext {
    /// Package name recorded in the metadata block
    pub package_name: String,

    /// Records in scan order
    pub routes: Vec<RouteMetadata>,

    pub schemas: Vec<SchemaMetadata>,

    /// `use` paths, deduplicated, in insertion order
    pub imports: Vec<String>,

    /// Path handler references are rooted at (`crate` unless a hook changes it)
    pub handler_root: String,

    /// Free-form values hooks may attach; rendered as header comments
    pub metadata: BTreeMap<String, String>,

    pub generated_at: DateTime<Utc>,

    /// Directory the records were scanned from, when known
    #[serde(skip)]
    pub scan_root: Option<PathBuf>,
}

impl GenerationContext {
    pub fn new(package_name: impl Into<String>, routes: Vec<RouteMetadata>) -> Self {
        Self {
            package_name: package_name.into(),
            routes,
            schemas: Vec::new(),
            imports: Vec::new(),
            handler_root: "crate".to_string(),
            metadata: BTreeMap::new(),
            generated_at: Utc::now(),
            scan_root: None,
        }
    }

    pub fn with_schemas(mut self, schemas: Vec<SchemaMetadata>) -> Self {
        self.schemas = schemas;
        self
    }

    pub fn with_generated_at(mut self, generated_at: DateTime<Utc>) -> Self {
        self.generated_at = generated_at;
        self
    }

    pub fn with_scan_root(mut self, root: &Path) -> Self {
        self.scan_root = Some(root.to_path_buf());
        self
    }

    /// Add an import unless it is already present; returns whether it was added
    pub fn add_import(&mut self, path: impl Into<String>) -> bool {
        let path = path.into();
        if self.imports.contains(&path) {
            return false;
        }
        self.imports.push(path);
        true
    }

    /// Remove duplicate imports, keeping the first occurrence
    pub fn dedup_imports(&mut self) {
        let mut seen = std::collections::HashSet::new();
        self.imports.retain(|import| seen.insert(import.clone()));
    }

    /// Timestamp as RFC 3339 with second precision
    pub fn timestamp(&self) -> String {
        self.generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    /// Reference to a route's handler: `<root>::<package>::<func>`
    pub fn handler_path(&self, route: &RouteMetadata) -> String {
        [self.handler_root.as_str(), route.package.as_str(), route.func_name.as_str()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("::")
    }

    pub fn http_routes(&self) -> impl Iterator<Item = &RouteMetadata> {
        self.routes.iter().filter(|r| !r.is_websocket_only())
    }

    pub fn websocket_bindings(&self) -> usize {
        self.routes.iter().map(|r| r.websocket_handlers.len()).sum()
    }
}

#[cfg(test)]
#[path = "context/context_tests.rs"]
mod context_tests;
