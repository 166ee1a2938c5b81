//! Error types for the routemark pipeline
//!
//! Two tiers exist. Declaration-level problems are collected into
//! [`ValidationErrors`] and surface as [`RoutemarkError::Validation`]; every
//! other variant is fatal and aborts the run where it happens.

use crate::validation::ValidationErrors;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pipeline operations
pub type RoutemarkResult<T> = Result<T, RoutemarkError>;

/// Stage of the hook pipeline that produced a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookStage {
    /// Hooks run over the parsed route metadata
    PostParse,
    /// Hooks run over the mutable generation context
    PreGeneration,
}

impl std::fmt::Display for HookStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HookStage::PostParse => write!(f, "post-parse"),
            HookStage::PreGeneration => write!(f, "pre-generation"),
        }
    }
}

/// Error type for pipeline operations
#[derive(Error, Debug)]
pub enum RoutemarkError {
    /// One or more annotated declarations failed validation
    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    /// The source tree could not be walked
    #[error("failed to read source directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A source file could not be read
    #[error("failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A source file is not valid Rust
    #[error("failed to parse {file}:{line}:{column}: {message}")]
    Parse {
        file: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    /// An extension hook returned an error
    #[error("{stage} hook #{index} failed: {message}")]
    Hook {
        stage: HookStage,
        index: usize,
        message: String,
    },

    /// The generation context could not be rendered
    #[error("template error: {0}")]
    Template(String),

    /// The generated artifact could not be written
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The generated artifact failed its structural check
    #[error("post-generation validation failed: {0}")]
    PostValidation(#[from] PostValidationError),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl RoutemarkError {
    /// Returns a stable numeric code for this error
    pub fn error_code(&self) -> u32 {
        match self {
            RoutemarkError::Validation(_) => 1,
            RoutemarkError::ReadDir { .. } => 2,
            RoutemarkError::ReadFile { .. } => 3,
            RoutemarkError::Parse { .. } => 4,
            RoutemarkError::Hook { .. } => 5,
            RoutemarkError::Template(_) => 6,
            RoutemarkError::Write { .. } => 7,
            RoutemarkError::PostValidation(_) => 8,
            RoutemarkError::Config(_) => 9,
        }
    }

    /// Whether this error aggregates declaration-level problems
    ///
    /// Aggregated errors are fixable in one pass by the annotation author;
    /// everything else is a fatal pipeline failure.
    pub fn is_aggregated(&self) -> bool {
        matches!(self, RoutemarkError::Validation(_))
    }
}

impl From<toml::de::Error> for RoutemarkError {
    fn from(err: toml::de::Error) -> Self {
        RoutemarkError::Config(err.to_string())
    }
}

/// Structural problems found when re-reading a generated artifact
#[derive(Error, Debug)]
pub enum PostValidationError {
    /// The artifact does not exist
    #[error("generated file not found: {0}")]
    Missing(PathBuf),

    /// The artifact exists but has no content
    #[error("generated file is empty: {0}")]
    Empty(PathBuf),

    /// The artifact could not be read
    #[error("failed to read generated file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The artifact is not valid Rust
    #[error("syntax error in generated file at {line}:{column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    /// No `use` item exists
    #[error("required imports not found")]
    MissingImports,

    /// The initialization function is absent
    #[error("entry point `{0}` not found")]
    MissingEntryPoint(String),

    /// The initialization function registers nothing
    #[error("no `{registration_fn}` call found in `{entry_point}`")]
    MissingRegistrations {
        entry_point: String,
        registration_fn: String,
    },
}
