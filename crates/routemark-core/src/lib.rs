//! routemark-core - Marker registry, metadata model, and error types
//!
//! This crate holds everything the compiler stages share:
//! - [`MarkerRegistry`] and [`MarkerDefinition`] for the annotation vocabulary
//! - [`RouteMetadata`] and friends, the typed model built from annotations
//! - [`GroupRegistry`] for shared path prefixes
//! - [`RoutemarkError`] and [`ValidationErrors`] for the two error tiers
//! - [`GeneratorConfig`] for run settings

pub mod builtins;
mod config;
mod error;
mod group;
mod marker;
mod model;
mod validation;

pub use config::{GeneratorConfig, is_identifier};
pub use error::{HookStage, PostValidationError, RoutemarkError, RoutemarkResult};
pub use group::{GroupRegistry, default_description, default_prefix};
pub use marker::{
    ArgPolicy, BehaviorFactory, MarkerDefinition, MarkerKind, MarkerRegistry, SIGIL, call_factory,
};
pub use model::{
    FieldMetadata, GroupMetadata, MarkerInstance, MiddlewareCall, MiddlewareInfo,
    ParameterMetadata, RequestBodyMetadata, ResponseMetadata, RouteMetadata, SchemaMetadata,
    split_key_value, strip_quotes,
};
pub use validation::{ValidationCode, ValidationError, ValidationErrors};

/// How much the pipeline reports while it runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// Warnings and errors only
    Silent,
    /// Run summary and warnings
    #[default]
    Normal,
    /// Per-route detail
    Verbose,
}

impl std::str::FromStr for Verbosity {
    type Err = RoutemarkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "silent" => Ok(Verbosity::Silent),
            "normal" => Ok(Verbosity::Normal),
            "verbose" => Ok(Verbosity::Verbose),
            other => Err(RoutemarkError::Config(format!(
                "unknown log level {other:?}, expected silent, normal, or verbose"
            ))),
        }
    }
}

impl std::fmt::Display for Verbosity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verbosity::Silent => write!(f, "silent"),
            Verbosity::Normal => write!(f, "normal"),
            Verbosity::Verbose => write!(f, "verbose"),
        }
    }
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        GeneratorConfig, GroupMetadata, GroupRegistry, MarkerDefinition, MarkerInstance,
        MarkerKind, MarkerRegistry, MiddlewareCall, RouteMetadata, RoutemarkError,
        RoutemarkResult, ValidationCode, ValidationError, ValidationErrors, Verbosity,
    };
}
