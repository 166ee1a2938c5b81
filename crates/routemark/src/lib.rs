//! # routemark
//!
//! Compiles annotations written in doc comments into a Rust source file that
//! registers routes, their metadata, and their middleware with a host registry.
//!
//! ## Annotating handlers
//!
//! ```ignore
//! /// Fetch one user.
//! /// @Route(GET, "/users/{id}")
//! /// @Param(name=id, type=string, location=path, required=true)
//! /// @Auth(role=admin)
//! /// @Cache(ttl=5m)
//! pub fn get_user(req: rt::Request) -> rt::Response { ... }
//!
//! /// @WebSocket("chat.message")
//! pub fn on_message(conn: &mut rt::Connection, msg: rt::Message) { ... }
//! ```
//!
//! ## Generating
//!
//! ```no_run
//! use routemark::prelude::*;
//! use std::path::Path;
//!
//! init_logging(Verbosity::Normal);
//!
//! let config = GeneratorConfig::from_toml_str("minify = true")?;
//! let hooks = HookPipeline::new().post_parse(|routes: &[RouteMetadata]| -> routemark::anyhow::Result<()> {
//!     routemark::anyhow::ensure!(!routes.is_empty(), "no routes found");
//!     Ok(())
//! });
//! let summary = Pipeline::new(config)
//!     .hooks(hooks)
//!     .run(Path::new("src/handlers"), Path::new(".routemark/routes.rs"))?;
//! println!("{summary}");
//! # Ok::<(), RoutemarkError>(())
//! ```
//!
//! ## Crate Structure
//!
//! This is a facade crate that re-exports from:
//! - [`routemark_core`] - Marker registry, metadata model, errors, configuration
//! - [`routemark_codegen`] - Scanner, extractor, assembler, hooks, generator
//! - [`routemark_logging`] - Tracing setup and runtime verbosity changes

// Re-export core types
pub use routemark_core::{
    ArgPolicy, GeneratorConfig, GroupMetadata, GroupRegistry, HookStage, MarkerDefinition,
    MarkerInstance, MarkerKind, MarkerRegistry, MiddlewareCall, MiddlewareInfo,
    PostValidationError, RouteMetadata, RoutemarkError, RoutemarkResult, SchemaMetadata,
    ValidationCode, ValidationError, ValidationErrors, Verbosity, builtins,
};

// Re-export the compiler stages
pub use routemark_codegen::{
    Assembler, Extractor, GenerationContext, GenerationSummary, Generator, HookPipeline,
    ImportResolutionHook, Pipeline, PostParseHook, PostValidator, PreGenerationHook,
    RouteLoggingHook, ScanReport, Scanner, Template,
};

// Re-export logging setup
pub use routemark_logging::{CaptureLayer, ReloadHandle, init_logging};

// Re-export common dependencies that hook authors need
pub use anyhow;
pub use tracing;

/// Prelude module for convenient imports.
///
/// Use `use routemark::prelude::*;` to import commonly used types.
pub mod prelude {
    // Configuration and errors
    pub use crate::{GeneratorConfig, RoutemarkError, RoutemarkResult, Verbosity};

    // Running the compiler
    pub use crate::{
        GenerationContext, GenerationSummary, HookPipeline, ImportResolutionHook, Pipeline,
        PostParseHook, PreGenerationHook, RouteMetadata,
    };

    // Extending the vocabulary
    pub use crate::{GroupRegistry, MarkerDefinition, MarkerKind, MarkerRegistry};

    pub use crate::init_logging;
}
