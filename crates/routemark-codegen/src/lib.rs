//! routemark-codegen - Annotation scanner and route registration generator
//!
//! The stages run strictly in this order:
//! - [`Scanner`] walks a source tree and finds documented declarations
//! - [`Extractor`] finds and validates markers in each comment block
//! - [`Assembler`] reduces markers into [`RouteMetadata`](routemark_core::RouteMetadata)
//! - [`HookPipeline`] runs extension hooks
//! - [`Generator`] renders a [`GenerationContext`] through a [`Template`]
//! - [`PostValidator`] re-reads the output and checks its structure
//!
//! [`Pipeline`] wires them together.

mod assemble;
mod context;
mod extract;
mod generate;
mod hooks;
pub mod ir;
mod minify;
mod pipeline;
pub mod printer;
mod scanner;
mod validate;

pub use assemble::{Assembled, Assembler};
pub use context::GenerationContext;
pub use extract::{Extraction, Extractor, split_args};
pub use generate::{ARTIFACT_DIR, GENERATED_BANNER, Generator, Template, ensure_gitignore};
pub use hooks::{
    HookPipeline, ImportResolutionHook, PostParseHook, PreGenerationHook, RouteLoggingHook,
    find_manifest,
};
pub use minify::minify;
pub use pipeline::{GenerationSummary, Pipeline, ScanReport};
pub use printer::escape_str;
pub use scanner::{
    DeclarationKind, DocBlock, DocLine, Scanner, SourceDeclaration, collect_source_files,
    module_path,
};
pub use validate::PostValidator;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        GenerationContext, GenerationSummary, HookPipeline, Pipeline, PostParseHook,
        PreGenerationHook, ScanReport, Template,
    };
}
