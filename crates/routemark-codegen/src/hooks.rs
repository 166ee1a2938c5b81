//! Extension hooks
//!
//! Two ordered lists: post-parse hooks see the assembled records, and
//! pre-generation hooks may change the [`GenerationContext`]. Hooks run in
//! registration order and the first failure stops the run.

use crate::context::GenerationContext;
use anyhow::Context as _;
use routemark_core::{HookStage, RouteMetadata, RoutemarkError, RoutemarkResult, Verbosity};
use std::path::{Path, PathBuf};

/// Runs after every declaration has been assembled
pub trait PostParseHook: Send + Sync {
    fn after_parse(&self, routes: &[RouteMetadata]) -> anyhow::Result<()>;
}

/// Runs before rendering, with mutable access to the context
pub trait PreGenerationHook: Send + Sync {
    fn before_generate(&self, ctx: &mut GenerationContext) -> anyhow::Result<()>;
}

impl<F> PostParseHook for F
where
    F: Fn(&[RouteMetadata]) -> anyhow::Result<()> + Send + Sync,
{
    fn after_parse(&self, routes: &[RouteMetadata]) -> anyhow::Result<()> {
        self(routes)
    }
}

impl<F> PreGenerationHook for F
where
    F: Fn(&mut GenerationContext) -> anyhow::Result<()> + Send + Sync,
{
    fn before_generate(&self, ctx: &mut GenerationContext) -> anyhow::Result<()> {
        self(ctx)
    }
}

/// Ordered hook lists
#[derive(Default)]
pub struct HookPipeline {
    post_parse: Vec<Box<dyn PostParseHook>>,
    pre_generation: Vec<Box<dyn PreGenerationHook>>,
}

impl HookPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in hooks for a verbosity: import resolution always, route
    /// logging when verbose
    pub fn for_verbosity(verbosity: Verbosity) -> Self {
        let hooks = Self::new().pre_generation(ImportResolutionHook::default());
        if verbosity >= Verbosity::Verbose {
            hooks.post_parse(RouteLoggingHook)
        } else {
            hooks
        }
    }

    /// Append another pipeline's hooks after these, keeping both orders
    pub fn extend(mut self, other: HookPipeline) -> Self {
        self.post_parse.extend(other.post_parse);
        self.pre_generation.extend(other.pre_generation);
        self
    }

    pub fn post_parse(mut self, hook: impl PostParseHook + 'static) -> Self {
        self.post_parse.push(Box::new(hook));
        self
    }

    pub fn pre_generation(mut self, hook: impl PreGenerationHook + 'static) -> Self {
        self.pre_generation.push(Box::new(hook));
        self
    }

    pub fn len(&self) -> usize {
        self.post_parse.len() + self.pre_generation.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn run_post_parse(&self, routes: &[RouteMetadata]) -> RoutemarkResult<()> {
        for (index, hook) in self.post_parse.iter().enumerate() {
            hook.after_parse(routes)
                .map_err(|err| hook_error(HookStage::PostParse, index, err))?;
        }
        Ok(())
    }

    pub fn run_pre_generation(&self, ctx: &mut GenerationContext) -> RoutemarkResult<()> {
        for (index, hook) in self.pre_generation.iter().enumerate() {
            hook.before_generate(ctx)
                .map_err(|err| hook_error(HookStage::PreGeneration, index, err))?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for HookPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookPipeline")
            .field("post_parse", &self.post_parse.len())
            .field("pre_generation", &self.pre_generation.len())
            .finish()
    }
}

fn hook_error(stage: HookStage, index: usize, err: anyhow::Error) -> RoutemarkError {
    tracing::error!(%stage, index, "hook failed: {err:#}");
    RoutemarkError::Hook {
        stage,
        index,
        message: format!("{err:#}"),
    }
}

/// Logs every assembled record at debug level
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteLoggingHook;

impl PostParseHook for RouteLoggingHook {
    fn after_parse(&self, routes: &[RouteMetadata]) -> anyhow::Result<()> {
        for route in routes {
            if route.is_websocket_only() {
                tracing::debug!(
                    handler = %route.func_name,
                    package = %route.package,
                    message_types = ?route.websocket_handlers,
                    "websocket handler"
                );
            } else {
                tracing::debug!(
                    handler = %route.func_name,
                    package = %route.package,
                    middlewares = route.middleware_calls.len(),
                    "route {} {}",
                    route.method,
                    route.path
                );
            }
        }
        Ok(())
    }
}

/// Makes handler references resolve from the generated file
///
/// Walks upward from `start` to the nearest `Cargo.toml`, then expresses the
/// scan root as a module path under that crate's `src/`. The module's first
/// segment becomes an import (`crate::handlers`) and handler references are
/// rooted at the full module path. Imports are deduplicated afterwards.
///
/// The default hook takes both paths from [`GenerationContext::scan_root`].
/// Without a manifest, or with a scan root outside `src/`, the context is left
/// alone and handlers stay rooted at `crate`.
#[derive(Debug, Clone, Default)]
pub struct ImportResolutionHook {
    start: Option<PathBuf>,
    scan_root: Option<PathBuf>,
}

impl ImportResolutionHook {
    pub fn new(start: impl Into<PathBuf>, scan_root: impl Into<PathBuf>) -> Self {
        Self {
            start: Some(start.into()),
            scan_root: Some(scan_root.into()),
        }
    }
}

impl PreGenerationHook for ImportResolutionHook {
    fn before_generate(&self, ctx: &mut GenerationContext) -> anyhow::Result<()> {
        let Some(scan_root) = self.scan_root.clone().or_else(|| ctx.scan_root.clone()) else {
            tracing::debug!("no scan root, imports left unresolved");
            return Ok(());
        };
        let start = self.start.clone().unwrap_or_else(|| scan_root.clone());

        let Some(manifest) = find_manifest(&start) else {
            tracing::debug!("no Cargo.toml above {}, imports left unresolved", start.display());
            return Ok(());
        };
        let crate_root = manifest.parent().unwrap_or(Path::new("."));

        let text = std::fs::read_to_string(&manifest)
            .with_context(|| format!("failed to read {}", manifest.display()))?;
        let parsed: toml::Table =
            toml::from_str(&text).with_context(|| format!("failed to parse {}", manifest.display()))?;
        if let Some(name) = parsed
            .get("package")
            .and_then(|p| p.get("name"))
            .and_then(|n| n.as_str())
        {
            ctx.metadata.insert("crate".to_string(), name.to_string());
        }

        let src = crate_root.join("src");
        let Some(modules) = module_segments(&src, &scan_root) else {
            tracing::warn!(
                "scan root {} is not inside {}, handlers stay rooted at {}",
                scan_root.display(),
                src.display(),
                ctx.handler_root
            );
            return Ok(());
        };
        if let Some(first) = modules.first() {
            ctx.add_import(format!("crate::{first}"));
            ctx.handler_root = modules.join("::");
            ctx.metadata.insert("handler_root".to_string(), ctx.handler_root.clone());
        }
        ctx.dedup_imports();

        tracing::debug!(handler_root = %ctx.handler_root, imports = ctx.imports.len(), "imports resolved");
        Ok(())
    }
}

/// Nearest `Cargo.toml` at or above `start`
pub fn find_manifest(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join("Cargo.toml"))
        .find(|candidate| candidate.is_file())
}

fn module_segments(src: &Path, scan_root: &Path) -> Option<Vec<String>> {
    let src = src.canonicalize().unwrap_or_else(|_| src.to_path_buf());
    let scan_root = scan_root
        .canonicalize()
        .unwrap_or_else(|_| scan_root.to_path_buf());

    let relative = scan_root.strip_prefix(&src).ok()?;
    Some(
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect(),
    )
}
