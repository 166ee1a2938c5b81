//! The end-to-end run: scan, validate, assemble, hook, generate, check

use crate::assemble::Assembler;
use crate::context::GenerationContext;
use crate::extract::Extractor;
use crate::generate::Generator;
use crate::hooks::HookPipeline;
use crate::scanner::Scanner;
use crate::validate::PostValidator;
use chrono::{DateTime, Utc};
use routemark_core::builtins::PROXY;
use routemark_core::{
    GeneratorConfig, GroupRegistry, MarkerKind, MarkerRegistry, RouteMetadata, RoutemarkError,
    RoutemarkResult, SchemaMetadata, ValidationErrors, Verbosity,
};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Everything a scan found, before any generation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    pub routes: Vec<RouteMetadata>,
    pub schemas: Vec<SchemaMetadata>,
    pub errors: ValidationErrors,

    /// Annotated declarations examined
    pub declarations: usize,
}

impl ScanReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Pretty JSON dump, for debugging annotation trees
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Counts reported after a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationSummary {
    pub routes: usize,
    pub websocket_handlers: usize,
    pub middlewares: usize,
    pub proxies: usize,
    pub schemas: usize,
    pub imports: usize,
    pub output: PathBuf,
}

impl fmt::Display for GenerationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} routes, {} websocket handlers, {} middlewares ({} proxies), {} schemas, {} imports -> {}",
            self.routes,
            self.websocket_handlers,
            self.middlewares,
            self.proxies,
            self.schemas,
            self.imports,
            self.output.display()
        )
    }
}

/// Configured compiler run
///
/// # Example
///
/// ```no_run
/// use routemark_codegen::Pipeline;
/// use routemark_core::GeneratorConfig;
/// use std::path::Path;
///
/// let summary = Pipeline::new(GeneratorConfig::default())
///     .run(Path::new("src/handlers"), Path::new(".routemark/routes.rs"))?;
/// println!("{summary}");
/// # Ok::<(), routemark_core::RoutemarkError>(())
/// ```
pub struct Pipeline {
    config: GeneratorConfig,
    markers: Arc<MarkerRegistry>,
    groups: Arc<GroupRegistry>,
    hooks: HookPipeline,
    generated_at: Option<DateTime<Utc>>,
}

impl Pipeline {
    /// A pipeline with the built-in markers, a fresh group registry, and the
    /// built-in hooks for the configured log level
    ///
    /// Import resolution is always installed; route logging only when the
    /// log level is verbose or higher.
    pub fn new(config: GeneratorConfig) -> Self {
        let verbosity: Verbosity = config.log_level.parse().unwrap_or_default();
        Self {
            config,
            markers: Arc::new(MarkerRegistry::with_builtins()),
            groups: Arc::new(GroupRegistry::new()),
            hooks: HookPipeline::for_verbosity(verbosity),
            generated_at: None,
        }
    }

    pub fn markers(mut self, markers: Arc<MarkerRegistry>) -> Self {
        self.markers = markers;
        self
    }

    pub fn groups(mut self, groups: Arc<GroupRegistry>) -> Self {
        self.groups = groups;
        self
    }

    /// Add hooks after the built-ins
    ///
    /// Hook indexes in [`RoutemarkError::Hook`] count the built-ins too.
    pub fn hooks(mut self, hooks: HookPipeline) -> Self {
        self.hooks = self.hooks.extend(hooks);
        self
    }

    /// Pin the timestamp written into the metadata block
    pub fn generated_at(mut self, at: DateTime<Utc>) -> Self {
        self.generated_at = Some(at);
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Scan `root` and collect records and validation errors
    ///
    /// Unreadable files and files that do not parse are fatal. Validation
    /// errors are collected in the report, and a declaration with any of them
    /// contributes no record.
    pub fn scan_only(&self, root: &Path) -> RoutemarkResult<ScanReport> {
        let declarations = Scanner::new(&self.markers).scan(root)?;
        let extractor = Extractor::new(&self.markers);
        let assembler = Assembler::new(&self.markers, &self.groups)
            .strict_responses(self.config.strict_responses);

        let mut report = ScanReport {
            declarations: declarations.len(),
            ..ScanReport::default()
        };
        for decl in &declarations {
            let extraction = extractor.extract(&decl.docs, &decl.file_name);
            if !extraction.is_valid() {
                report.errors.extend(extraction.errors);
                continue;
            }

            let assembled = assembler.assemble(decl, &extraction.markers);
            if !assembled.errors.is_empty() {
                report.errors.extend(assembled.errors);
                continue;
            }
            report.routes.extend(assembled.route);
            report.schemas.extend(assembled.schema);
        }

        tracing::debug!(
            declarations = report.declarations,
            routes = report.routes.len(),
            schemas = report.schemas.len(),
            errors = report.errors.len(),
            "scan complete"
        );
        Ok(report)
    }

    /// Compile the annotations under `root` into `output`
    pub fn run(&self, root: &Path, output: &Path) -> RoutemarkResult<GenerationSummary> {
        self.config.validate()?;

        let ScanReport {
            routes,
            schemas,
            errors,
            ..
        } = self.scan_only(root)?;
        if !errors.is_empty() {
            tracing::warn!(count = errors.len(), "annotation validation failed");
            return Err(RoutemarkError::Validation(errors));
        }

        self.hooks.run_post_parse(&routes)?;

        let mut ctx = GenerationContext::new(&self.config.package_name, routes)
            .with_schemas(schemas)
            .with_scan_root(root);
        if let Some(at) = self.generated_at {
            ctx = ctx.with_generated_at(at);
        }
        ctx.add_import(self.runtime_import());
        self.hooks.run_pre_generation(&mut ctx)?;

        Generator::new(&self.config).write(&ctx, output)?;
        if self.config.validate {
            PostValidator::for_config(&self.config).validate(output)?;
        }

        let summary = self.summarize(&ctx, output);
        tracing::info!("generated {summary}");
        Ok(summary)
    }

    fn runtime_import(&self) -> String {
        let (runtime, alias) = (&self.config.runtime_crate, &self.config.runtime_alias);
        if runtime == alias {
            runtime.clone()
        } else {
            format!("{runtime} as {alias}")
        }
    }

    fn summarize(&self, ctx: &GenerationContext, output: &Path) -> GenerationSummary {
        let applied = ctx.routes.iter().flat_map(|r| &r.middleware_info);
        let is_behavior = |name: &str| {
            self.markers
                .lookup(name)
                .is_some_and(|d| d.kind == MarkerKind::Behavior)
        };

        GenerationSummary {
            routes: ctx.routes.len(),
            websocket_handlers: ctx.websocket_bindings(),
            middlewares: applied.clone().filter(|info| is_behavior(info.name.as_str())).count(),
            proxies: applied.filter(|info| info.name == PROXY).count(),
            schemas: ctx.schemas.len(),
            imports: ctx.imports.len(),
            output: output.to_path_buf(),
        }
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("config", &self.config)
            .field("markers", &self.markers.len())
            .field("groups", &self.groups.len())
            .field("hooks", &self.hooks)
            .finish()
    }
}
