//! Rendering the generation context into a registration source file

use crate::context::GenerationContext;
use crate::ir::{Expr, Item, Param, SourceFile, Stmt};
use crate::minify::minify;
use crate::printer::{Layout, Printer};
use routemark_core::{
    GeneratorConfig, MiddlewareCall, RouteMetadata, RoutemarkError, RoutemarkResult,
    is_identifier,
};
use std::path::{Path, PathBuf};

/// First line of every generated file
pub const GENERATED_BANNER: &str = "@generated by routemark. DO NOT EDIT.";

/// Name of the generated-artifacts directory that receives a `.gitignore`
pub const ARTIFACT_DIR: &str = ".routemark";

const GITIGNORE: &str = "# Generated by routemark\n*.rs\n!.gitignore\n";

/// Output template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    /// Commented, one struct field per line
    Verbose,
    /// Single-line statements, comments stripped, imports merged
    Minified,
}

impl Template {
    pub fn for_config(config: &GeneratorConfig) -> Self {
        if config.minify {
            Template::Minified
        } else {
            Template::Verbose
        }
    }

    pub fn render(&self, ctx: &GenerationContext, config: &GeneratorConfig) -> RoutemarkResult<String> {
        let file = Lowering::new(ctx, config, *self == Template::Verbose).lower()?;
        match self {
            Template::Verbose => Ok(Printer::new(Layout::Multiline).print(&file)),
            Template::Minified => Ok(minify(&Printer::new(Layout::Compact).print(&file))),
        }
    }
}

/// Renders and writes the generated file
pub struct Generator<'a> {
    config: &'a GeneratorConfig,
    template: Template,
}

impl<'a> Generator<'a> {
    pub fn new(config: &'a GeneratorConfig) -> Self {
        Self {
            config,
            template: Template::for_config(config),
        }
    }

    pub fn with_template(mut self, template: Template) -> Self {
        self.template = template;
        self
    }

    pub fn render(&self, ctx: &GenerationContext) -> RoutemarkResult<String> {
        self.template.render(ctx, self.config)
    }

    /// Render `ctx` and write it to `output`
    ///
    /// Parent directories are created. The write is not atomic.
    pub fn write(&self, ctx: &GenerationContext, output: &Path) -> RoutemarkResult<()> {
        let source = self.render(ctx)?;

        if let Some(dir) = output.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|source| RoutemarkError::Write {
                path: dir.to_path_buf(),
                source,
            })?;
            ensure_gitignore(dir)?;
        }

        std::fs::write(output, source).map_err(|source| RoutemarkError::Write {
            path: output.to_path_buf(),
            source,
        })?;
        tracing::debug!(output = %output.display(), template = ?self.template, "generated file written");
        Ok(())
    }
}

/// Create `.gitignore` in the nearest `.routemark` ancestor of `dir`, if any
///
/// Returns the path written, or `None` when there is no such directory or
/// the file already exists.
pub fn ensure_gitignore(dir: &Path) -> RoutemarkResult<Option<PathBuf>> {
    let Some(artifacts) = dir
        .ancestors()
        .find(|a| a.file_name().is_some_and(|n| n == ARTIFACT_DIR))
    else {
        return Ok(None);
    };

    let path = artifacts.join(".gitignore");
    if path.exists() {
        return Ok(None);
    }
    std::fs::write(&path, GITIGNORE).map_err(|source| RoutemarkError::Write {
        path: path.clone(),
        source,
    })?;
    tracing::info!(path = %path.display(), "created .gitignore for generated files");
    Ok(Some(path))
}

/// Turns a context into the IR
struct Lowering<'c> {
    ctx: &'c GenerationContext,
    config: &'c GeneratorConfig,
    verbose: bool,
}

impl<'c> Lowering<'c> {
    fn new(ctx: &'c GenerationContext, config: &'c GeneratorConfig, verbose: bool) -> Self {
        Self {
            ctx,
            config,
            verbose,
        }
    }

    fn rt(&self, name: &str) -> String {
        format!("{}::{name}", self.config.runtime_alias)
    }

    fn lower(&self) -> RoutemarkResult<SourceFile> {
        let mut items = vec![Item::Comment(GENERATED_BANNER.to_string())];
        if self.verbose {
            items.push(Item::Comment(format!("package: {}", self.ctx.package_name)));
            for (key, value) in &self.ctx.metadata {
                items.push(Item::Comment(format!("{key}: {value}")));
            }
        }
        items.push(Item::Blank);

        for import in &self.ctx.imports {
            items.push(Item::Use(import.clone()));
        }
        items.push(Item::Blank);

        items.push(Item::Fn {
            docs: self.docs(&["Registers every annotated handler with `registry`."]),
            name: self.config.entry_point.clone(),
            params: vec![Param::new(
                "registry",
                format!("&mut {}", self.rt(&self.config.registry_type)),
            )],
            body: self.body()?,
        });

        if !self.ctx.schemas.is_empty() {
            items.push(Item::Blank);
            items.push(self.schemas());
        }

        items.push(Item::Blank);
        items.push(Item::Const {
            docs: self.docs(&["Facts about this generation run."]),
            name: "GENERATED_METADATA".to_string(),
            ty: self.rt("GeneratedMetadata"),
            value: Expr::strukt(
                self.rt("GeneratedMetadata"),
                vec![
                    ("routes_count", Expr::Int(self.ctx.routes.len())),
                    ("generated_at", Expr::str(self.ctx.timestamp())),
                    ("package_name", Expr::str(&self.ctx.package_name)),
                ],
            ),
        });

        Ok(SourceFile { items })
    }

    fn docs(&self, lines: &[&str]) -> Vec<String> {
        if self.verbose {
            lines.iter().map(|l| l.to_string()).collect()
        } else {
            Vec::new()
        }
    }

    fn body(&self) -> RoutemarkResult<Vec<Stmt>> {
        let mut body = Vec::new();

        for (i, route) in self.ctx.routes.iter().enumerate() {
            if self.verbose && i > 0 {
                body.push(Stmt::Blank);
            }
            let handler = self.handler(route)?;

            if route.is_websocket_only() {
                if self.verbose {
                    body.push(Stmt::Comment(format!(
                        "websocket {} -> {handler}",
                        route.websocket_handlers.join(", ")
                    )));
                }
                for message_type in &route.websocket_handlers {
                    body.push(self.register(
                        &self.config.websocket_registration_fn,
                        vec![Expr::str(message_type), Expr::path(&handler)],
                    ));
                }
                let wrapper = Expr::call(self.rt("websocket_handler_wrapper"), vec![Expr::path(&handler)]);
                let path = format!("/ws/{}", route.func_name);
                body.push(self.register(
                    &self.config.registration_fn,
                    vec![self.route_entry(route, "WS", &path, wrapper, &[])],
                ));
            } else {
                if self.verbose {
                    body.push(Stmt::Comment(format!("{} {} -> {handler}", route.method, route.path)));
                    if !route.description.is_empty() {
                        body.push(Stmt::Comment(route.description.clone()));
                    }
                }
                body.push(self.register(
                    &self.config.registration_fn,
                    vec![self.route_entry(
                        route,
                        &route.method,
                        &route.path,
                        Expr::path(&handler),
                        &route.middleware_calls,
                    )],
                ));
            }
        }

        if self.ctx.websocket_bindings() > 0 {
            if self.verbose {
                body.push(Stmt::Blank);
            }
            body.push(self.register("register_default_websocket_handlers", Vec::new()));
        }
        Ok(body)
    }

    fn register(&self, method: &str, args: Vec<Expr>) -> Stmt {
        Stmt::Expr(Expr::MethodCall {
            receiver: "registry".to_string(),
            method: method.to_string(),
            args,
        })
    }

    /// Handler path, checked to be a valid Rust path
    fn handler(&self, route: &RouteMetadata) -> RoutemarkResult<String> {
        let path = self.ctx.handler_path(route);
        if path.split("::").all(is_identifier) {
            Ok(path)
        } else {
            Err(RoutemarkError::Template(format!(
                "handler `{path}` for {} is not a valid Rust path",
                route.file_name
            )))
        }
    }

    fn route_entry(
        &self,
        route: &RouteMetadata,
        method: &str,
        path: &str,
        handler: Expr,
        calls: &[MiddlewareCall],
    ) -> Expr {
        let middlewares = calls
            .iter()
            .map(|call| Expr::call(self.rt(&call.factory), vec![Expr::str_slice(call.args.clone())]))
            .collect();

        Expr::strukt(
            self.rt("RouteEntry"),
            vec![
                ("method", Expr::str(method)),
                ("path", Expr::str(path)),
                ("handler", handler),
                (
                    "middlewares",
                    Expr::Macro {
                        name: "vec".to_string(),
                        args: middlewares,
                    },
                ),
                ("meta", self.route_meta(route)),
            ],
        )
    }

    fn route_meta(&self, route: &RouteMetadata) -> Expr {
        let middleware_info = route
            .middleware_info
            .iter()
            .map(|info| {
                let args = info
                    .args
                    .iter()
                    .map(|(k, v)| Expr::Tuple(vec![Expr::str(k), Expr::str(v)]))
                    .collect();
                Expr::strukt(
                    self.rt("MiddlewareInfo"),
                    vec![
                        ("name", Expr::str(&info.name)),
                        ("args", Expr::slice(args)),
                        ("order", Expr::Int(info.order)),
                        ("description", Expr::str(&info.description)),
                    ],
                )
            })
            .collect();

        let parameters = route
            .parameters
            .iter()
            .map(|p| {
                Expr::strukt(
                    self.rt("ParamInfo"),
                    vec![
                        ("name", Expr::str(&p.name)),
                        ("param_type", Expr::str(&p.type_name)),
                        ("location", Expr::str(&p.location)),
                        ("required", Expr::Bool(p.required)),
                        ("description", Expr::str(&p.description)),
                        ("example", Expr::str(&p.example)),
                    ],
                )
            })
            .collect();

        let responses = route
            .responses
            .iter()
            .map(|r| {
                Expr::strukt(
                    self.rt("ResponseInfo"),
                    vec![
                        ("code", Expr::str(&r.code)),
                        ("description", Expr::str(&r.description)),
                        ("response_type", Expr::str(&r.type_name)),
                        ("example", Expr::str(&r.example)),
                    ],
                )
            })
            .collect();

        let request_body = route.request_body.as_ref().map(|b| {
            Expr::strukt(
                self.rt("RequestBodyInfo"),
                vec![
                    ("body_type", Expr::str(&b.type_name)),
                    ("description", Expr::str(&b.description)),
                    ("required", Expr::Bool(b.required)),
                ],
            )
        });

        let group = route.group.as_ref().map(|g| {
            Expr::strukt(
                self.rt("GroupInfo"),
                vec![
                    ("name", Expr::str(&g.name)),
                    ("prefix", Expr::str(&g.prefix)),
                    ("description", Expr::str(&g.description)),
                ],
            )
        });

        Expr::strukt(
            self.rt("RouteMeta"),
            vec![
                ("func_name", Expr::str(&route.func_name)),
                ("package", Expr::str(&route.package)),
                ("file_name", Expr::str(&route.file_name)),
                ("description", Expr::str(&route.description)),
                ("summary", Expr::str(&route.summary)),
                ("tags", Expr::str_slice(route.tags.clone())),
                ("middleware_info", Expr::slice(middleware_info)),
                ("parameters", Expr::slice(parameters)),
                ("responses", Expr::slice(responses)),
                ("request_body", Expr::option(request_body)),
                ("group", Expr::option(group)),
                ("websocket_handlers", Expr::str_slice(route.websocket_handlers.clone())),
            ],
        )
    }

    fn schemas(&self) -> Item {
        let schemas = self
            .ctx
            .schemas
            .iter()
            .map(|schema| {
                let fields = schema
                    .fields
                    .iter()
                    .map(|f| {
                        Expr::strukt(
                            self.rt("FieldInfo"),
                            vec![
                                ("name", Expr::str(&f.name)),
                                ("field_type", Expr::str(&f.type_name)),
                                ("json_name", Expr::str(&f.json_name)),
                                ("description", Expr::str(&f.description)),
                                ("required", Expr::Bool(f.required)),
                            ],
                        )
                    })
                    .collect();
                Expr::strukt(
                    self.rt("SchemaInfo"),
                    vec![
                        ("name", Expr::str(&schema.name)),
                        ("package", Expr::str(&schema.package)),
                        ("description", Expr::str(&schema.description)),
                        ("fields", Expr::slice(fields)),
                    ],
                )
            })
            .collect();

        Item::Const {
            docs: self.docs(&["Annotated schema types, for documentation."]),
            name: "SCHEMAS".to_string(),
            ty: format!("&[{}]", self.rt("SchemaInfo")),
            value: Expr::slice(schemas),
        }
    }
}
