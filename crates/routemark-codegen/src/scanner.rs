//! Source tree scanning
//!
//! Walks a directory of Rust sources, parses every file with [`syn`], and
//! collects the documented declarations whose comments mention a registered
//! marker. A file that does not parse stops the scan.

use routemark_core::{FieldMetadata, MarkerRegistry, RoutemarkError, RoutemarkResult};
use std::path::{Path, PathBuf};
use syn::spanned::Spanned;
use syn::{Attribute, Expr, Fields, Item, LitStr, Meta, Token, Type};
use walkdir::WalkDir;

/// One line of a documentation comment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocLine {
    /// Trimmed comment text
    pub text: String,

    /// 1-based source line
    pub line: usize,
}

/// The documentation comment of one declaration, line by line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocBlock {
    pub lines: Vec<DocLine>,
}

impl DocBlock {
    pub fn new(lines: Vec<DocLine>) -> Self {
        Self { lines }
    }

    /// Build a block from plain text, numbering lines from `first_line`
    pub fn from_text(text: &str, first_line: usize) -> Self {
        let lines = text
            .lines()
            .enumerate()
            .map(|(i, line)| {
                let line_text = line.trim();
                // block comments keep their leading `*` gutter
                let line_text = line_text.strip_prefix('*').unwrap_or(line_text).trim();
                DocLine {
                    text: line_text.to_string(),
                    line: first_line + i,
                }
            })
            .filter(|line| !line.text.is_empty())
            .collect();
        Self { lines }
    }

    /// Lines joined with `\n`
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Lines that are not marker lines, joined with a space
    pub fn prose(&self) -> String {
        self.lines
            .iter()
            .filter(|l| !l.text.starts_with(routemark_core::SIGIL))
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// What kind of item carried the comment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    Function,
    Struct,
}

/// A documented declaration that mentions at least one marker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDeclaration {
    pub name: String,
    pub kind: DeclarationKind,

    /// Module path relative to the scan root, `::`-joined
    pub package: String,

    /// File name without directories
    pub file_name: String,

    pub path: PathBuf,

    /// Line of the item's name
    pub line: usize,

    pub docs: DocBlock,

    /// Named fields, for structs
    pub fields: Vec<FieldMetadata>,
}

/// Finds annotated declarations under a root directory
pub struct Scanner<'a> {
    registry: &'a MarkerRegistry,
}

impl<'a> Scanner<'a> {
    pub fn new(registry: &'a MarkerRegistry) -> Self {
        Self { registry }
    }

    /// Scan every `.rs` file under `root`, in sorted path order
    pub fn scan(&self, root: &Path) -> RoutemarkResult<Vec<SourceDeclaration>> {
        let files = collect_source_files(root)?;
        tracing::debug!(root = %root.display(), files = files.len(), "scanning source tree");

        let mut declarations = Vec::new();
        for file in files {
            let source = std::fs::read_to_string(&file).map_err(|source| {
                RoutemarkError::ReadFile {
                    path: file.clone(),
                    source,
                }
            })?;
            let package = module_path(root, &file);
            declarations.extend(self.scan_source(&source, &file, &package)?);
        }
        Ok(declarations)
    }

    /// Scan one file's contents
    pub fn scan_source(
        &self,
        source: &str,
        path: &Path,
        package: &str,
    ) -> RoutemarkResult<Vec<SourceDeclaration>> {
        let file = syn::parse_file(source).map_err(|err| {
            let proc_macro2::LineColumn { line, column } = err.span().start();
            RoutemarkError::Parse {
                file: path.to_path_buf(),
                line,
                column: column + 1,
                message: err.to_string(),
            }
        })?;

        let mut found = Vec::new();
        self.visit_items(&file.items, path, package, &mut found);
        Ok(found)
    }

    fn visit_items(
        &self,
        items: &[Item],
        path: &Path,
        package: &str,
        found: &mut Vec<SourceDeclaration>,
    ) {
        for item in items {
            match item {
                Item::Fn(f) => {
                    self.consider(&f.sig.ident, DeclarationKind::Function, &f.attrs, Vec::new(), path, package, found);
                }
                Item::Struct(s) => {
                    let fields = struct_fields(&s.fields);
                    self.consider(&s.ident, DeclarationKind::Struct, &s.attrs, fields, path, package, found);
                }
                Item::Mod(m) => {
                    if let Some((_, content)) = &m.content {
                        let nested = join_module(package, &m.ident.to_string());
                        self.visit_items(content, path, &nested, found);
                    }
                }
                _ => {}
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn consider(
        &self,
        ident: &syn::Ident,
        kind: DeclarationKind,
        attrs: &[Attribute],
        fields: Vec<FieldMetadata>,
        path: &Path,
        package: &str,
        found: &mut Vec<SourceDeclaration>,
    ) {
        let docs = extract_docs(attrs);
        if docs.is_empty() || !self.registry.mentions_marker(&docs.text()) {
            return;
        }

        tracing::trace!(name = %ident, package = %package, "annotated declaration found");
        found.push(SourceDeclaration {
            name: ident.to_string(),
            kind,
            package: package.to_string(),
            file_name: file_name(path),
            path: path.to_path_buf(),
            line: ident.span().start().line,
            docs,
            fields,
        });
    }
}

/// Every `.rs` file under `root`, sorted, skipping `target/` and hidden entries
pub fn collect_source_files(root: &Path) -> RoutemarkResult<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(RoutemarkError::ReadDir {
            path: root.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
        });
    }

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_skipped(entry.file_name()));

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|err| RoutemarkError::ReadDir {
            path: err.path().unwrap_or(root).to_path_buf(),
            source: err.into(),
        })?;
        if entry.file_type().is_file() && entry.path().extension().is_some_and(|ext| ext == "rs") {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn is_skipped(name: &std::ffi::OsStr) -> bool {
    let name = name.to_string_lossy();
    name.starts_with('.') || name == "target"
}

/// Module path of `file` relative to `root`
///
/// `users.rs` -> `users`, `admin/mod.rs` -> `admin`, a root-level `lib.rs`
/// or `main.rs` -> empty.
pub fn module_path(root: &Path, file: &Path) -> String {
    let relative = file.strip_prefix(root).unwrap_or(file);
    let mut segments: Vec<String> = relative
        .with_extension("")
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();

    match segments.last().map(String::as_str) {
        Some("mod") => {
            segments.pop();
        }
        Some("lib") | Some("main") if segments.len() == 1 => {
            segments.pop();
        }
        _ => {}
    }
    segments.join("::")
}

fn join_module(package: &str, name: &str) -> String {
    if package.is_empty() {
        name.to_string()
    } else {
        format!("{package}::{name}")
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Collect `#[doc]` attributes into a numbered block
///
/// Block comments (`/** */`) arrive as one attribute and are split into lines.
pub fn extract_docs(attrs: &[Attribute]) -> DocBlock {
    let mut lines = Vec::new();

    for attr in attrs {
        if !attr.path().is_ident("doc") {
            continue;
        }
        if let Meta::NameValue(meta) = &attr.meta {
            if let syn::Expr::Lit(expr_lit) = &meta.value {
                if let syn::Lit::Str(lit_str) = &expr_lit.lit {
                    let first_line = attr.span().start().line;
                    lines.extend(DocBlock::from_text(&lit_str.value(), first_line).lines);
                }
            }
        }
    }

    DocBlock::new(lines)
}

fn struct_fields(fields: &Fields) -> Vec<FieldMetadata> {
    let Fields::Named(named) = fields else {
        return Vec::new();
    };

    named
        .named
        .iter()
        .filter_map(|field| {
            let name = field.ident.as_ref()?.to_string();
            let (type_name, optional) = field_type(&field.ty);
            Some(FieldMetadata {
                json_name: extract_serde_rename(&field.attrs).unwrap_or_else(|| name.clone()),
                description: extract_docs(&field.attrs).prose(),
                required: !optional,
                type_name,
                name,
            })
        })
        .collect()
}

/// `rename = "..."` from a field's `#[serde(..)]` attributes, in any position
fn extract_serde_rename(attrs: &[Attribute]) -> Option<String> {
    let mut rename = None;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
        // Attributes serde itself would reject just yield no rename.
        let _ = attr.parse_nested_meta(|meta| {
            if meta.input.peek(Token![=]) {
                let value = meta.value()?;
                if meta.path.is_ident("rename") {
                    rename = Some(value.parse::<LitStr>()?.value());
                } else {
                    value.parse::<Expr>()?;
                }
            } else if meta.input.peek(syn::token::Paren) {
                let nested;
                syn::parenthesized!(nested in meta.input);
                nested.parse::<proc_macro2::TokenStream>()?;
            }
            Ok(())
        });
    }
    rename
}

/// Type text as written, unwrapping `Option<T>` to `T`
fn field_type(ty: &Type) -> (String, bool) {
    if let Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            if segment.ident == "Option" {
                if let syn::PathArguments::AngleBracketed(args) = &segment.arguments {
                    if let Some(syn::GenericArgument::Type(inner)) = args.args.first() {
                        return (type_text(inner), true);
                    }
                }
            }
        }
    }
    (type_text(ty), false)
}

fn type_text(ty: &Type) -> String {
    quote::quote!(#ty)
        .to_string()
        .replace(" :: ", "::")
        .replace(" < ", "<")
        .replace("< ", "<")
        .replace(" >", ">")
        .replace(" ,", ",")
        .replace("& ", "&")
}
