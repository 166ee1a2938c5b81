//! Structural check of a generated file

use routemark_core::{GeneratorConfig, PostValidationError};
use std::path::Path;
use syn::visit::Visit;

/// Re-reads a generated file and checks it has the expected shape
///
/// The file must parse as Rust, import something, define the entry point,
/// and make at least one registration call inside it.
#[derive(Debug, Clone)]
pub struct PostValidator {
    entry_point: String,
    registration_fn: String,
}

impl PostValidator {
    pub fn new(entry_point: impl Into<String>, registration_fn: impl Into<String>) -> Self {
        Self {
            entry_point: entry_point.into(),
            registration_fn: registration_fn.into(),
        }
    }

    pub fn for_config(config: &GeneratorConfig) -> Self {
        Self::new(&config.entry_point, &config.registration_fn)
    }

    pub fn validate(&self, path: &Path) -> Result<(), PostValidationError> {
        if !path.exists() {
            return Err(PostValidationError::Missing(path.to_path_buf()));
        }
        let source = std::fs::read_to_string(path).map_err(|source| PostValidationError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if source.trim().is_empty() {
            return Err(PostValidationError::Empty(path.to_path_buf()));
        }
        self.validate_source(&source)?;
        tracing::debug!(path = %path.display(), "generated file validated");
        Ok(())
    }

    pub fn validate_source(&self, source: &str) -> Result<(), PostValidationError> {
        let file = syn::parse_file(source).map_err(|err| {
            let start = err.span().start();
            PostValidationError::Syntax {
                line: start.line,
                column: start.column + 1,
                message: err.to_string(),
            }
        })?;

        if !file.items.iter().any(|item| matches!(item, syn::Item::Use(_))) {
            return Err(PostValidationError::MissingImports);
        }

        let entry = file
            .items
            .iter()
            .find_map(|item| match item {
                syn::Item::Fn(f) if f.sig.ident == self.entry_point => Some(f),
                _ => None,
            })
            .ok_or_else(|| PostValidationError::MissingEntryPoint(self.entry_point.clone()))?;

        let mut finder = CallFinder {
            name: &self.registration_fn,
            found: false,
        };
        finder.visit_item_fn(entry);
        if !finder.found {
            return Err(PostValidationError::MissingRegistrations {
                entry_point: self.entry_point.clone(),
                registration_fn: self.registration_fn.clone(),
            });
        }
        Ok(())
    }
}

/// Looks for `x.name(..)` or `path::name(..)`
struct CallFinder<'a> {
    name: &'a str,
    found: bool,
}

impl<'ast> Visit<'ast> for CallFinder<'_> {
    fn visit_expr_method_call(&mut self, call: &'ast syn::ExprMethodCall) {
        if call.method == self.name {
            self.found = true;
        }
        syn::visit::visit_expr_method_call(self, call);
    }

    fn visit_expr_call(&mut self, call: &'ast syn::ExprCall) {
        if let syn::Expr::Path(path) = call.func.as_ref()
            && path.path.segments.last().is_some_and(|s| s.ident == self.name)
        {
            self.found = true;
        }
        syn::visit::visit_expr_call(self, call);
    }
}

#[cfg(test)]
#[path = "validate/validate_tests.rs"]
mod validate_tests;
