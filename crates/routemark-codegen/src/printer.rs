//! Rendering of the IR to Rust source text

use crate::ir::{Expr, Item, SourceFile, Stmt};
use std::fmt::Write as _;

const INDENT: &str = "    ";

/// How expressions are laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// One struct field or collection element per line
    Multiline,
    /// Every statement on a single line
    Compact,
}

/// Writes a [`SourceFile`] as Rust source
#[derive(Debug)]
pub struct Printer {
    layout: Layout,
    out: String,
}

impl Printer {
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            out: String::new(),
        }
    }

    pub fn print(mut self, file: &SourceFile) -> String {
        for item in &file.items {
            self.item(item);
        }
        self.out
    }

    fn item(&mut self, item: &Item) {
        match item {
            Item::Comment(text) => self.line(0, &format!("// {}", flatten_comment(text))),
            Item::Blank => self.blank(),
            Item::Use(path) => self.line(0, &format!("use {path};")),
            Item::Fn {
                docs,
                name,
                params,
                body,
            } => {
                self.docs(docs);
                let params = params
                    .iter()
                    .map(|p| format!("{}: {}", p.name, p.ty))
                    .collect::<Vec<_>>()
                    .join(", ");
                self.line(0, &format!("pub fn {name}({params}) {{"));
                for stmt in body {
                    self.stmt(stmt);
                }
                self.line(0, "}");
            }
            Item::Const {
                docs,
                name,
                ty,
                value,
            } => {
                self.docs(docs);
                let mut text = format!("pub const {name}: {ty} = ");
                self.expr(&mut text, value, 0);
                text.push(';');
                self.line(0, &text);
            }
        }
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Comment(text) => self.line(1, &format!("// {}", flatten_comment(text))),
            Stmt::Blank => self.blank(),
            Stmt::Expr(expr) => {
                let mut text = String::new();
                self.expr(&mut text, expr, 1);
                text.push(';');
                self.line(1, &text);
            }
        }
    }

    fn docs(&mut self, docs: &[String]) {
        for doc in docs {
            self.line(0, &format!("/// {}", flatten_comment(doc)));
        }
    }

    fn blank(&mut self) {
        if self.layout == Layout::Multiline {
            self.out.push('\n');
        }
    }

    fn line(&mut self, indent: usize, text: &str) {
        for _ in 0..indent {
            self.out.push_str(INDENT);
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn multiline(&self, expr: &Expr) -> bool {
        self.layout == Layout::Multiline && !expr.is_simple()
    }

    /// Append `expr` to `out`; continuation lines are indented past `indent`
    fn expr(&self, out: &mut String, expr: &Expr, indent: usize) {
        match expr {
            Expr::Str(value) => out.push_str(&escape_str(value)),
            Expr::Int(value) => {
                let _ = write!(out, "{value}");
            }
            Expr::Bool(value) => {
                let _ = write!(out, "{value}");
            }
            Expr::Path(path) => out.push_str(path),
            Expr::Call { func, args } => {
                out.push_str(func);
                self.args(out, args, indent, "(", ")");
            }
            Expr::MethodCall {
                receiver,
                method,
                args,
            } => {
                let _ = write!(out, "{receiver}.{method}");
                self.args(out, args, indent, "(", ")");
            }
            Expr::Ref(inner) => {
                out.push('&');
                self.expr(out, inner, indent);
            }
            Expr::Array(items) => self.list(out, items, indent, "[", "]"),
            Expr::Tuple(items) => self.args(out, items, indent, "(", ")"),
            Expr::Macro { name, args } => {
                let _ = write!(out, "{name}!");
                self.list(out, args, indent, "[", "]");
            }
            Expr::Struct { path, fields } => {
                out.push_str(path);
                if fields.is_empty() {
                    out.push_str(" {}");
                } else if self.multiline(expr) {
                    out.push_str(" {\n");
                    for (name, value) in fields {
                        push_indent(out, indent + 1);
                        let _ = write!(out, "{name}: ");
                        self.expr(out, value, indent + 1);
                        out.push_str(",\n");
                    }
                    push_indent(out, indent);
                    out.push('}');
                } else {
                    out.push_str(" { ");
                    for (i, (name, value)) in fields.iter().enumerate() {
                        if i > 0 {
                            out.push_str(", ");
                        }
                        let _ = write!(out, "{name}: ");
                        self.expr(out, value, indent);
                    }
                    out.push_str(" }");
                }
            }
        }
    }

    /// Call arguments stay inline; a multi-line argument opens on the same line
    fn args(&self, out: &mut String, args: &[Expr], indent: usize, open: &str, close: &str) {
        out.push_str(open);
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            self.expr(out, arg, indent);
        }
        out.push_str(close);
    }

    /// Collection elements go one per line once any of them is not simple
    fn list(&self, out: &mut String, items: &[Expr], indent: usize, open: &str, close: &str) {
        let spread = self.layout == Layout::Multiline && !items.iter().all(Expr::is_simple);
        if !spread {
            self.args(out, items, indent, open, close);
            return;
        }

        out.push_str(open);
        out.push('\n');
        for item in items {
            push_indent(out, indent + 1);
            self.expr(out, item, indent + 1);
            out.push_str(",\n");
        }
        push_indent(out, indent);
        out.push_str(close);
    }
}

fn push_indent(out: &mut String, indent: usize) {
    for _ in 0..indent {
        out.push_str(INDENT);
    }
}

/// Quote `value` as a Rust string literal
///
/// The result never contains a raw line break, and parsing it back yields
/// `value` unchanged. Control characters and bidirectional overrides are
/// written as escapes.
pub fn escape_str(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            c if c.is_control() || is_bidi_control(c) => {
                let _ = write!(out, "\\u{{{:x}}}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn is_bidi_control(c: char) -> bool {
    matches!(c, '\u{202A}'..='\u{202E}' | '\u{2066}'..='\u{2069}')
}

/// Collapse a comment to one line
pub fn flatten_comment(text: &str) -> String {
    text.split(|c: char| c == '\n' || c == '\r' || c.is_control() || is_bidi_control(c))
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
