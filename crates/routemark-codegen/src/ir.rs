//! Typed intermediate representation of the generated source file
//!
//! The generator lowers a [`GenerationContext`](crate::GenerationContext)
//! into these types and hands them to the [`Printer`](crate::printer::Printer).
//! Text from annotations only ever enters the output through [`Expr::Str`]
//! and comments, both of which the printer escapes or flattens.

/// A whole generated file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceFile {
    pub items: Vec<Item>,
}

/// Top-level item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    /// `// text`
    Comment(String),
    /// Empty line
    Blank,
    /// `use path;`
    Use(String),
    /// `pub fn name(params) { body }`
    Fn {
        docs: Vec<String>,
        name: String,
        params: Vec<Param>,
        body: Vec<Stmt>,
    },
    /// `pub const NAME: Ty = value;`
    Const {
        docs: Vec<String>,
        name: String,
        ty: String,
        value: Expr,
    },
}

/// Function parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub ty: String,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }
}

/// Statement inside a function body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    Comment(String),
    Blank,
    /// `expr;`
    Expr(Expr),
}

/// Expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// String literal, escaped on output
    Str(String),
    Int(usize),
    Bool(bool),
    /// Path such as `rt::create_auth_middleware` or `None`
    Path(String),
    /// `func(args)`
    Call { func: String, args: Vec<Expr> },
    /// `receiver.method(args)`
    MethodCall {
        receiver: String,
        method: String,
        args: Vec<Expr>,
    },
    /// `&expr`
    Ref(Box<Expr>),
    /// `[a, b]`
    Array(Vec<Expr>),
    /// `(a, b)`
    Tuple(Vec<Expr>),
    /// `name![a, b]`
    Macro { name: String, args: Vec<Expr> },
    /// `Path { field: value, .. }`
    Struct {
        path: String,
        fields: Vec<(String, Expr)>,
    },
}

impl Expr {
    pub fn str(value: impl Into<String>) -> Self {
        Expr::Str(value.into())
    }

    pub fn path(value: impl Into<String>) -> Self {
        Expr::Path(value.into())
    }

    /// `&["a", "b"]`
    pub fn str_slice<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Expr::Ref(Box::new(Expr::Array(
            values.into_iter().map(|v| Expr::Str(v.into())).collect(),
        )))
    }

    /// `&[items]`
    pub fn slice(items: Vec<Expr>) -> Self {
        Expr::Ref(Box::new(Expr::Array(items)))
    }

    /// `Some(expr)` or `None`
    pub fn option(value: Option<Expr>) -> Self {
        match value {
            Some(inner) => Expr::Call {
                func: "Some".to_string(),
                args: vec![inner],
            },
            None => Expr::Path("None".to_string()),
        }
    }

    pub fn call(func: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Call {
            func: func.into(),
            args,
        }
    }

    pub fn strukt(path: impl Into<String>, fields: Vec<(&str, Expr)>) -> Self {
        Expr::Struct {
            path: path.into(),
            fields: fields
                .into_iter()
                .map(|(name, value)| (name.to_string(), value))
                .collect(),
        }
    }

    /// Fits on one line in the multi-line layout
    pub fn is_simple(&self) -> bool {
        match self {
            Expr::Str(_) | Expr::Int(_) | Expr::Bool(_) | Expr::Path(_) => true,
            Expr::Ref(inner) => inner.is_simple(),
            Expr::Array(items) | Expr::Tuple(items) => items.iter().all(Expr::is_simple),
            Expr::Call { args, .. } | Expr::MethodCall { args, .. } | Expr::Macro { args, .. } => {
                args.iter().all(Expr::is_simple)
            }
            Expr::Struct { fields, .. } => fields.is_empty(),
        }
    }
}
