//! Declaration-level validation errors
//!
//! These are collected across a whole scan and reported together, so an
//! annotation author can fix every problem in one pass.

use serde::{Deserialize, Serialize};

/// Machine-readable reason for a [`ValidationError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationCode {
    /// An argument-bearing marker line has no opening parenthesis
    MalformedDecorator,
    /// A marker line has an odd number of `"` characters
    UnmatchedQuotes,
    /// A marker line has unequal `(` and `)` counts
    UnmatchedParentheses,
    /// An argument token is empty after trimming and unquoting
    InvalidArguments,
    /// A marker received the wrong number of arguments
    InvalidArgumentCount,
    /// The routing method is not one of the supported verbs
    InvalidHttpMethod,
    /// The routing path does not start with `/`
    InvalidPath,
    /// A response marker lacks its code or description
    IncompleteResponse,
}

impl ValidationCode {
    /// The code as rendered in reports
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationCode::MalformedDecorator => "MALFORMED_DECORATOR",
            ValidationCode::UnmatchedQuotes => "UNMATCHED_QUOTES",
            ValidationCode::UnmatchedParentheses => "UNMATCHED_PARENTHESES",
            ValidationCode::InvalidArguments => "INVALID_ARGUMENTS",
            ValidationCode::InvalidArgumentCount => "INVALID_ARGUMENT_COUNT",
            ValidationCode::InvalidHttpMethod => "INVALID_HTTP_METHOD",
            ValidationCode::InvalidPath => "INVALID_PATH",
            ValidationCode::IncompleteResponse => "INCOMPLETE_RESPONSE",
        }
    }
}

impl std::fmt::Display for ValidationCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single problem tied to a source location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// File name (not the full path) the problem was found in
    pub file: String,

    /// 1-based line, or 0 when unknown
    pub line: usize,

    /// Human-readable description
    pub message: String,

    /// Machine-readable reason
    pub code: ValidationCode,
}

impl ValidationError {
    pub fn new(
        file: impl Into<String>,
        line: usize,
        code: ValidationCode,
        message: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            line,
            message: message.into(),
            code,
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.line > 0 {
            write!(f, "{}:{} - {}", self.file, self.line, self.message)
        } else {
            write!(f, "{} - {}", self.file, self.message)
        }
    }
}

impl std::error::Error for ValidationError {}

/// Ordered collection of validation errors from one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.errors.iter()
    }

    /// Codes of every collected error, in report order
    pub fn codes(&self) -> Vec<ValidationCode> {
        self.errors.iter().map(|e| e.code).collect()
    }

    /// `Ok(())` when empty, otherwise the collection itself
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl From<Vec<ValidationError>> for ValidationErrors {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self { errors }
    }
}

impl Extend<ValidationError> for ValidationErrors {
    fn extend<T: IntoIterator<Item = ValidationError>>(&mut self, iter: T) {
        self.errors.extend(iter);
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}
