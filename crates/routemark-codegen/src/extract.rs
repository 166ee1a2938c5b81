//! Marker extraction and declaration-level validation
//!
//! Each comment block goes through a syntax pass first. A block that fails
//! it produces exactly one error and nothing else. Otherwise every line is
//! tokenized once, dispatching on `@Name`, and each occurrence of a
//! registered marker has its arguments split, counted, and (for routing
//! markers) checked against the allowed methods and path shape.

use crate::scanner::{DocBlock, DocLine};
use routemark_core::builtins::VALID_METHODS;
use routemark_core::{
    MarkerInstance, MarkerKind, MarkerRegistry, SIGIL, ValidationCode, ValidationError, strip_quotes,
};

/// Markers and problems found in one comment block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Valid occurrences in source order
    pub markers: Vec<MarkerInstance>,
    pub errors: Vec<ValidationError>,
}

impl Extraction {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Matches comment blocks against a marker registry
pub struct Extractor<'a> {
    registry: &'a MarkerRegistry,
}

impl<'a> Extractor<'a> {
    pub fn new(registry: &'a MarkerRegistry) -> Self {
        Self { registry }
    }

    /// Extract and validate every marker in `docs`
    pub fn extract(&self, docs: &DocBlock, file_name: &str) -> Extraction {
        if let Some(error) = self.check_syntax(docs, file_name) {
            return Extraction {
                markers: Vec::new(),
                errors: vec![error],
            };
        }

        let mut extraction = Extraction::default();
        for line in &docs.lines {
            for token in self.tokenize(&line.text) {
                match self.validate(token, line, file_name) {
                    Ok(marker) => extraction.markers.push(marker),
                    Err(errors) => extraction.errors.extend(errors),
                }
            }
        }
        extraction
    }

    /// First structural problem on a line that starts with a marker
    fn check_syntax(&self, docs: &DocBlock, file_name: &str) -> Option<ValidationError> {
        for line in &docs.lines {
            let Some(rest) = line.text.strip_prefix(SIGIL) else {
                continue;
            };
            let Some(definition) = self.registry.lookup(leading_ident(rest)) else {
                continue;
            };

            let problem = if definition.arity.requires_args() && !line.text.contains('(') {
                Some((
                    ValidationCode::MalformedDecorator,
                    format!("malformed marker `{}`: missing parentheses", line.text),
                ))
            } else if line.text.matches('"').count() % 2 != 0 {
                Some((
                    ValidationCode::UnmatchedQuotes,
                    format!("unmatched quotes in `{}`", line.text),
                ))
            } else if line.text.matches('(').count() != line.text.matches(')').count() {
                Some((
                    ValidationCode::UnmatchedParentheses,
                    format!("unmatched parentheses in `{}`", line.text),
                ))
            } else {
                None
            };

            if let Some((code, message)) = problem {
                return Some(ValidationError::new(file_name, line.line, code, message));
            }
        }
        None
    }

    /// Registered marker occurrences on one line, in order
    fn tokenize<'t>(&self, text: &'t str) -> Vec<RawMarker<'t>> {
        let mut found = Vec::new();
        let mut pos = 0;

        while let Some(offset) = text[pos..].find(SIGIL) {
            let start = pos + offset;
            pos = start + SIGIL.len_utf8();

            // `user@example.com` is not a marker
            if text[..start].chars().next_back().is_some_and(is_ident_char) {
                continue;
            }
            let name = leading_ident(&text[pos..]);
            if name.is_empty() || self.registry.lookup(name).is_none() {
                continue;
            }

            let name_end = pos + name.len();
            let (end, args) = if text[name_end..].starts_with('(') {
                match matching_paren(text, name_end) {
                    Some(close) => (close + 1, Args::Text(&text[name_end + 1..close])),
                    None => (text.len(), Args::Unterminated),
                }
            } else {
                (name_end, Args::Bare)
            };

            found.push(RawMarker {
                name,
                raw: &text[start..end],
                args,
            });
            pos = end;
        }
        found
    }

    fn validate(
        &self,
        token: RawMarker<'_>,
        line: &DocLine,
        file_name: &str,
    ) -> Result<MarkerInstance, Vec<ValidationError>> {
        let error = |code, message: String| ValidationError::new(file_name, line.line, code, message);

        let Some(definition) = self.registry.lookup(token.name) else {
            return Err(Vec::new());
        };

        let args = match token.args {
            Args::Bare => Vec::new(),
            Args::Text(inner) => split_args(inner),
            Args::Unterminated => {
                return Err(vec![error(
                    ValidationCode::UnmatchedParentheses,
                    format!("unterminated arguments in `{}`", token.raw),
                )]);
            }
        };

        if args.iter().any(String::is_empty) {
            return Err(vec![error(
                ValidationCode::InvalidArguments,
                format!("empty argument in `{}`", token.raw),
            )]);
        }

        if let Err(expected) = definition.arity.check(args.len()) {
            return Err(vec![error(
                ValidationCode::InvalidArgumentCount,
                format!(
                    "wrong argument count for {}: expected {expected}",
                    definition.pattern
                ),
            )]);
        }

        if definition.kind == MarkerKind::Routing {
            let method = args.first().map_or("", String::as_str);
            let path = args.get(1).map_or("", String::as_str);
            let mut errors = Vec::new();
            if !VALID_METHODS.contains(&method) {
                errors.push(error(
                    ValidationCode::InvalidHttpMethod,
                    format!("invalid HTTP method `{method}` in `{}`", token.raw),
                ));
            }
            if !path.starts_with('/') {
                errors.push(error(
                    ValidationCode::InvalidPath,
                    format!("invalid path `{path}` in `{}`: must start with `/`", token.raw),
                ));
            }
            if !errors.is_empty() {
                return Err(errors);
            }
        }

        let mut marker = MarkerInstance::new(token.name, token.raw, args);
        marker.line = line.line;
        Ok(marker)
    }
}

/// One marker occurrence before validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RawMarker<'t> {
    name: &'t str,
    raw: &'t str,
    args: Args<'t>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Args<'t> {
    /// Written without parentheses
    Bare,
    /// Text between the parentheses
    Text(&'t str),
    /// `(` with no matching `)`
    Unterminated,
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn leading_ident(text: &str) -> &str {
    let end = text
        .char_indices()
        .find(|(_, c)| !is_ident_char(*c))
        .map_or(text.len(), |(i, _)| i);
    &text[..end]
}

/// Tracks whether the scan position is inside a quoted argument
///
/// `"` always opens a quote. `'` only opens one at the start of a token, so
/// apostrophes in bare prose do not.
struct QuoteState {
    quote: Option<char>,
    escaped: bool,
    token_start: bool,
}

impl QuoteState {
    fn new() -> Self {
        Self {
            quote: None,
            escaped: false,
            token_start: true,
        }
    }

    /// Feed one character; true when it is structural (outside quotes)
    fn feed(&mut self, c: char) -> bool {
        if let Some(quote) = self.quote {
            if self.escaped {
                self.escaped = false;
            } else if c == '\\' {
                self.escaped = true;
            } else if c == quote {
                self.quote = None;
            }
            return false;
        }

        if c == '"' || (c == '\'' && self.token_start) {
            self.quote = Some(c);
            self.token_start = false;
            return false;
        }

        self.token_start = matches!(c, '(' | ',' | '=') || (self.token_start && c.is_whitespace());
        true
    }
}

/// Byte index of the `)` that closes the `(` at `open`
fn matching_paren(text: &str, open: usize) -> Option<usize> {
    let mut state = QuoteState::new();
    let mut depth = 0usize;

    for (i, c) in text[open..].char_indices() {
        if !state.feed(c) {
            continue;
        }
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 && c == ')' {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split argument text on top-level commas, trimming and unquoting each token
///
/// Empty text yields no arguments; an empty token is kept as `""` so the
/// caller can report it.
pub fn split_args(inner: &str) -> Vec<String> {
    if inner.trim().is_empty() {
        return Vec::new();
    }

    let mut state = QuoteState::new();
    let mut depth = 0usize;
    let mut tokens = Vec::new();
    let mut start = 0;

    for (i, c) in inner.char_indices() {
        if !state.feed(c) {
            continue;
        }
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                tokens.push(&inner[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    tokens.push(&inner[start..]);

    tokens
        .into_iter()
        .map(|token| strip_quotes(token.trim()).to_string())
        .collect()
}
