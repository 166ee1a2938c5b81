//! Route, websocket, and schema metadata
//!
//! A [`RouteMetadata`] is built once per annotated declaration. The assembler
//! is the only writer; after assembly the record is handed to hooks and the
//! generator by shared reference or by value and is not mutated again.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One marker occurrence inside a comment block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerInstance {
    /// Marker name without the sigil (`Auth`, `Route`, ...)
    pub name: String,

    /// Matched text, from `@` through the closing parenthesis
    pub raw: String,

    /// Parsed arguments in source order
    pub args: Vec<String>,

    /// 1-based source line the marker starts on
    pub line: usize,
}

impl MarkerInstance {
    pub fn new(name: impl Into<String>, raw: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            name: name.into(),
            raw: raw.into(),
            args,
            line: 0,
        }
    }

    /// Value of the first `key=value` argument with the given key
    pub fn named_arg(&self, key: &str) -> Option<&str> {
        self.args
            .iter()
            .filter_map(|arg| split_key_value(arg))
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v)
    }

    /// Arguments that are not `key=value` pairs
    pub fn positional_args(&self) -> impl Iterator<Item = &str> {
        self.args
            .iter()
            .filter(|arg| split_key_value(arg).is_none())
            .map(String::as_str)
    }
}

/// Split `key=value`, trimming both sides and one layer of quotes off the value
pub fn split_key_value(arg: &str) -> Option<(&str, &str)> {
    let (key, value) = arg.split_once('=')?;
    let key = key.trim();
    if key.is_empty() || key.contains(['"', '\'', ' ']) {
        return None;
    }
    Some((key, strip_quotes(value.trim())))
}

/// Remove one layer of matching `"` or `'` quotes
pub fn strip_quotes(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if first == last && (first == b'"' || first == b'\'') {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Typed middleware-call expression
///
/// Printed by the generator as `<alias>::<factory>(&["arg", ...])`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiddlewareCall {
    /// Behavior factory function in the runtime crate
    pub factory: String,

    /// Raw marker arguments passed to the factory
    pub args: Vec<String>,
}

impl MiddlewareCall {
    pub fn new(factory: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            factory: factory.into(),
            args,
        }
    }
}

/// Descriptor of an applied behavior marker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiddlewareInfo {
    pub name: String,

    /// `key=value` arguments by key; positional ones under `value`
    pub args: BTreeMap<String, String>,

    /// Position in the route's middleware chain
    pub order: usize,

    pub description: String,
}

impl MiddlewareInfo {
    /// Build a descriptor, folding raw arguments into a map
    pub fn new(name: impl Into<String>, args: &[String], order: usize, description: impl Into<String>) -> Self {
        let mut map = BTreeMap::new();
        for arg in args {
            match split_key_value(arg) {
                Some((key, value)) => {
                    map.insert(key.to_string(), value.to_string());
                }
                None => {
                    map.insert("value".to_string(), strip_quotes(arg).to_string());
                }
            }
        }
        Self {
            name: name.into(),
            args: map,
            order,
            description: description.into(),
        }
    }
}

/// A documented request parameter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterMetadata {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    /// `path`, `query`, `header`, or `body`
    pub location: String,
    pub required: bool,
    pub description: String,
    pub example: String,
}

/// A documented response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseMetadata {
    /// Status code as written (`"200"`)
    pub code: String,
    pub description: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub example: String,
}

impl ResponseMetadata {
    /// A response is only documented when it has both code and description
    pub fn is_complete(&self) -> bool {
        !self.code.is_empty() && !self.description.is_empty()
    }
}

/// A documented request body
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestBodyMetadata {
    #[serde(rename = "type")]
    pub type_name: String,
    pub description: String,
    pub required: bool,
}

/// A named path-prefix and tag bundle shared by several routes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMetadata {
    pub name: String,
    pub prefix: String,
    pub description: String,
}

impl GroupMetadata {
    pub fn new(
        name: impl Into<String>,
        prefix: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            prefix: prefix.into(),
            description: description.into(),
        }
    }
}

/// Everything known about one annotated handler
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteMetadata {
    /// HTTP method; empty for websocket-only records
    pub method: String,

    /// Route path; empty for websocket-only records
    pub path: String,

    pub func_name: String,

    /// Module path relative to the scan root, `::`-joined
    pub package: String,

    pub file_name: String,

    /// Line of the declaration
    pub line: usize,

    pub markers: Vec<MarkerInstance>,

    pub middleware_calls: Vec<MiddlewareCall>,

    pub middleware_info: Vec<MiddlewareInfo>,

    pub description: String,

    pub summary: String,

    pub tags: Vec<String>,

    pub parameters: Vec<ParameterMetadata>,

    pub responses: Vec<ResponseMetadata>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<RequestBodyMetadata>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<GroupMetadata>,

    /// Websocket message types this handler serves
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub websocket_handlers: Vec<String>,
}

impl RouteMetadata {
    /// A record with an HTTP binding
    pub fn route(
        method: impl Into<String>,
        path: impl Into<String>,
        func_name: impl Into<String>,
    ) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            func_name: func_name.into(),
            ..Self::default()
        }
    }

    /// A record with websocket bindings only
    pub fn websocket_only(func_name: impl Into<String>) -> Self {
        Self {
            func_name: func_name.into(),
            ..Self::default()
        }
    }

    /// True when the record has no HTTP binding
    pub fn is_websocket_only(&self) -> bool {
        self.method.is_empty() && self.path.is_empty()
    }

    /// Add a tag unless already present
    pub fn add_tag(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        if !tag.is_empty() && !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
    }

    /// Whether any marker with this name was found
    pub fn has_marker(&self, name: &str) -> bool {
        self.markers.iter().any(|m| m.name == name)
    }
}

/// A documented field of a schema struct
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMetadata {
    pub name: String,

    /// Type as written in source
    #[serde(rename = "type")]
    pub type_name: String,

    /// Serialized name (`#[serde(rename = "...")]` or the field name)
    pub json_name: String,

    pub description: String,

    /// False for `Option<_>` fields
    pub required: bool,
}

/// A struct annotated with `@Schema`, kept for documentation context only
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaMetadata {
    pub name: String,
    pub package: String,
    pub file_name: String,
    pub description: String,
    pub fields: Vec<FieldMetadata>,
}

#[cfg(test)]
#[path = "model/model_tests.rs"]
mod model_tests;
