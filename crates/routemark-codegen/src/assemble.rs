//! Reduction of validated markers into metadata records
//!
//! Assembly never fails on argument content: arguments that do not fit a
//! field leave it empty. The only error it can produce is
//! `INCOMPLETE_RESPONSE`, and only in strict mode.

use crate::scanner::{DeclarationKind, SourceDeclaration};
use routemark_core::builtins::{
    DESCRIPTION, GROUP, PARAM, REQUEST_BODY, RESPONSE, ROUTE, SCHEMA, SUMMARY, TAG, WEBSOCKET,
};
use routemark_core::{
    GroupRegistry, MarkerInstance, MarkerRegistry, MiddlewareInfo, ParameterMetadata,
    RequestBodyMetadata, ResponseMetadata, RouteMetadata, SchemaMetadata, ValidationCode,
    ValidationError, split_key_value, strip_quotes,
};

/// What one declaration assembled into
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assembled {
    pub route: Option<RouteMetadata>,
    pub schema: Option<SchemaMetadata>,
    pub errors: Vec<ValidationError>,
}

/// Builds records from a declaration and its markers
pub struct Assembler<'a> {
    markers: &'a MarkerRegistry,
    groups: &'a GroupRegistry,
    strict_responses: bool,
}

impl<'a> Assembler<'a> {
    pub fn new(markers: &'a MarkerRegistry, groups: &'a GroupRegistry) -> Self {
        Self {
            markers,
            groups,
            strict_responses: false,
        }
    }

    /// Report incomplete responses instead of dropping them
    pub fn strict_responses(mut self, strict: bool) -> Self {
        self.strict_responses = strict;
        self
    }

    pub fn assemble(&self, decl: &SourceDeclaration, markers: &[MarkerInstance]) -> Assembled {
        match decl.kind {
            DeclarationKind::Function => self.assemble_function(decl, markers),
            DeclarationKind::Struct => Assembled {
                schema: assemble_schema(decl, markers),
                ..Assembled::default()
            },
        }
    }

    fn assemble_function(&self, decl: &SourceDeclaration, markers: &[MarkerInstance]) -> Assembled {
        let mut assembled = Assembled::default();

        let mut routes = markers.iter().filter(|m| m.name == ROUTE);
        let mut route = match routes.next() {
            Some(marker) => {
                for repeated in routes {
                    tracing::warn!(
                        file = %decl.file_name,
                        line = repeated.line,
                        handler = %decl.name,
                        "repeated {} ignored, the first one applies",
                        repeated.raw
                    );
                }
                let method = marker.args.first().map_or("", String::as_str);
                let path = marker.args.get(1).map_or("", String::as_str);
                RouteMetadata::route(method, path, &decl.name)
            }
            None if markers.iter().any(|m| m.name == WEBSOCKET && !m.args.is_empty()) => {
                RouteMetadata::websocket_only(&decl.name)
            }
            None => {
                tracing::debug!(handler = %decl.name, "no routing marker, declaration skipped");
                return assembled;
            }
        };

        route.package = decl.package.clone();
        route.file_name = decl.file_name.clone();
        route.line = decl.line;
        route.markers = markers.to_vec();

        for marker in markers {
            self.apply(&mut route, marker, decl, &mut assembled.errors);
        }

        if let Some(group) = &route.group {
            if !route.is_websocket_only() && !route.path.starts_with(&group.prefix) {
                route.path = format!("{}{}", group.prefix.trim_end_matches('/'), route.path);
            }
        }

        assembled.route = Some(route);
        assembled
    }

    fn apply(
        &self,
        route: &mut RouteMetadata,
        marker: &MarkerInstance,
        decl: &SourceDeclaration,
        errors: &mut Vec<ValidationError>,
    ) {
        if let Some(definition) = self.markers.lookup(&marker.name) {
            if let Some(call) = definition.build_call(&marker.args) {
                let order = route.middleware_calls.len();
                route.middleware_calls.push(call);
                route.middleware_info.push(MiddlewareInfo::new(
                    &marker.name,
                    &marker.args,
                    order,
                    &definition.description,
                ));
            }
        }

        match marker.name.as_str() {
            WEBSOCKET => {
                for arg in &marker.args {
                    let message_type = strip_quotes(arg.trim()).trim();
                    if !message_type.is_empty()
                        && !route.websocket_handlers.iter().any(|h| h == message_type)
                    {
                        route.websocket_handlers.push(message_type.to_string());
                    }
                }
            }
            GROUP => {
                let name = marker.args.first().map_or("", String::as_str);
                let group = self.groups.resolve(
                    name,
                    marker.args.get(1).map(String::as_str),
                    marker.args.get(2).map(String::as_str),
                );
                route.add_tag(group.name.clone());
                route.group = Some(group);
            }
            PARAM => {
                let param = parameter(marker);
                if param.name.is_empty() {
                    tracing::warn!(
                        file = %decl.file_name,
                        line = marker.line,
                        "{} dropped: missing name",
                        marker.raw
                    );
                } else {
                    route.parameters.push(param);
                }
            }
            RESPONSE => {
                let response = response(marker);
                if response.is_complete() {
                    route.responses.push(response);
                } else if self.strict_responses {
                    errors.push(ValidationError::new(
                        &decl.file_name,
                        marker.line,
                        ValidationCode::IncompleteResponse,
                        format!("`{}` needs both code and description", marker.raw),
                    ));
                } else {
                    tracing::warn!(
                        file = %decl.file_name,
                        line = marker.line,
                        "{} dropped: missing code or description",
                        marker.raw
                    );
                }
            }
            REQUEST_BODY => route.request_body = Some(request_body(marker)),
            DESCRIPTION => route.description = joined(marker),
            SUMMARY => route.summary = joined(marker),
            TAG => {
                for tag in &marker.args {
                    route.add_tag(tag.clone());
                }
            }
            _ => {}
        }
    }
}

/// Build a schema record for a struct carrying `@Schema`
fn assemble_schema(decl: &SourceDeclaration, markers: &[MarkerInstance]) -> Option<SchemaMetadata> {
    let schema = markers.iter().find(|m| m.name == SCHEMA)?;

    let name = schema
        .named_arg("name")
        .or_else(|| schema.positional_args().next())
        .unwrap_or(decl.name.as_str())
        .to_string();
    let description = markers
        .iter()
        .find(|m| m.name == DESCRIPTION)
        .map(joined)
        .unwrap_or_else(|| decl.docs.prose());

    Some(SchemaMetadata {
        name,
        package: decl.package.clone(),
        file_name: decl.file_name.clone(),
        description,
        fields: decl.fields.clone(),
    })
}

fn parameter(marker: &MarkerInstance) -> ParameterMetadata {
    let mut param = ParameterMetadata::default();
    for (key, value) in marker.args.iter().filter_map(|a| split_key_value(a)) {
        match key {
            "name" => param.name = value.to_string(),
            "type" => param.type_name = value.to_string(),
            "location" => param.location = value.to_string(),
            "required" => param.required = value == "true",
            "description" => param.description = value.to_string(),
            "example" => param.example = value.to_string(),
            _ => {}
        }
    }
    param
}

fn response(marker: &MarkerInstance) -> ResponseMetadata {
    let mut response = ResponseMetadata::default();
    for (key, value) in marker.args.iter().filter_map(|a| split_key_value(a)) {
        match key {
            "code" => response.code = value.to_string(),
            "description" => response.description = value.to_string(),
            "type" => response.type_name = value.to_string(),
            "example" => response.example = value.to_string(),
            _ => {}
        }
    }
    response
}

/// `@RequestBody(User)` or `@RequestBody(type=User, description=..., required=false)`
fn request_body(marker: &MarkerInstance) -> RequestBodyMetadata {
    let mut body = RequestBodyMetadata {
        required: true,
        ..RequestBodyMetadata::default()
    };

    let mut positional = marker.positional_args();
    if let Some(type_name) = positional.next() {
        body.type_name = type_name.to_string();
    }
    if let Some(description) = positional.next() {
        body.description = description.to_string();
    }

    for (key, value) in marker.args.iter().filter_map(|a| split_key_value(a)) {
        match key {
            "type" => body.type_name = value.to_string(),
            "description" => body.description = value.to_string(),
            "required" => body.required = value != "false",
            _ => {}
        }
    }
    body
}

/// All arguments joined with `, `
fn joined(marker: &MarkerInstance) -> String {
    marker.args.join(", ")
}
