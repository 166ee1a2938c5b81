//! Generator configuration

use crate::error::{RoutemarkError, RoutemarkResult};
use serde::{Deserialize, Serialize};

/// Settings for one generation run
///
/// Every field has a default, so an empty TOML document is a valid
/// configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Package name recorded in the generated metadata block
    #[serde(default = "default_package_name")]
    pub package_name: String,

    /// Crate the generated code calls into
    #[serde(default = "default_runtime_crate")]
    pub runtime_crate: String,

    /// Alias the runtime crate is imported under
    #[serde(default = "default_runtime_alias")]
    pub runtime_alias: String,

    /// Name of the generated initialization function
    #[serde(default = "default_entry_point")]
    pub entry_point: String,

    /// Registry type the entry point receives
    #[serde(default = "default_registry_type")]
    pub registry_type: String,

    /// Method called once per route
    #[serde(default = "default_registration_fn")]
    pub registration_fn: String,

    /// Method called once per websocket message type
    #[serde(default = "default_websocket_registration_fn")]
    pub websocket_registration_fn: String,

    /// Render through the minified template
    #[serde(default)]
    pub minify: bool,

    /// Re-read and check the generated file after writing it
    #[serde(default = "default_true")]
    pub validate: bool,

    /// Report incomplete `@Response` markers instead of dropping them
    #[serde(default)]
    pub strict_responses: bool,

    /// `silent`, `normal`, or `verbose`
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_package_name() -> String {
    "routes".to_string()
}

fn default_runtime_crate() -> String {
    "routemark_runtime".to_string()
}

fn default_runtime_alias() -> String {
    "rt".to_string()
}

fn default_entry_point() -> String {
    "init_routes".to_string()
}

fn default_registry_type() -> String {
    "Registry".to_string()
}

fn default_registration_fn() -> String {
    "register_route_with_meta".to_string()
}

fn default_websocket_registration_fn() -> String {
    "register_websocket_handler".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "normal".to_string()
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            package_name: default_package_name(),
            runtime_crate: default_runtime_crate(),
            runtime_alias: default_runtime_alias(),
            entry_point: default_entry_point(),
            registry_type: default_registry_type(),
            registration_fn: default_registration_fn(),
            websocket_registration_fn: default_websocket_registration_fn(),
            minify: false,
            validate: true,
            strict_responses: false,
            log_level: default_log_level(),
        }
    }
}

impl GeneratorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from TOML text
    ///
    /// An empty string yields the defaults. The result is validated.
    pub fn from_toml_str(text: &str) -> RoutemarkResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every name that ends up in generated source is usable there
    pub fn validate(&self) -> RoutemarkResult<()> {
        let names = [
            ("runtime_crate", &self.runtime_crate),
            ("runtime_alias", &self.runtime_alias),
            ("entry_point", &self.entry_point),
            ("registry_type", &self.registry_type),
            ("registration_fn", &self.registration_fn),
            ("websocket_registration_fn", &self.websocket_registration_fn),
        ];
        for (field, value) in names {
            if !is_identifier(value) {
                return Err(RoutemarkError::Config(format!(
                    "`{field}` must be a Rust identifier, got {value:?}"
                )));
            }
        }

        if self.package_name.trim().is_empty() {
            return Err(RoutemarkError::Config("`package_name` must not be empty".to_string()));
        }

        self.log_level.parse::<crate::Verbosity>()?;
        Ok(())
    }

    pub fn with_package_name(mut self, name: impl Into<String>) -> Self {
        self.package_name = name.into();
        self
    }

    pub fn with_minify(mut self, minify: bool) -> Self {
        self.minify = minify;
        self
    }

    pub fn with_validate(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    pub fn with_strict_responses(mut self, strict: bool) -> Self {
        self.strict_responses = strict;
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }
}

/// ASCII identifier check: a letter or `_` followed by letters, digits, or `_`
pub fn is_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    value != "_" && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
#[path = "config/config_tests.rs"]
mod config_tests;
