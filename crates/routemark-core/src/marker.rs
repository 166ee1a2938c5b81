//! Marker definitions and the registry the extractor matches against
//!
//! A registry is an explicit, injectable object. [`MarkerRegistry::global`]
//! exists for hosts that want one process-wide instance; it is populated with
//! the built-in catalogue the first time it is touched.

use crate::model::MiddlewareCall;
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Marker annotation sigil
pub const SIGIL: char = '@';

/// How many arguments a marker accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgPolicy {
    /// Any number, including none (bare `@Name` is allowed)
    Any,
    /// At least this many
    AtLeast(usize),
    /// Exactly this many
    Exactly(usize),
}

impl ArgPolicy {
    /// Check an argument count, describing the expectation on failure
    pub fn check(&self, count: usize) -> Result<(), String> {
        match *self {
            ArgPolicy::Any => Ok(()),
            ArgPolicy::AtLeast(min) if count >= min => Ok(()),
            ArgPolicy::AtLeast(min) => Err(format!("at least {min}, found {count}")),
            ArgPolicy::Exactly(n) if count == n => Ok(()),
            ArgPolicy::Exactly(n) => Err(format!("exactly {n}, found {count}")),
        }
    }

    /// Whether a marker with this policy must be written with parentheses
    pub fn requires_args(&self) -> bool {
        match *self {
            ArgPolicy::Any => false,
            ArgPolicy::AtLeast(n) | ArgPolicy::Exactly(n) => n > 0,
        }
    }
}

/// What a marker contributes to a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    /// Binds the declaration to a method and path
    Routing,
    /// Adds a request-handling wrapper to the middleware chain
    Behavior,
    /// Adds documentation-only metadata
    Documentation,
}

/// Maps raw marker arguments to a middleware-call expression
pub type BehaviorFactory = Arc<dyn Fn(&[String]) -> MiddlewareCall + Send + Sync>;

/// Factory that calls `function` with the marker's arguments, or with
/// `defaults` when the marker was written without any
pub fn call_factory(function: &str, defaults: &[&str]) -> BehaviorFactory {
    let function = function.to_string();
    let defaults: Vec<String> = defaults.iter().map(|d| d.to_string()).collect();
    Arc::new(move |args: &[String]| {
        let args = if args.is_empty() {
            defaults.clone()
        } else {
            args.to_vec()
        };
        MiddlewareCall::new(function.clone(), args)
    })
}

/// A named marker the extractor recognises
#[derive(Clone)]
pub struct MarkerDefinition {
    /// Name without the sigil
    pub name: String,

    /// Text that introduces the marker in a comment (`@Name`)
    pub pattern: String,

    pub kind: MarkerKind,

    pub arity: ArgPolicy,

    /// Present for behavior markers
    pub factory: Option<BehaviorFactory>,

    /// Human description carried into middleware descriptors
    pub description: String,
}

impl MarkerDefinition {
    pub fn new(name: impl Into<String>, kind: MarkerKind) -> Self {
        let name = name.into();
        Self {
            pattern: format!("{SIGIL}{name}"),
            description: format!("Middleware {name}"),
            name,
            kind,
            arity: ArgPolicy::Any,
            factory: None,
        }
    }

    /// A documentation marker that needs at least one argument
    pub fn documentation(name: impl Into<String>) -> Self {
        Self::new(name, MarkerKind::Documentation).with_arity(ArgPolicy::AtLeast(1))
    }

    /// A behavior marker backed by a runtime factory function
    pub fn behavior(name: impl Into<String>, function: &str, description: &str) -> Self {
        Self::new(name, MarkerKind::Behavior)
            .with_factory(call_factory(function, &[]))
            .with_description(description)
    }

    pub fn with_arity(mut self, arity: ArgPolicy) -> Self {
        self.arity = arity;
        self
    }

    pub fn with_factory(mut self, factory: BehaviorFactory) -> Self {
        self.factory = Some(factory);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Build the middleware-call expression for one occurrence
    pub fn build_call(&self, args: &[String]) -> Option<MiddlewareCall> {
        self.factory.as_ref().map(|factory| factory(args))
    }
}

impl std::fmt::Debug for MarkerDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarkerDefinition")
            .field("name", &self.name)
            .field("pattern", &self.pattern)
            .field("kind", &self.kind)
            .field("arity", &self.arity)
            .field("factory", &self.factory.is_some())
            .field("description", &self.description)
            .finish()
    }
}

/// Global marker registry
static GLOBAL_REGISTRY: OnceCell<MarkerRegistry> = OnceCell::new();

/// Name-keyed set of marker definitions
pub struct MarkerRegistry {
    definitions: RwLock<BTreeMap<String, Arc<MarkerDefinition>>>,
}

impl MarkerRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            definitions: RwLock::new(BTreeMap::new()),
        }
    }

    /// Create a registry holding the built-in catalogue
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        crate::builtins::register_builtins(&registry);
        registry
    }

    /// The process-wide registry, built-ins included
    pub fn global() -> &'static MarkerRegistry {
        GLOBAL_REGISTRY.get_or_init(MarkerRegistry::with_builtins)
    }

    /// Register a definition, replacing any definition with the same name
    ///
    /// Returns the replaced definition, if any. Definitions are never merged.
    pub fn register(&self, definition: MarkerDefinition) -> Option<Arc<MarkerDefinition>> {
        let name = definition.name.clone();
        let previous = self.definitions.write().insert(name.clone(), Arc::new(definition));
        if previous.is_some() {
            tracing::debug!(marker = %name, "marker definition replaced");
        } else {
            tracing::trace!(marker = %name, "marker registered");
        }
        previous
    }

    /// Look up a definition by name
    pub fn lookup(&self, name: &str) -> Option<Arc<MarkerDefinition>> {
        self.definitions.read().get(name).cloned()
    }

    /// Every definition, ordered by name
    pub fn all(&self) -> Vec<Arc<MarkerDefinition>> {
        self.definitions.read().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.definitions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.read().is_empty()
    }

    /// Cheap pre-check: does the text mention any registered marker?
    pub fn mentions_marker(&self, text: &str) -> bool {
        if !text.contains(SIGIL) {
            return false;
        }
        self.definitions
            .read()
            .values()
            .any(|definition| text.contains(&definition.pattern))
    }

    /// Drop every definition
    #[cfg(any(test, feature = "testing"))]
    #[doc(hidden)]
    pub fn reset(&self) {
        self.definitions.write().clear();
    }
}

impl Default for MarkerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MarkerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarkerRegistry")
            .field("markers", &self.definitions.read().keys().collect::<Vec<_>>())
            .finish()
    }
}
