//! Built-in marker catalogue

use crate::marker::{ArgPolicy, MarkerDefinition, MarkerKind, MarkerRegistry, call_factory};

/// Name of the routing marker
pub const ROUTE: &str = "Route";
/// Name of the websocket marker
pub const WEBSOCKET: &str = "WebSocket";
/// Name of the group marker
pub const GROUP: &str = "Group";
/// Name of the parameter marker
pub const PARAM: &str = "Param";
/// Name of the response marker
pub const RESPONSE: &str = "Response";
/// Name of the request body marker
pub const REQUEST_BODY: &str = "RequestBody";
/// Name of the description marker
pub const DESCRIPTION: &str = "Description";
/// Name of the summary marker
pub const SUMMARY: &str = "Summary";
/// Name of the tag marker
pub const TAG: &str = "Tag";
/// Name of the schema marker
pub const SCHEMA: &str = "Schema";
/// Name of the proxy marker
pub const PROXY: &str = "Proxy";

/// HTTP methods a routing marker may name
pub const VALID_METHODS: [&str; 7] = ["GET", "POST", "PUT", "DELETE", "PATCH", "OPTIONS", "HEAD"];

/// (marker, runtime factory, description)
const BEHAVIORS: &[(&str, &str, &str)] = &[
    ("Auth", "create_auth_middleware", "Authentication and authorization"),
    ("CacheByURL", "create_cache_by_url_middleware", "Response caching keyed by URL"),
    ("CacheByUser", "create_cache_by_user_middleware", "Response caching keyed by user and URL"),
    ("CacheByEndpoint", "create_cache_by_endpoint_middleware", "Response caching keyed by endpoint"),
    ("RateLimitByIP", "create_rate_limit_by_ip_middleware", "Rate limiting per client IP"),
    ("RateLimitByUser", "create_rate_limit_by_user_middleware", "Rate limiting per user"),
    ("RateLimitByEndpoint", "create_rate_limit_by_endpoint_middleware", "Rate limiting per endpoint"),
    ("Metrics", "create_metrics_middleware", "Request metrics collection"),
    ("Prometheus", "create_prometheus_middleware", "Prometheus metrics exposition"),
    ("CORS", "create_cors_middleware", "Cross-Origin Resource Sharing"),
    ("TraceMiddleware", "create_trace_middleware", "Tracing span around the handler"),
    ("InstrumentedHandler", "create_instrumented_handler_middleware", "Handler instrumentation"),
    ("Telemetry", "create_telemetry_middleware", "Telemetry export"),
    ("Security", "create_security_middleware", "Network and host access control"),
    (PROXY, "create_proxy_middleware", "Reverse proxy with service discovery and load balancing"),
    ("Validate", "create_validate_middleware", "Request validation"),
    ("ValidateJSON", "create_validate_json_middleware", "JSON body validation"),
    ("ValidateQuery", "create_validate_query_middleware", "Query string validation"),
    ("ValidateParams", "create_validate_params_middleware", "Path parameter validation"),
    (WEBSOCKET, "create_websocket_middleware", "WebSocket connection upgrade"),
    ("WebSocketStats", "create_websocket_stats_middleware", "WebSocket statistics"),
];

/// Register every built-in marker into `registry`
///
/// Safe to call more than once; later calls overwrite with identical
/// definitions.
pub fn register_builtins(registry: &MarkerRegistry) {
    registry.register(
        MarkerDefinition::new(ROUTE, MarkerKind::Routing)
            .with_arity(ArgPolicy::Exactly(2))
            .with_description("HTTP method and path binding"),
    );

    registry.register(
        MarkerDefinition::new("Cache", MarkerKind::Behavior)
            .with_factory(call_factory("create_cache_middleware", &["duration=5m"]))
            .with_description("Response caching"),
    );
    registry.register(
        MarkerDefinition::new("RateLimit", MarkerKind::Behavior)
            .with_factory(call_factory(
                "create_rate_limit_middleware",
                &["limit=100", "window=1m"],
            ))
            .with_description("Rate limiting"),
    );
    for (name, function, description) in BEHAVIORS {
        registry.register(MarkerDefinition::behavior(*name, function, description));
    }

    for name in [GROUP, PARAM, RESPONSE, REQUEST_BODY, DESCRIPTION, SUMMARY, TAG] {
        registry.register(MarkerDefinition::documentation(name));
    }
    registry.register(MarkerDefinition::new(SCHEMA, MarkerKind::Documentation));
}
