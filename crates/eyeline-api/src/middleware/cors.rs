//! CORS layer configuration.

use std::time::Duration;

use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};

use eyeline_core::config::CorsConfig;

/// Builds a CORS tower layer from configuration.
pub fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    let wildcard = |values: &[String]| values.iter().any(|v| v == "*");
    let mut layer = CorsLayer::new();

    if wildcard(&config.allowed_origins) {
        layer = layer.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        layer = layer.allow_origin(origins);
    }

    let methods: Vec<Method> = config
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();
    layer = layer.allow_methods(methods);

    if wildcard(&config.allowed_headers) {
        layer = layer.allow_headers(Any);
    } else {
        let headers: Vec<axum::http::HeaderName> = config
            .allowed_headers
            .iter()
            .filter_map(|h| h.parse().ok())
            .collect();
        layer = layer.allow_headers(headers);
    }

    layer.max_age(Duration::from_secs(config.max_age_seconds))
}
