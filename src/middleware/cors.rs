use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};

use crate::config::CorsConfig;

/// Builds the CORS layer from configuration. A `*` origin allows any origin
/// and turns credentials off; otherwise credentials are allowed for the
/// listed origins. Entries that do not parse are skipped with a warning.
pub fn cors_layer(cfg: &CorsConfig) -> CorsLayer {
    let methods: Vec<Method> = parse_all(&cfg.methods, "method", |item| {
        Method::from_bytes(item.to_ascii_uppercase().as_bytes()).ok()
    });
    let headers: Vec<HeaderName> = parse_all(&cfg.headers, "header", |item| {
        HeaderName::from_bytes(item.as_bytes()).ok()
    });

    let layer = CorsLayer::new().allow_methods(methods).allow_headers(headers);

    if cfg.origins.iter().any(|origin| origin.trim() == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = parse_all(&cfg.origins, "origin", |item| {
        HeaderValue::from_str(item).ok()
    });
    layer.allow_origin(origins).allow_credentials(true)
}

fn parse_all<T>(items: &[String], kind: &str, parse: impl Fn(&str) -> Option<T>) -> Vec<T> {
    items
        .iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .filter_map(|item| {
            let parsed = parse(item);
            if parsed.is_none() {
                tracing::warn!(%kind, value = %item, "ignoring invalid CORS entry");
            }
            parsed
        })
        .collect()
}
