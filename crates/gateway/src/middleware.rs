//! Cross-cutting request handling: logging and CORS

use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
};
use incognito_config::{CorsConfig, Environment};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

/// Logging middleware for request/response logging
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let start = std::time::Instant::now();
    let response = next.run(request).await;
    let duration = start.elapsed();

    tracing::info!(
        method = %method,
        uri = %uri,
        status = %response.status(),
        duration_ms = duration.as_millis(),
        "Request completed"
    );

    response
}

/// CORS policy for the deployment mode.
///
/// Production serves no CORS headers at all. Any other mode allows the
/// configured development origins with credentials.
pub fn create_cors_middleware(environment: Environment, cors: &CorsConfig) -> Option<CorsLayer> {
    if environment.is_production() {
        return None;
    }

    let origins: Vec<HeaderValue> = cors
        .development_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::ACCEPT, header::CONTENT_TYPE, header::AUTHORIZATION])
            .allow_credentials(true),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn production_has_no_cors_layer() {
        assert!(create_cors_middleware(Environment::Production, &CorsConfig::default()).is_none());
    }

    #[test]
    fn development_builds_a_layer_even_with_bad_origins() {
        let cors = CorsConfig {
            development_origins: vec!["http://localhost:3000".into(), "bad\norigin".into()],
        };
        assert!(create_cors_middleware(Environment::Development, &cors).is_some());
    }
}
