//! Cross-origin configuration for the JSON API.

use axum::http::{HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Build the CORS layer.
///
/// With no configured origins any origin may read the API, which is what a
/// dashboard bound to localhost needs. Otherwise only the listed origins are
/// allowed; entries that are not valid header values are skipped.
pub fn cors_layer(origins: Option<&[String]>) -> CorsLayer {
    let Some(origins) = origins else {
        return CorsLayer::permissive();
    };

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, routing::get, Router};
    use tower::ServiceExt;

    async fn preflight(layer: CorsLayer, origin: &str) -> Option<HeaderValue> {
        let app = Router::new().route("/", get(|| async { "ok" })).layer(layer);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header("Origin", origin)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        response
            .headers()
            .get("access-control-allow-origin")
            .cloned()
    }

    #[tokio::test]
    async fn permissive_without_configured_origins() {
        let header = preflight(cors_layer(None), "http://anywhere.test").await;
        assert_eq!(header.unwrap(), "*");
    }

    #[tokio::test]
    async fn restricts_to_configured_origins() {
        let origins = vec!["http://allowed.test".to_string(), "bad\nvalue".to_string()];
        let allowed = preflight(cors_layer(Some(origins.as_slice())), "http://allowed.test").await;
        assert_eq!(allowed.unwrap(), "http://allowed.test");

        let denied = preflight(cors_layer(Some(origins.as_slice())), "http://other.test").await;
        assert!(denied.is_none());
    }
}
