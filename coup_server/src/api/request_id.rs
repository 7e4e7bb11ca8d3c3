//! Request ID middleware for log correlation across a request's handler.

use axum::{
    extract::Request,
    http::{HeaderValue, StatusCode},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

fn get_or_generate_request_id(headers: &axum::http::HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// Stamps every request with an id (reusing one the caller supplied),
/// stores it in request extensions for handlers to read, and echoes it
/// back on the response.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Result<Response, StatusCode> {
    let request_id = get_or_generate_request_id(request.headers());
    request.extensions_mut().insert(RequestId(request_id.clone()));

    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = std::time::Instant::now();

    log::info!("request started: {} {} [{}]", method, path, request_id);

    let response = next.run(request).await;
    let duration_ms = start.elapsed().as_secs_f64() * 1000.0;

    let (mut parts, body) = response.into_parts();
    if let Ok(header_value) = HeaderValue::from_str(&request_id) {
        parts.headers.insert(REQUEST_ID_HEADER, header_value);
    }
    log::info!("request completed: {} [{}]", parts.status, request_id);

    crate::metrics::http_requests_total(&method, &path, parts.status.as_u16());
    crate::metrics::http_request_duration_ms(&method, &path, duration_ms);

    Ok(Response::from_parts(parts, body))
}

#[derive(Clone, Debug)]
pub struct RequestId(pub String);

impl RequestId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<S> axum::extract::FromRequestParts<S> for RequestId
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestId>()
            .cloned()
            .ok_or((StatusCode::INTERNAL_SERVER_ERROR, "request id not found in extensions"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::Request, routing::get};
    use tower::ServiceExt;

    #[test]
    fn generates_a_fresh_id_when_none_supplied() {
        let headers = axum::http::HeaderMap::new();
        let id = get_or_generate_request_id(&headers);
        assert!(Uuid::parse_str(&id).is_ok());
    }

    #[test]
    fn reuses_a_supplied_id() {
        let mut headers = axum::http::HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("caller-id"));
        assert_eq!(get_or_generate_request_id(&headers), "caller-id");
    }

    #[tokio::test]
    async fn middleware_echoes_request_id_on_response() {
        async fn handler() -> &'static str {
            "ok"
        }
        let app = Router::new()
            .route("/ping", get(handler))
            .layer(axum::middleware::from_fn(request_id_middleware));

        let response = app
            .oneshot(Request::builder().uri("/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert!(response.headers().get(REQUEST_ID_HEADER).is_some());
    }
}
