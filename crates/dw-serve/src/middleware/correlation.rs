use crate::routes::webhook::DELIVERY_HEADER;
use axum::body::Body;
use axum::http::{HeaderMap, HeaderName, HeaderValue, Request};
use axum::middleware::Next;
use axum::response::Response;
use tracing::Instrument;
use ulid::Ulid;

#[derive(Clone, Debug)]
pub struct CorrelationId(pub String);

pub const HEADER_NAME: &str = "x-correlation-id";

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// The caller's correlation id, or a fresh `corr_<ulid>`.
fn resolve(headers: &HeaderMap) -> CorrelationId {
    let id = header_value(headers, HEADER_NAME)
        .map(str::to_string)
        .unwrap_or_else(|| format!("corr_{}", Ulid::new()));
    CorrelationId(id)
}

/// Runs the request inside a span tagged with its correlation id and, for webhook
/// deliveries, GitHub's delivery id. The correlation id is echoed on the response.
pub async fn correlation_middleware(mut request: Request<Body>, next: Next) -> Response {
    let correlation = resolve(request.headers());
    let delivery = header_value(request.headers(), DELIVERY_HEADER)
        .unwrap_or_default()
        .to_string();
    let span = tracing::info_span!(
        "request",
        correlation_id = %correlation.0,
        delivery = %delivery
    );

    let id = correlation.0.clone();
    request.extensions_mut().insert(correlation);
    let mut response = next.run(request).instrument(span).await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(HEADER_NAME), value);
    }
    response
}
