//! Per-request correlation ids.
//!
//! A caller may pass its own `x-request-id`; anything unusable is replaced by a
//! fresh UUID. The id is stored in the request extensions as [`RequestId`],
//! attached to the request's tracing span and echoed on the response.

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;
use uuid::Uuid;

pub static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Longest caller supplied id that is kept as is.
const MAX_REQUEST_ID_LEN: usize = 128;

/// The id of the request being served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    /// Reuses the caller's id when it is printable ASCII of sane length.
    fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(&REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|id| {
                !id.is_empty()
                    && id.len() <= MAX_REQUEST_ID_LEN
                    && id.bytes().all(|b| b.is_ascii_graphic())
            })
            .map(|id| RequestId(id.to_string()))
            .unwrap_or_else(|| RequestId(Uuid::new_v4().to_string()))
    }
}

pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let id = RequestId::from_headers(request.headers());
    let header = HeaderValue::from_str(&id.0).ok();

    let span = tracing::info_span!(
        "request",
        request_id = %id.0,
        method = %request.method(),
        path = %request.uri().path(),
    );
    request.extensions_mut().insert(id);

    async move {
        let mut response = next.run(request).await;

        if let Some(value) = header {
            response
                .headers_mut()
                .insert(REQUEST_ID_HEADER.clone(), value);
        }
        tracing::info!(status = response.status().as_u16(), "Request completed");

        response
    }
    .instrument(span)
    .await
}
