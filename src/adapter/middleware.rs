//! Axum middleware seeding each request's carrier.
//!
//! Every request gets `request_id`, `method` and `path` fields. The request ID
//! is taken from the incoming `x-request-id` header when present, otherwise a
//! UUID v4 is generated; either way it is echoed on the response.

use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

use crate::adapter::RequestFieldsExt;
use crate::fields::Field;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Use with `axum::middleware::from_fn(request_fields)`.
pub async fn request_fields(mut request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    request.add_fields([
        Field::string("request_id", request_id.clone()),
        Field::string("method", method),
        Field::string("path", path),
    ]);

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(X_REQUEST_ID, value);
    }
    response
}
