//! JSON response writing.
//!
//! # Responsibilities
//! - Serialize a value into a response body with `Content-Type: application/json`
//! - Turn serialization failures into a plain-text 500 response
//!
//! # Design Decisions
//! - Failures are absorbed into the response; callers only see the status
//! - Nothing else is written once the error response is in place

use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Writes the JSON representation of `value` to `res`.
///
/// If marshalling fails the response becomes an internal server error
/// carrying the error text.
pub fn jsonify<T>(res: &mut Response, value: &T)
where
    T: Serialize + ?Sized,
{
    let js = match serde_json::to_vec(value) {
        Ok(js) => js,
        Err(err) => {
            tracing::error!(error = %err, "Failed to serialize JSON response");
            write_error(res, &err.to_string(), StatusCode::INTERNAL_SERVER_ERROR);
            return;
        }
    };

    res.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    *res.body_mut() = Body::from(js);
}

/// Replace `res` with a plain-text error.
fn write_error(res: &mut Response, message: &str, status: StatusCode) {
    let headers = res.headers_mut();
    headers.remove(header::CONTENT_LENGTH);
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    *res.status_mut() = status;
    *res.body_mut() = Body::from(format!("{message}\n"));
}

/// Response wrapper that renders its value with [`jsonify`].
#[derive(Debug, Clone)]
pub struct Jsonify<T>(pub T);

impl<T> IntoResponse for Jsonify<T>
where
    T: Serialize,
{
    fn into_response(self) -> Response {
        let mut res = Response::default();
        jsonify(&mut res, &self.0);
        res
    }
}
