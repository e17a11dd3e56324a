//! Request body decoding by declared content type.
//!
//! # Data Flow
//! ```text
//! Content-Type header
//!     → "application/x-www-form-urlencoded" → body pairs, then query pairs → T
//!     → "application/json"                  → first JSON document in the body → T
//!     → anything else                       → InvalidContentType (body untouched)
//! ```
//!
//! # Design Decisions
//! - Matching is exact by default; `application/json; charset=utf-8` is
//!   rejected unless the parser is built with `ContentTypeMatch::Essence`
//! - Forms: only POST, PUT and PATCH read the body. Query values follow the
//!   body values and a key keeps its first value, so the body wins.
//! - JSON: one document is decoded, whatever follows it is ignored
//! - Decoder errors are carried unchanged so callers see the original cause
//! - Body size limits come from the host's `DefaultBodyLimit` layer

use std::collections::HashSet;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{FromRequest, Request};
use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const APPLICATION_FORM: &str = "application/x-www-form-urlencoded";
pub const APPLICATION_JSON: &str = "application/json";

/// Errors returned by [`parse_body`].
#[derive(Debug, Error)]
pub enum BodyError {
    /// The declared content type has no decoder.
    #[error("invalid content type")]
    InvalidContentType,

    /// The body could not be buffered (too large, connection error).
    #[error(transparent)]
    Read(#[from] BytesRejection),

    /// URL-encoded form decoding failed.
    #[error(transparent)]
    Form(#[from] serde_urlencoded::de::Error),

    /// JSON decoding failed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl IntoResponse for BodyError {
    fn into_response(self) -> Response {
        match self {
            BodyError::InvalidContentType => {
                (StatusCode::UNSUPPORTED_MEDIA_TYPE, self.to_string()).into_response()
            }
            BodyError::Read(rejection) => rejection.into_response(),
            BodyError::Form(e) => (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
            BodyError::Json(e) if e.is_data() => {
                (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()).into_response()
            }
            BodyError::Json(e) => (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
        }
    }
}

/// How the `Content-Type` header is compared against the known types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentTypeMatch {
    /// Byte-for-byte comparison with the known media types.
    #[default]
    Exact,
    /// Parameters are dropped and case is ignored before comparing.
    Essence,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    Form,
    Json,
}

/// Content-type dispatching body decoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct BodyParser {
    matching: ContentTypeMatch,
}

impl BodyParser {
    pub fn new(matching: ContentTypeMatch) -> Self {
        Self { matching }
    }

    pub fn matching(&self) -> ContentTypeMatch {
        self.matching
    }

    /// Read the body of `req` and decode it into `T`.
    pub async fn parse<T>(&self, req: Request) -> Result<T, BodyError>
    where
        T: DeserializeOwned,
    {
        let kind = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|ct| self.classify(ct));

        match kind {
            Some(BodyKind::Form) => decode_form(req).await,
            Some(BodyKind::Json) => decode_json(req).await,
            None => {
                tracing::debug!(
                    content_type = ?req.headers().get(header::CONTENT_TYPE),
                    "Rejecting body with unsupported content type"
                );
                Err(BodyError::InvalidContentType)
            }
        }
    }

    fn classify(&self, content_type: &str) -> Option<BodyKind> {
        match self.matching {
            ContentTypeMatch::Exact => match content_type {
                APPLICATION_FORM => Some(BodyKind::Form),
                APPLICATION_JSON => Some(BodyKind::Json),
                _ => None,
            },
            ContentTypeMatch::Essence => {
                let essence = content_type.split(';').next().unwrap_or("").trim();
                if essence.eq_ignore_ascii_case(APPLICATION_FORM) {
                    Some(BodyKind::Form)
                } else if essence.eq_ignore_ascii_case(APPLICATION_JSON) {
                    Some(BodyKind::Json)
                } else {
                    None
                }
            }
        }
    }
}

async fn decode_form<T>(req: Request) -> Result<T, BodyError>
where
    T: DeserializeOwned,
{
    let query = req.uri().query().unwrap_or_default().to_string();
    let reads_body = [Method::POST, Method::PUT, Method::PATCH].contains(req.method());

    let mut pairs: Vec<(String, String)> = Vec::new();
    if reads_body {
        let body = Bytes::from_request(req, &()).await?;
        pairs = serde_urlencoded::from_bytes(&body)?;
    }
    pairs.extend(serde_urlencoded::from_str::<Vec<(String, String)>>(&query)?);

    let mut seen = HashSet::new();
    pairs.retain(|(key, _)| seen.insert(key.clone()));

    let merged = serde_urlencoded::to_string(&pairs)
        .map_err(|e| <serde_urlencoded::de::Error as serde::de::Error>::custom(e))?;
    Ok(serde_urlencoded::from_str(&merged)?)
}

async fn decode_json<T>(req: Request) -> Result<T, BodyError>
where
    T: DeserializeOwned,
{
    let body = Bytes::from_request(req, &()).await?;
    let mut de = serde_json::Deserializer::from_slice(&body);
    // no `de.end()`: trailing data after the first document is ignored
    Ok(T::deserialize(&mut de)?)
}

/// Reads the body of the request and decodes it into `T`, choosing the
/// decoder by exact `Content-Type` match.
pub async fn parse_body<T>(req: Request) -> Result<T, BodyError>
where
    T: DeserializeOwned,
{
    BodyParser::default().parse(req).await
}
