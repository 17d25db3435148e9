//! Translation of executor responses into the caller-facing shape.

use std::sync::Arc;

use bytes::Bytes;
use indexmap::IndexMap;
use serde_json::Value;

use crate::executor::ExecutorResponse;
use crate::request::RequestDescriptor;
use crate::status::status_text_for;

/// The response body representation a caller asks for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResponseKind {
    /// Parse as JSON when the content type declares it; fall back to text.
    #[default]
    Json,
    /// The raw text, regardless of content type.
    Text,
    /// The raw bytes.
    Bytes,
    /// The raw bytes, tagged with the declared content type.
    Blob,
    /// The buffered body bytes. True incremental streaming is not provided;
    /// the executor hands over bodies in full.
    Stream,
}

/// A decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseData {
    /// A parsed JSON value.
    Json(Value),
    /// Body text.
    Text(String),
    /// Raw body bytes.
    Bytes(Bytes),
    /// Raw body bytes with the declared content type attached.
    Blob {
        /// Declared content type; empty when the header is absent.
        content_type: String,
        /// Body bytes.
        data: Bytes,
    },
}

/// The caller-facing result of one adapter invocation.
#[derive(Debug, Clone)]
pub struct ResponseDescriptor {
    /// HTTP status code.
    pub status: u16,
    /// Status text; never empty. Backfilled from the canonical table when
    /// the executor supplies none.
    pub status_text: String,
    /// Response headers, passed through verbatim.
    pub headers: IndexMap<String, String>,
    /// Body, decoded per the requested [`ResponseKind`].
    pub data: ResponseData,
    /// The request this response answers.
    pub request: Arc<RequestDescriptor>,
}

/// Translates an executor response, decoding the body as `kind` asks.
///
/// The response body is read exactly once. JSON parse failures never
/// surface as errors: they degrade to the raw text. The only error path is
/// the executor's own body read.
pub async fn translate_response<R: ExecutorResponse>(
    response: R,
    kind: ResponseKind,
    request: Arc<RequestDescriptor>,
) -> Result<ResponseDescriptor, R::Error> {
    let status = response.status();
    let supplied = response.status_text();
    let status_text = if supplied.is_empty() {
        status_text_for(status).to_owned()
    } else {
        supplied
    };
    let headers = response.headers();
    let content_type = content_type_of(&headers);

    let bytes = response.body().await?;
    let data = decode_body(bytes, kind, content_type.as_deref());

    Ok(ResponseDescriptor {
        status,
        status_text,
        headers,
        data,
        request,
    })
}

fn decode_body(bytes: Bytes, kind: ResponseKind, content_type: Option<&str>) -> ResponseData {
    match kind {
        ResponseKind::Json => {
            let declares_json = content_type
                .is_some_and(|ct| ct.to_ascii_lowercase().contains("application/json"));
            if declares_json {
                match serde_json::from_slice(&bytes) {
                    Ok(value) => ResponseData::Json(value),
                    Err(_) => ResponseData::Text(into_text(&bytes)),
                }
            } else {
                ResponseData::Text(into_text(&bytes))
            }
        }
        ResponseKind::Text => ResponseData::Text(into_text(&bytes)),
        ResponseKind::Bytes | ResponseKind::Stream => ResponseData::Bytes(bytes),
        ResponseKind::Blob => ResponseData::Blob {
            content_type: content_type.unwrap_or_default().to_owned(),
            data: bytes,
        },
    }
}

fn into_text(bytes: &Bytes) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

fn content_type_of(headers: &IndexMap<String, String>) -> Option<String> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case("content-type"))
        .map(|(_, value)| value.clone())
}
