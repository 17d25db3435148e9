//! Request body representations and the encoding rules between them.
//!
//! A caller's body enters the system as a [`Body`], tagged once at the
//! boundary instead of being type-probed throughout the codec. Encoding
//! produces an [`EncodedBody`], where "at most one of raw/form/multipart"
//! is structural rather than conventional.

use bytes::Bytes;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use snafu::{ResultExt as _, Snafu};

/// A request body as supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// A JSON-serializable value.
    Json(Value),
    /// A plain string. May be re-interpreted as a url-encoded query string
    /// when the declared content type asks for it.
    Text(String),
    /// An opaque binary payload, always passed through raw.
    Bytes(Bytes),
    /// An ordered key/value pair collection (`URLSearchParams`-like).
    Pairs(Vec<(String, String)>),
    /// A multipart form collection (`FormData`-like).
    Form(Vec<FormField>),
}

/// One field of a [`Body::Form`] collection.
#[derive(Debug, Clone, PartialEq)]
pub enum FormField {
    /// A plain text field.
    Text {
        /// Field name.
        name: String,
        /// Field value.
        value: String,
    },
    /// A file-like field.
    File {
        /// Field name.
        name: String,
        /// Attached file name; defaults to `"blob"` at encode time.
        file_name: Option<String>,
        /// MIME type; defaults to `"application/octet-stream"` at encode time.
        mime_type: Option<String>,
        /// File contents.
        data: Bytes,
    },
}

/// A file entry inside an encoded multipart mapping.
///
/// Unlike [`FormField::File`], the name and MIME type here are concrete:
/// defaults have already been applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilePart {
    /// File name; `"blob"` when the caller supplied none.
    pub name: String,
    /// MIME type; `"application/octet-stream"` when the caller supplied none.
    pub mime_type: String,
    /// File contents.
    pub data: Bytes,
}

/// One value of an encoded multipart mapping.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MultipartValue {
    /// A plain text part.
    Text(String),
    /// A file part.
    File(FilePart),
}

/// The body variant handed to the executor.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub enum EncodedBody {
    /// No body.
    #[default]
    None,
    /// Raw bytes, sent as-is.
    Raw(Bytes),
    /// A url-encoded form mapping.
    Form(IndexMap<String, String>),
    /// A multipart form mapping.
    Multipart(IndexMap<String, MultipartValue>),
}

impl EncodedBody {
    /// Returns true when no body is present.
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// Errors raised while encoding a request body.
#[derive(Debug, Snafu)]
pub enum BodyEncodeError {
    /// A string body declared as url-encoded could not be parsed.
    #[snafu(display("Failed to parse url-encoded body"))]
    ParseForm {
        /// The underlying deserialization error.
        source: serde_html_form::de::Error,
    },
    /// A JSON body could not be serialized to bytes.
    #[snafu(display("Failed to serialize JSON body"))]
    SerializeJson {
        /// The underlying serialization error.
        source: serde_json::Error,
    },
}

const DEFAULT_FILE_NAME: &str = "blob";
const DEFAULT_FILE_MIME: &str = "application/octet-stream";

/// Encodes a caller-supplied body into the executor's body variant.
///
/// Decision order, first match wins:
/// 1. absent or JSON-null body → [`EncodedBody::None`];
/// 2. multipart collection → multipart mapping with file defaults applied;
/// 3. ordered pair collection → form mapping (last write per key wins);
/// 4. content type declares `application/x-www-form-urlencoded` → parse a
///    string body as a query string, or flatten an object body to strings;
/// 5. content type declares `multipart/form-data` and the body is a plain
///    object → pass the object through as text parts, unencoded;
/// 6. anything else → raw bytes (JSON values are serialized).
///
/// Native collection types are unambiguous and win before the content type
/// is consulted; for the ambiguous string/object cases the declared content
/// type is the caller's statement of wire intent and takes priority over
/// value-type sniffing.
pub fn encode_body(
    body: Option<&Body>,
    headers: &IndexMap<String, Value>,
) -> Result<EncodedBody, BodyEncodeError> {
    let Some(body) = body else {
        return Ok(EncodedBody::None);
    };

    match body {
        // A JSON null is a null body, not a payload spelling "null".
        Body::Json(Value::Null) => Ok(EncodedBody::None),
        Body::Form(fields) => Ok(EncodedBody::Multipart(encode_form_fields(fields))),
        Body::Pairs(pairs) => Ok(EncodedBody::Form(
            pairs.iter().cloned().collect::<IndexMap<_, _>>(),
        )),
        Body::Text(text) if declares(headers, "application/x-www-form-urlencoded") => {
            let pairs: Vec<(String, String)> =
                serde_html_form::from_str(text).context(ParseFormSnafu)?;
            Ok(EncodedBody::Form(pairs.into_iter().collect()))
        }
        Body::Json(Value::Object(map))
            if declares(headers, "application/x-www-form-urlencoded") =>
        {
            let form = map
                .iter()
                .filter(|(_, value)| !value.is_null())
                .map(|(key, value)| (key.clone(), display_string(value)))
                .collect();
            Ok(EncodedBody::Form(form))
        }
        Body::Json(Value::Object(map)) if declares(headers, "multipart/form-data") => {
            // Passthrough: the caller already shaped the mapping, no
            // per-field encoding happens here.
            let parts = map
                .iter()
                .map(|(key, value)| (key.clone(), MultipartValue::Text(display_string(value))))
                .collect();
            Ok(EncodedBody::Multipart(parts))
        }
        Body::Json(value) => {
            let raw = serde_json::to_vec(value).context(SerializeJsonSnafu)?;
            Ok(EncodedBody::Raw(Bytes::from(raw)))
        }
        Body::Text(text) => Ok(EncodedBody::Raw(Bytes::copy_from_slice(text.as_bytes()))),
        Body::Bytes(bytes) => Ok(EncodedBody::Raw(bytes.clone())),
    }
}

fn encode_form_fields(fields: &[FormField]) -> IndexMap<String, MultipartValue> {
    let mut parts = IndexMap::new();
    for field in fields {
        match field {
            FormField::Text { name, value } => {
                parts.insert(name.clone(), MultipartValue::Text(value.clone()));
            }
            FormField::File {
                name,
                file_name,
                mime_type,
                data,
            } => {
                parts.insert(
                    name.clone(),
                    MultipartValue::File(FilePart {
                        name: file_name.clone().unwrap_or_else(|| DEFAULT_FILE_NAME.to_owned()),
                        mime_type: mime_type
                            .clone()
                            .unwrap_or_else(|| DEFAULT_FILE_MIME.to_owned()),
                        data: data.clone(),
                    }),
                );
            }
        }
    }
    parts
}

/// Returns true when the declared content type contains `needle`.
///
/// Header keys are matched case-insensitively; the comparison against the
/// value is case-insensitive too.
pub(crate) fn declares(headers: &IndexMap<String, Value>, needle: &str) -> bool {
    declared_content_type(headers)
        .is_some_and(|content_type| content_type.to_ascii_lowercase().contains(needle))
}

pub(crate) fn declared_content_type(headers: &IndexMap<String, Value>) -> Option<String> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case("content-type"))
        .map(|(_, value)| display_string(value))
}

/// Converts a loosely typed scalar to its display string.
///
/// Matches the string conversion of the client conventions this crate
/// bridges: booleans and numbers print plainly, arrays join their elements
/// with commas, and objects collapse to the non-informative
/// `"[object Object]"` placeholder.
pub(crate) fn display_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_owned(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(display_string)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn headers(content_type: &str) -> IndexMap<String, Value> {
        IndexMap::from([("Content-Type".to_owned(), json!(content_type))])
    }

    #[test]
    fn absent_body_encodes_to_none() {
        assert_eq!(encode_body(None, &IndexMap::new()).unwrap(), EncodedBody::None);
    }

    #[test]
    fn json_null_body_encodes_to_none() {
        let body = Body::Json(Value::Null);
        assert_eq!(
            encode_body(Some(&body), &IndexMap::new()).unwrap(),
            EncodedBody::None
        );
        // Content type does not resurrect a null body.
        let encoded = encode_body(Some(&body), &headers("application/x-www-form-urlencoded"));
        assert_eq!(encoded.unwrap(), EncodedBody::None);
    }

    #[test]
    fn urlencoded_string_parses_to_form() {
        let body = Body::Text("a=1&b=2".to_owned());
        let encoded = encode_body(Some(&body), &headers("application/x-www-form-urlencoded"));
        assert_eq!(
            encoded.unwrap(),
            EncodedBody::Form(IndexMap::from([
                ("a".to_owned(), "1".to_owned()),
                ("b".to_owned(), "2".to_owned()),
            ]))
        );
    }

    #[test]
    fn urlencoded_content_type_match_is_case_insensitive() {
        let body = Body::Text("a=1".to_owned());
        let encoded = encode_body(Some(&body), &headers("Application/X-WWW-Form-URLEncoded"));
        assert!(matches!(encoded.unwrap(), EncodedBody::Form(_)));
    }

    #[test]
    fn urlencoded_object_flattens_and_drops_nulls() {
        let body = Body::Json(json!({"a": 1, "b": "two", "c": true, "d": null}));
        let encoded = encode_body(Some(&body), &headers("application/x-www-form-urlencoded"));
        assert_eq!(
            encoded.unwrap(),
            EncodedBody::Form(IndexMap::from([
                ("a".to_owned(), "1".to_owned()),
                ("b".to_owned(), "two".to_owned()),
                ("c".to_owned(), "true".to_owned()),
            ]))
        );
    }

    #[test]
    fn pairs_collection_wins_over_content_type() {
        let body = Body::Pairs(vec![
            ("a".to_owned(), "1".to_owned()),
            ("a".to_owned(), "2".to_owned()),
            ("b".to_owned(), "3".to_owned()),
        ]);
        // Declared content type is irrelevant for native collections.
        let encoded = encode_body(Some(&body), &headers("application/json")).unwrap();
        assert_eq!(
            encoded,
            EncodedBody::Form(IndexMap::from([
                ("a".to_owned(), "2".to_owned()),
                ("b".to_owned(), "3".to_owned()),
            ]))
        );
    }

    #[test]
    fn form_collection_applies_file_defaults() {
        let body = Body::Form(vec![
            FormField::Text {
                name: "note".to_owned(),
                value: "hello".to_owned(),
            },
            FormField::File {
                name: "upload".to_owned(),
                file_name: None,
                mime_type: None,
                data: Bytes::from_static(b"\x00\x01"),
            },
        ]);
        let encoded = encode_body(Some(&body), &IndexMap::new()).unwrap();
        let parts = match encoded {
            EncodedBody::Multipart(parts) => parts,
            other => unreachable!("expected multipart, got {other:?}"),
        };
        assert_eq!(parts["note"], MultipartValue::Text("hello".to_owned()));
        assert_eq!(
            parts["upload"],
            MultipartValue::File(FilePart {
                name: "blob".to_owned(),
                mime_type: "application/octet-stream".to_owned(),
                data: Bytes::from_static(b"\x00\x01"),
            })
        );
    }

    #[test]
    fn multipart_object_passes_through_as_text_parts() {
        let body = Body::Json(json!({"field": "value", "count": 3}));
        let encoded = encode_body(Some(&body), &headers("multipart/form-data")).unwrap();
        assert_eq!(
            encoded,
            EncodedBody::Multipart(IndexMap::from([
                ("field".to_owned(), MultipartValue::Text("value".to_owned())),
                ("count".to_owned(), MultipartValue::Text("3".to_owned())),
            ]))
        );
    }

    #[test]
    fn json_value_falls_through_to_raw() {
        let body = Body::Json(json!({"a": 1}));
        let encoded = encode_body(Some(&body), &IndexMap::new()).unwrap();
        assert_eq!(encoded, EncodedBody::Raw(Bytes::from_static(b"{\"a\":1}")));
    }

    #[test]
    fn plain_text_and_bytes_stay_raw() {
        let text = Body::Text("hello".to_owned());
        assert_eq!(
            encode_body(Some(&text), &IndexMap::new()).unwrap(),
            EncodedBody::Raw(Bytes::from_static(b"hello"))
        );

        let bytes = Body::Bytes(Bytes::from_static(b"\xde\xad"));
        assert_eq!(
            encode_body(Some(&bytes), &IndexMap::new()).unwrap(),
            EncodedBody::Raw(Bytes::from_static(b"\xde\xad"))
        );
    }

    #[test]
    fn display_string_conversions() {
        assert_eq!(display_string(&json!("s")), "s");
        assert_eq!(display_string(&json!(1.5)), "1.5");
        assert_eq!(display_string(&json!(false)), "false");
        assert_eq!(display_string(&json!([1, "a"])), "1,a");
        assert_eq!(display_string(&json!({"k": 1})), "[object Object]");
    }
}
