//! [`RequestExecutor`] implementation backed by `reqwest`.
//!
//! Per-request knobs that `reqwest` only exposes at client construction
//! (`ignore_tls_errors`, `max_redirects`) are not applied here: configure
//! them on the [`reqwest::Client`] instead. `max_retries` and
//! `fail_on_non_success_status` are likewise ignored, since status policy is
//! enforced by the adapters themselves.

use std::time::Duration;

use bytes::Bytes;
use indexmap::IndexMap;
use snafu::{ResultExt as _, Snafu};

use super::{ExecutorOptions, ExecutorResponse, RequestExecutor};
use crate::body::{EncodedBody, MultipartValue};

/// Errors raised by the `reqwest` executor binding.
#[derive(Debug, Snafu)]
pub enum ReqwestExecutorError {
    /// The translated method string is not a valid HTTP method.
    #[snafu(display("Invalid HTTP method: {method}"))]
    InvalidMethod {
        /// The offending method string.
        method: String,
        /// The underlying parse error.
        source: http::method::InvalidMethod,
    },
    /// A multipart file part carried an unparseable MIME type.
    #[snafu(display("Invalid MIME type: {mime_type}"))]
    InvalidMime {
        /// The offending MIME string.
        mime_type: String,
        /// The underlying `reqwest` error.
        source: reqwest::Error,
    },
    /// The request failed inside `reqwest`.
    #[snafu(transparent)]
    Send {
        /// The underlying `reqwest` error.
        source: reqwest::Error,
    },
}

impl RequestExecutor for reqwest::Client {
    type Error = ReqwestExecutorError;
    type Response = reqwest::Response;

    async fn execute(
        &self,
        url: &str,
        options: ExecutorOptions,
    ) -> Result<Self::Response, Self::Error> {
        let method = http::Method::from_bytes(options.method.as_bytes())
            .context(InvalidMethodSnafu {
                method: options.method.clone(),
            })?;

        let mut builder = self.request(method, url);

        for (key, value) in &options.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }

        if let Some(params) = &options.query_params {
            builder = builder.query(params);
        }

        if let Some(timeout_ms) = options.timeout_ms {
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }

        builder = match options.body {
            EncodedBody::None => builder,
            EncodedBody::Raw(bytes) => builder.body(bytes),
            EncodedBody::Form(form) => builder.form(&form),
            EncodedBody::Multipart(parts) => {
                let mut form = reqwest::multipart::Form::new();
                for (name, value) in parts {
                    form = match value {
                        MultipartValue::Text(text) => form.text(name, text),
                        MultipartValue::File(file) => {
                            let part = reqwest::multipart::Part::bytes(file.data.to_vec())
                                .file_name(file.name)
                                .mime_str(&file.mime_type)
                                .context(InvalidMimeSnafu {
                                    mime_type: file.mime_type.clone(),
                                })?;
                            form.part(name, part)
                        }
                    };
                }
                builder.multipart(form)
            }
        };

        Ok(builder.send().await?)
    }
}

impl ExecutorResponse for reqwest::Response {
    type Error = reqwest::Error;

    fn status(&self) -> u16 {
        self.status().as_u16()
    }

    /// `reqwest` does not surface the wire reason phrase, so this is always
    /// empty and the canonical table fills in downstream.
    fn status_text(&self) -> String {
        String::new()
    }

    fn headers(&self) -> IndexMap<String, String> {
        self.headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_owned(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect()
    }

    async fn body(self) -> Result<Bytes, Self::Error> {
        self.bytes().await
    }
}
