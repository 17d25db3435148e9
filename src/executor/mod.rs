//! The external request executor boundary.
//!
//! This module defines the traits that decouple the translation core from
//! whatever performs the actual network I/O. Callers provide their own
//! [`RequestExecutor`] (a tracing harness, a sandbox, a real HTTP client)
//! and the adapters operate against these traits.

#[cfg(feature = "executor-reqwest-0_12")]
mod reqwest_0_12;

#[cfg(feature = "executor-reqwest-0_12")]
pub use reqwest_0_12::ReqwestExecutorError;

use bytes::Bytes;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::body::EncodedBody;

/// The canonical options bag handed to an executor.
///
/// Derived one-way from a [`RequestDescriptor`] and never mutated after
/// construction. Every field except `method` is optional; omitted policy
/// fields mean "use the executor's own default".
///
/// [`RequestDescriptor`]: crate::RequestDescriptor
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExecutorOptions {
    /// Upper-cased HTTP method. Defaults to `GET` during translation.
    pub method: String,
    /// Flattened request headers. Key case and order are preserved as the
    /// caller gave them; entries without a value have been dropped.
    pub headers: IndexMap<String, String>,
    /// Flattened query parameters; values are strings, numbers, or booleans.
    /// `None` when no parameters remain after normalization.
    pub query_params: Option<IndexMap<String, Value>>,
    /// The encoded body variant.
    pub body: EncodedBody,
    /// Request timeout in milliseconds. Only present when strictly positive.
    pub timeout_ms: Option<u64>,
    /// Whether the executor should treat non-2xx statuses as failures.
    pub fail_on_non_success_status: Option<bool>,
    /// Whether the executor should skip TLS certificate verification.
    pub ignore_tls_errors: Option<bool>,
    /// Redirect-following limit.
    pub max_redirects: Option<u32>,
    /// Retry budget. Honored by the executor, never by this crate.
    pub max_retries: Option<u32>,
}

/// Defines the common interface for request executors.
pub trait RequestExecutor: Send + Sync {
    /// The error type returned by the executor for a failed request.
    type Error: std::error::Error + Send + Sync + 'static;

    /// The associated response type produced by this executor.
    type Response: ExecutorResponse;

    /// Executes one request and returns an owned response.
    ///
    /// The executor owns transport concerns entirely: connections, TLS,
    /// redirects, retries, and timeout enforcement all happen behind this
    /// call, driven by the fields of `options`.
    fn execute(
        &self,
        url: &str,
        options: ExecutorOptions,
    ) -> impl Future<Output = Result<Self::Response, Self::Error>> + Send;
}

/// Defines the common interface for executor responses.
pub trait ExecutorResponse: Send {
    /// The error type when reading the response body.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns the HTTP status code.
    fn status(&self) -> u16;

    /// Returns the status text as supplied by the executor.
    ///
    /// May be empty; the response translator backfills from the canonical
    /// reason-phrase table in that case.
    fn status_text(&self) -> String;

    /// Returns the response headers.
    fn headers(&self) -> IndexMap<String, String>;

    /// Consumes the response and returns its body in full.
    ///
    /// Consuming `self` makes the at-most-once read structural: an already
    /// drained body source cannot be read again.
    fn body(self) -> impl Future<Output = Result<Bytes, Self::Error>> + Send;
}

#[cfg(test)]
pub(crate) mod mock {
    //! A canned-response executor for adapter tests.

    use std::convert::Infallible;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use bytes::Bytes;
    use indexmap::IndexMap;

    use super::{ExecutorOptions, ExecutorResponse, RequestExecutor};

    /// Records every call and replies with a fixed response.
    #[derive(Debug, Default)]
    pub(crate) struct MockExecutor {
        pub(crate) status: u16,
        pub(crate) status_text: String,
        pub(crate) headers: IndexMap<String, String>,
        pub(crate) body: Bytes,
        pub(crate) fail_with: Option<String>,
        pub(crate) calls: AtomicUsize,
        pub(crate) last: Mutex<Option<(String, ExecutorOptions)>>,
    }

    impl MockExecutor {
        pub(crate) fn replying(status: u16, body: &'static [u8]) -> Self {
            Self {
                status,
                body: Bytes::from_static(body),
                ..Self::default()
            }
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub(crate) fn last_call(&self) -> Option<(String, ExecutorOptions)> {
            self.last.lock().unwrap().clone()
        }
    }

    #[derive(Debug)]
    pub(crate) struct MockResponse {
        status: u16,
        status_text: String,
        headers: IndexMap<String, String>,
        body: Bytes,
    }

    #[derive(Debug)]
    pub(crate) struct MockFailure(pub(crate) String);

    impl std::fmt::Display for MockFailure {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(&self.0)
        }
    }

    impl std::error::Error for MockFailure {}

    impl RequestExecutor for MockExecutor {
        type Error = MockFailure;
        type Response = MockResponse;

        async fn execute(
            &self,
            url: &str,
            options: ExecutorOptions,
        ) -> Result<Self::Response, Self::Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some((url.to_owned(), options));

            if let Some(message) = &self.fail_with {
                return Err(MockFailure(message.clone()));
            }

            Ok(MockResponse {
                status: self.status,
                status_text: self.status_text.clone(),
                headers: self.headers.clone(),
                body: self.body.clone(),
            })
        }
    }

    impl ExecutorResponse for MockResponse {
        type Error = Infallible;

        fn status(&self) -> u16 {
            self.status
        }

        fn status_text(&self) -> String {
            self.status_text.clone()
        }

        fn headers(&self) -> IndexMap<String, String> {
            self.headers.clone()
        }

        async fn body(self) -> Result<Bytes, Self::Error> {
            Ok(self.body)
        }
    }
}
