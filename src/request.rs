//! The caller-facing request descriptor and its translation into executor
//! options.

use std::fmt;
use std::sync::Arc;

use bon::Builder;
use indexmap::IndexMap;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::body::{Body, BodyEncodeError, display_string, encode_body};
use crate::executor::ExecutorOptions;
use crate::response::ResponseKind;

/// A caller-supplied status predicate.
///
/// When present on a [`RequestDescriptor`], the adapter raises a
/// status-validation error for any response status the predicate rejects.
/// When absent, every status resolves as a normal success value.
#[derive(Clone)]
pub struct StatusValidator(Arc<dyn Fn(u16) -> bool + Send + Sync>);

impl StatusValidator {
    /// Wraps a predicate over the response status code.
    pub fn new(predicate: impl Fn(u16) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(predicate))
    }

    /// Returns true when `status` is acceptable.
    #[must_use]
    pub fn check(&self, status: u16) -> bool {
        (self.0)(status)
    }
}

impl fmt::Debug for StatusValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StatusValidator(..)")
    }
}

/// The caller's normalized view of one HTTP call.
///
/// Header and query-parameter values are loosely typed [`Value`]s: entries
/// with a `null` value are dropped during translation rather than passed
/// through as empty strings.
#[derive(Debug, Clone, Builder)]
pub struct RequestDescriptor {
    /// HTTP method, case-insensitive. Defaults to `GET` when absent.
    #[builder(into)]
    pub method: Option<String>,
    /// Request URL, relative or absolute.
    #[builder(into)]
    pub url: Option<String>,
    /// Base URL combined with `url` per the resolver rules.
    #[builder(into)]
    pub base_url: Option<String>,
    /// Request headers; key case and order preserved as given.
    #[builder(default)]
    pub headers: IndexMap<String, Value>,
    /// Query parameters.
    #[builder(default)]
    pub query_params: IndexMap<String, Value>,
    /// Request body, tagged at the boundary.
    pub body: Option<Body>,
    /// Timeout in milliseconds; zero or absent means no timeout directive.
    pub timeout_ms: Option<u64>,
    /// Caller-owned cancellation token, checked once before dispatch.
    pub cancellation: Option<CancellationToken>,
    /// Requested response body representation.
    #[builder(default)]
    pub response_kind: ResponseKind,
    /// Status predicate; absent means any status resolves.
    pub validate_status: Option<StatusValidator>,
    /// Redirect-following limit forwarded to the executor.
    pub max_redirects: Option<u32>,
    /// TLS-verification opt-out forwarded to the executor.
    pub ignore_tls_errors: Option<bool>,
    /// Retry budget forwarded to the executor.
    pub max_retries: Option<u32>,
    /// Whether the executor should fail on non-2xx statuses.
    pub fail_on_non_success_status: Option<bool>,
}

/// Adapter-level policy overrides, captured once at construction and applied
/// to every dispatched request.
///
/// An override takes precedence over the same field on the descriptor; when
/// both are absent the field is omitted so the executor's own default
/// applies.
#[derive(Debug, Clone, Default, Builder)]
pub struct PolicyOverrides {
    /// Timeout override in milliseconds.
    pub timeout_ms: Option<u64>,
    /// Redirect-limit override.
    pub max_redirects: Option<u32>,
    /// TLS-verification override.
    pub ignore_tls_errors: Option<bool>,
    /// Retry-budget override.
    pub max_retries: Option<u32>,
    /// Status-failure override.
    pub fail_on_non_success_status: Option<bool>,
}

/// Translates a descriptor into the canonical executor options bag.
///
/// Pure: translating the same descriptor twice yields equal bags.
pub fn translate_request(
    descriptor: &RequestDescriptor,
    overrides: &PolicyOverrides,
) -> Result<ExecutorOptions, BodyEncodeError> {
    let method = descriptor
        .method
        .as_deref()
        .filter(|m| !m.is_empty())
        .unwrap_or("GET")
        .to_ascii_uppercase();

    let body = encode_body(descriptor.body.as_ref(), &descriptor.headers)?;

    Ok(ExecutorOptions {
        method,
        headers: flatten_headers(&descriptor.headers),
        query_params: flatten_query_params(&descriptor.query_params),
        body,
        timeout_ms: overrides
            .timeout_ms
            .or(descriptor.timeout_ms)
            .filter(|&t| t > 0),
        fail_on_non_success_status: overrides
            .fail_on_non_success_status
            .or(descriptor.fail_on_non_success_status),
        ignore_tls_errors: overrides
            .ignore_tls_errors
            .or(descriptor.ignore_tls_errors),
        max_redirects: overrides.max_redirects.or(descriptor.max_redirects),
        max_retries: overrides.max_retries.or(descriptor.max_retries),
    })
}

/// Flattens headers to a string-to-string mapping. Null-valued entries are
/// dropped; everything else is stringified.
fn flatten_headers(headers: &IndexMap<String, Value>) -> IndexMap<String, String> {
    headers
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| (key.clone(), display_string(value)))
        .collect()
}

/// Flattens query parameters. Strings, numbers, and booleans pass through
/// untyped; arrays and objects are stringified (objects to the
/// `"[object Object]"` placeholder); null entries are dropped. An empty
/// result collapses to `None`.
fn flatten_query_params(params: &IndexMap<String, Value>) -> Option<IndexMap<String, Value>> {
    let flattened: IndexMap<String, Value> = params
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| {
            let value = match value {
                Value::String(_) | Value::Number(_) | Value::Bool(_) => value.clone(),
                other => Value::String(display_string(other)),
            };
            (key.clone(), value)
        })
        .collect();

    if flattened.is_empty() {
        None
    } else {
        Some(flattened)
    }
}
