//! The fetch-style adapter entry point.
//!
//! Fetch semantics differ from the axios-style [`Bridge::dispatch`] in two
//! ways: the URL is taken as given (no base-URL combining) and there is no
//! status predicate, so any status (server errors included) resolves as a
//! normal response. The body runs through the same codec.
//!
//! [`Bridge::dispatch`]: crate::Bridge::dispatch

use bon::Builder;
use indexmap::IndexMap;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use crate::body::Body;
use crate::bridge::Bridge;
use crate::error::BridgeError;
use crate::executor::RequestExecutor;
use crate::request::RequestDescriptor;
use crate::response::{ResponseDescriptor, ResponseKind};

/// Per-call options for [`fetch`], mirroring a fetch `init` object.
#[derive(Debug, Clone, Default, Builder)]
pub struct FetchInit {
    /// HTTP method, case-insensitive. Defaults to `GET`.
    #[builder(into)]
    pub method: Option<String>,
    /// Request headers.
    #[builder(default)]
    pub headers: IndexMap<String, Value>,
    /// Request body.
    pub body: Option<Body>,
    /// Caller-owned cancellation token, checked once before dispatch.
    pub cancellation: Option<CancellationToken>,
    /// Requested response body representation.
    #[builder(default)]
    pub response_kind: ResponseKind,
}

/// Executes one fetch-style request through `bridge`.
///
/// # Errors
///
/// [`BridgeError::Canceled`] when the token is already cancelled,
/// [`BridgeError::BodyEncode`] when the body cannot be encoded, and
/// [`BridgeError::Network`] when the executor rejects. Statuses never fail:
/// there is no validation predicate on this path.
pub async fn fetch<X: RequestExecutor>(
    bridge: &Bridge<X>,
    url: impl Into<String>,
    init: FetchInit,
) -> Result<ResponseDescriptor, BridgeError> {
    let request = RequestDescriptor::builder()
        .maybe_method(init.method)
        .url(url.into())
        .headers(init.headers)
        .maybe_body(init.body)
        .maybe_cancellation(init.cancellation)
        .response_kind(init.response_kind)
        .build();

    bridge.dispatch(request).await
}
