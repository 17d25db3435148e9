//! The adapter error taxonomy and the single pass-through-or-wrap point.

use std::sync::Arc;

use snafu::Snafu;

use crate::body::BodyEncodeError;
use crate::request::RequestDescriptor;
use crate::response::ResponseDescriptor;

/// Message used when an underlying executor error has no message of its own.
const FALLBACK_NETWORK_MESSAGE: &str = "Request failed";

/// Errors raised by the adapter entry points.
///
/// Every variant carries the originating [`RequestDescriptor`] so callers
/// can correlate a failure to the request that produced it.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum BridgeError {
    /// The cancellation token was already cancelled before dispatch. No
    /// network call was attempted.
    #[snafu(display("Request aborted"))]
    Canceled {
        /// The originating request.
        request: Arc<RequestDescriptor>,
    },

    /// The executor rejected the call with an error outside this taxonomy.
    #[snafu(display("{message}"))]
    Network {
        /// The underlying error's message, or `"Request failed"` when that
        /// message is empty.
        message: String,
        /// The underlying executor error.
        source: Box<dyn std::error::Error + Send + Sync>,
        /// The originating request.
        request: Arc<RequestDescriptor>,
    },

    /// The decoded response failed the caller-supplied status predicate.
    #[snafu(display("Request failed with status code {status}"))]
    StatusValidation {
        /// The rejected status code.
        status: u16,
        /// The originating request.
        request: Arc<RequestDescriptor>,
        /// The decoded response that failed validation.
        response: Box<ResponseDescriptor>,
    },

    /// The request body could not be encoded; nothing was dispatched.
    #[snafu(display("Failed to encode request body"))]
    BodyEncode {
        /// The underlying codec error.
        source: BodyEncodeError,
        /// The originating request.
        request: Arc<RequestDescriptor>,
    },
}

impl BridgeError {
    /// Returns the request that produced this error.
    #[must_use]
    pub fn request(&self) -> &Arc<RequestDescriptor> {
        match self {
            Self::Canceled { request }
            | Self::Network { request, .. }
            | Self::StatusValidation { request, .. }
            | Self::BodyEncode { request, .. } => request,
        }
    }
}

/// Classifies an executor-level rejection.
///
/// An error that is already a [`BridgeError`] is forwarded unchanged so a
/// nested adapter's classification is never double-wrapped. Anything else
/// becomes [`BridgeError::Network`] with the underlying error retained as
/// the cause.
pub(crate) fn map_dispatch_error(
    error: Box<dyn std::error::Error + Send + Sync>,
    request: &Arc<RequestDescriptor>,
) -> BridgeError {
    match error.downcast::<BridgeError>() {
        Ok(ours) => *ours,
        Err(other) => {
            let message = other.to_string();
            let message = if message.is_empty() {
                FALLBACK_NETWORK_MESSAGE.to_owned()
            } else {
                message
            };
            BridgeError::Network {
                message,
                source: other,
                request: Arc::clone(request),
            }
        }
    }
}
