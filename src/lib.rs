//! Bridges axios-style and fetch-style request shapes onto an external
//! request executor.
//!
//! The executor (any [`RequestExecutor`]) owns the actual network I/O;
//! this crate owns the translation between the caller's request
//! representation and the executor's options bag, and back again: URL
//! composition, header and query-parameter normalization, body encoding
//! (raw vs. form vs. multipart), response body decoding, status-text
//! backfill, and the error taxonomy.

#![forbid(unsafe_code)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]

pub mod body;
mod bridge;
mod error;
pub mod executor;
mod fetch;
pub mod request;
pub mod response;
mod status;
mod url;

pub use body::{Body, BodyEncodeError, EncodedBody, FilePart, FormField, MultipartValue};
pub use bridge::Bridge;
pub use error::BridgeError;
pub use executor::{ExecutorOptions, ExecutorResponse, RequestExecutor};
pub use fetch::{FetchInit, fetch};
pub use request::{PolicyOverrides, RequestDescriptor, StatusValidator};
pub use response::{ResponseData, ResponseDescriptor, ResponseKind};
pub use status::status_text_for;
pub use url::{is_absolute_url, resolve_url};

pub use bytes::Bytes;

/// Re-export of the cancellation token callers hand to a request.
pub use tokio_util::sync::CancellationToken;
