//! The axios-style adapter entry point.

use std::sync::Arc;

use bon::Builder;
use snafu::ResultExt as _;
use tokio_util::sync::CancellationToken;

use crate::error::{BodyEncodeSnafu, BridgeError, CanceledSnafu, map_dispatch_error};
use crate::executor::RequestExecutor;
use crate::request::{PolicyOverrides, RequestDescriptor, translate_request};
use crate::response::{ResponseDescriptor, translate_response};
use crate::url::resolve_url;

/// Dispatches caller requests through an external [`RequestExecutor`].
///
/// A bridge is stateless per call: the executor and the default policy
/// overrides are captured at construction and never mutated, so one instance
/// may serve any number of concurrent dispatches.
#[derive(Debug, Builder)]
pub struct Bridge<X: RequestExecutor> {
    executor: X,
    /// Adapter-level policy defaults applied to every dispatch.
    #[builder(default)]
    defaults: PolicyOverrides,
}

impl<X: RequestExecutor> Bridge<X> {
    /// Wraps an executor with no adapter-level policy overrides.
    pub fn new(executor: X) -> Self {
        Self {
            executor,
            defaults: PolicyOverrides::default(),
        }
    }

    /// Returns the executor this bridge dispatches through.
    pub fn executor(&self) -> &X {
        &self.executor
    }

    /// Executes one request end to end.
    ///
    /// The sequence is fixed: check the cancellation token, resolve the URL,
    /// translate the request, invoke the executor, translate the response,
    /// and validate the status when the descriptor carries a predicate.
    /// Cancellation is observed only here, before dispatch; a token
    /// cancelled mid-flight is the executor's concern.
    ///
    /// # Errors
    ///
    /// [`BridgeError::Canceled`] when the token is already cancelled (the
    /// executor is never invoked), [`BridgeError::BodyEncode`] when the body
    /// cannot be encoded, [`BridgeError::Network`] when the executor
    /// rejects, and [`BridgeError::StatusValidation`] when the response
    /// status fails the descriptor's predicate.
    pub async fn dispatch(
        &self,
        request: RequestDescriptor,
    ) -> Result<ResponseDescriptor, BridgeError> {
        let request = Arc::new(request);

        if request
            .cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
        {
            return CanceledSnafu {
                request: Arc::clone(&request),
            }
            .fail();
        }

        let url = resolve_url(request.base_url.as_deref(), request.url.as_deref());
        let mut options = translate_request(&request, &self.defaults).context(BodyEncodeSnafu {
            request: Arc::clone(&request),
        })?;
        // Asserted at dispatch time, not by the translator.
        options.fail_on_non_success_status.get_or_insert(false);

        tracing::debug!(method = %options.method, %url, "dispatching request");

        let response = match self.executor.execute(&url, options).await {
            Ok(response) => response,
            Err(error) => {
                let mapped = map_dispatch_error(Box::new(error), &request);
                tracing::debug!(error = %mapped, "executor rejected request");
                return Err(mapped);
            }
        };

        let response =
            match translate_response(response, request.response_kind, Arc::clone(&request)).await {
                Ok(response) => response,
                Err(error) => return Err(map_dispatch_error(Box::new(error), &request)),
            };

        if let Some(validator) = &request.validate_status
            && !validator.check(response.status)
        {
            return Err(BridgeError::StatusValidation {
                status: response.status,
                request,
                response: Box::new(response),
            });
        }

        Ok(response)
    }
}
