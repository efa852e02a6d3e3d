use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use gatehouse_core::ApiError;
use http::{HeaderMap, Method, StatusCode, header};
use tower_sessions::Session;

use crate::handler::{DefaultFailureHandler, FailureHandler, PopulationFailure, ValidationFailure};
use crate::populate::populate;
use crate::request::HttpRequest;
use crate::session::remember_url;

/// Cap on buffered request bodies (1 MiB)
const DEFAULT_BODY_LIMIT: usize = 1 << 20;

/// Request population and validation middleware
///
/// Wire per route with [`axum::middleware::from_fn`], capturing a clone
/// of the validator:
///
/// ```ignore
/// let validator = RequestValidator::new();
/// let route = post(create_news).layer(middleware::from_fn(move |request, next| {
///     let validator = validator.clone();
///     async move { validator.validate_request::<CreateNews>(request, next).await }
/// }));
/// ```
#[derive(Clone)]
pub struct RequestValidator {
    handler: Arc<dyn FailureHandler>,
    body_limit: usize,
}

impl Default for RequestValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestValidator {
    pub fn new() -> Self {
        Self {
            handler: Arc::new(DefaultFailureHandler),
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }

    /// Install a custom [`FailureHandler`]
    ///
    /// Only the overridden branches change behavior; population and
    /// validation stay as they are.
    #[must_use]
    pub fn with_handler(mut self, handler: impl FailureHandler + 'static) -> Self {
        self.handler = Arc::new(handler);
        self
    }

    /// Adjust the buffered-body cap; larger bodies are rejected with
    /// `413 Payload Too Large`
    #[must_use]
    pub const fn with_body_limit(mut self, limit: usize) -> Self {
        self.body_limit = limit;
        self
    }

    /// Populate a `T` from the request, validate it, and either continue
    /// the pipeline or dispatch the failure
    ///
    /// Population strictly precedes validation: a request that does not
    /// decode goes to the bad-request branch without ever being
    /// validated. A descriptor that validates is stored in the request
    /// extensions for the [`Validated`](crate::Validated) extractor and
    /// the buffered body is restored for downstream consumers.
    pub async fn validate_request<T: HttpRequest>(&self, request: Request, next: Next) -> Response {
        let (mut parts, body) = request.into_parts();

        let (bytes, passthrough) = if T::SOURCE.reads_body() {
            match axum::body::to_bytes(body, self.body_limit).await {
                Ok(bytes) => (bytes, None),
                Err(err) => return self.body_read_failed(&err),
            }
        } else {
            (Bytes::new(), Some(body))
        };

        let descriptor = match populate::<T>(&mut parts, &bytes).await {
            Ok(descriptor) => descriptor,
            Err(error) => {
                let failure = PopulationFailure {
                    descriptor: T::descriptor_name(),
                    source: T::SOURCE,
                    error,
                };
                return self.handler.bad_request(&parts, failure).await;
            }
        };

        if let Err(failures) = descriptor.validate(&parts) {
            let failure = ValidationFailure {
                descriptor: T::descriptor_name(),
                source: T::SOURCE,
                errors: failures.into_validation_errors::<T>(),
                old_input: serde_json::to_value(&descriptor).unwrap_or_default(),
            };

            return if wants_json(&parts.headers) {
                self.handler.api_failure(&parts, failure).await
            } else {
                self.handler.web_failure(&parts, failure).await
            };
        }

        parts.extensions.insert(descriptor);
        let body = passthrough.unwrap_or_else(|| Body::from(bytes));
        next.run(Request::from_parts(parts, body)).await
    }

    fn body_read_failed(&self, err: &axum::Error) -> Response {
        if std::error::Error::source(err)
            .is_some_and(|source| source.is::<http_body_util::LengthLimitError>())
        {
            let limit = self.body_limit;
            ApiError::new(
                "payload_too_large",
                format!("Request body is too large, limit is {limit} bytes."),
                StatusCode::PAYLOAD_TOO_LARGE,
            )
            .into_response()
        } else {
            ApiError::bad_request()
                .with_message(format!("Failed to read request body: {err}"))
                .into_response()
        }
    }
}

impl std::fmt::Debug for RequestValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestValidator")
            .field("body_limit", &self.body_limit)
            .finish_non_exhaustive()
    }
}

/// Remember the page a browser is on, enabling redirect-back on failure
///
/// Runs after the wrapped handler completes: plain (non-AJAX, non-JSON)
/// GET requests have their path and query written to the session as the
/// previous URL. Install inside the session layer, outside the
/// per-route validation middleware.
pub async fn record_previous_url(request: Request, next: Next) -> Response {
    let eligible = request.method() == Method::GET
        && !is_ajax(request.headers())
        && !wants_json(request.headers());
    let url = request
        .uri()
        .path_and_query()
        .map_or_else(|| request.uri().path().to_owned(), |pq| pq.as_str().to_owned());
    let session = request.extensions().get::<Session>().cloned();

    let response = next.run(request).await;

    if eligible {
        if let Some(session) = session {
            if let Err(err) = remember_url(&session, &url).await {
                tracing::warn!(error = %err, "failed to record previous url");
            }
        } else {
            tracing::warn!("no session layer installed, previous url not recorded");
        }
    }

    response
}

/// Whether the `Accept` header asks for a JSON response
pub(crate) fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|accept| accept.contains("application/json"))
}

fn is_ajax(headers: &HeaderMap) -> bool {
    headers
        .get("x-requested-with")
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.eq_ignore_ascii_case("xmlhttprequest"))
}
