use axum::extract::FromRequestParts;
use axum::response::{IntoResponse, Response};
use gatehouse_core::ApiError;
use http::request::Parts;

use crate::request::HttpRequest;

/// Extractor for the descriptor a request was validated into
///
/// Reads the value that
/// [`RequestValidator::validate_request`](crate::RequestValidator::validate_request)
/// stored in the request extensions. Reaching a handler without that
/// middleware installed is a wiring bug and yields a `500` response.
#[derive(Debug, Clone)]
pub struct Validated<T>(pub T);

impl<S, T> FromRequestParts<S> for Validated<T>
where
    S: Send + Sync,
    T: HttpRequest,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<T>().cloned().map(Self).ok_or_else(|| {
            tracing::error!(
                descriptor = T::descriptor_name(),
                "descriptor missing from request extensions, is validate_request installed?"
            );
            ApiError::internal_server_error().into_response()
        })
    }
}
