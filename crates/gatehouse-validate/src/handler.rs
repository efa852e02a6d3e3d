use async_trait::async_trait;
use axum::response::{IntoResponse, Response};
use gatehouse_core::{ApiError, ValidationErrors};
use http::request::Parts;
use http::{StatusCode, header};
use serde_json::Value;
use tower_sessions::Session;

use crate::populate::PopulateError;
use crate::request::SourceKind;
use crate::session::{flash_errors, flash_old_input, previous_url};

/// A request that could not be decoded into its descriptor
#[derive(Debug)]
pub struct PopulationFailure {
    /// Short type name of the descriptor being populated
    pub descriptor: &'static str,
    pub source: SourceKind,
    pub error: PopulateError,
}

/// A decoded request that failed its self-validation
#[derive(Debug, Clone)]
pub struct ValidationFailure {
    /// Short type name of the failing descriptor
    pub descriptor: &'static str,
    pub source: SourceKind,
    /// Field failures, already renamed through the binding table
    pub errors: ValidationErrors,
    /// The populated descriptor serialized to JSON, for form replay
    pub old_input: Value,
}

/// Failure branches of the validation middleware
///
/// The default methods implement the stock behavior; override one to
/// replace that branch alone. Population and validation themselves are
/// not configurable through this trait.
#[async_trait]
pub trait FailureHandler: Send + Sync {
    /// Population failed; the descriptor never decoded
    async fn bad_request(&self, _parts: &Parts, failure: PopulationFailure) -> Response {
        tracing::debug!(
            descriptor = failure.descriptor,
            source = %failure.source,
            error = %failure.error,
            "request population failed"
        );

        ApiError::bad_request()
            .with_message(failure.error.to_string())
            .into_response()
    }

    /// Validation failed and the client asked for JSON
    async fn api_failure(&self, _parts: &Parts, failure: ValidationFailure) -> Response {
        ApiError::validation_failed()
            .with_errors(&failure.errors)
            .into_response()
    }

    /// Validation failed for a browser request: flash the errors and the
    /// decoded input, then redirect back
    async fn web_failure(&self, parts: &Parts, failure: ValidationFailure) -> Response {
        if let Some(session) = parts.extensions.get::<Session>() {
            if let Err(err) = flash_errors(session, &failure.errors).await {
                tracing::warn!(error = %err, "failed to flash validation errors");
            }
            if let Err(err) = flash_old_input(session, &failure.old_input).await {
                tracing::warn!(error = %err, "failed to flash old input");
            }
        } else {
            tracing::warn!(
                descriptor = failure.descriptor,
                "no session layer installed, validation errors not flashed"
            );
        }

        redirect_back(parts).await
    }
}

/// Stock implementation of every failure branch
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFailureHandler;

#[async_trait]
impl FailureHandler for DefaultFailureHandler {}

/// `302 Found` back to the referer, else the last remembered page, else
/// the site root
async fn redirect_back(parts: &Parts) -> Response {
    if let Some(referer) = parts
        .headers
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok())
        .filter(|referer| !referer.is_empty())
    {
        return found(referer);
    }

    if let Some(session) = parts.extensions.get::<Session>() {
        match previous_url(session).await {
            Ok(Some(url)) => return found(&url),
            Ok(None) => {}
            Err(err) => tracing::warn!(error = %err, "failed to read previous url"),
        }
    }

    found("/")
}

fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_owned())]).into_response()
}
