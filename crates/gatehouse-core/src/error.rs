use http::StatusCode;
use serde::Serialize;
use serde_json::Value;

use crate::validation::ValidationErrors;

/// Structured error returned to API clients
///
/// The serialized shape is the wire contract: `id` and `message` always,
/// `meta` and `context` only when attached. The status and reporting
/// flags travel out of band.
///
/// Well-known error classes have template constructors; call sites take
/// a fresh template and customize it with the builder methods before
/// raising or returning it.
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    /// Machine-readable error identifier (e.g. `validation_failed`)
    pub id: String,
    /// Human-readable message, safe for the client in every environment
    pub message: String,
    /// HTTP status the response carries
    #[serde(skip)]
    pub status: StatusCode,
    /// Whether the recovery layer logs this error even in production
    #[serde(skip)]
    pub should_report: bool,
    /// Whether the recovery layer attaches a backtrace to the log event
    #[serde(skip)]
    pub show_trace: bool,
    /// Structured payload for the client (e.g. validation errors)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
    /// Free-form diagnostic data
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
}

impl ApiError {
    /// Error with the given identity; reporting flags default off
    pub fn new(id: impl Into<String>, message: impl Into<String>, status: StatusCode) -> Self {
        Self {
            id: id.into(),
            message: message.into(),
            status,
            should_report: false,
            show_trace: false,
            meta: None,
            context: None,
        }
    }

    /// `400 Bad Request`
    pub fn bad_request() -> Self {
        Self::new("bad_request", "Bad request.", StatusCode::BAD_REQUEST)
    }

    /// `401 Unauthorized`
    pub fn unauthorized() -> Self {
        Self::new("unauthorized", "Unauthorized.", StatusCode::UNAUTHORIZED)
    }

    /// `403 Forbidden`
    pub fn forbidden() -> Self {
        Self::new("forbidden", "Forbidden.", StatusCode::FORBIDDEN)
    }

    /// `404 Not Found`
    pub fn not_found() -> Self {
        Self::new(
            "not_found",
            "Requested resource was not found.",
            StatusCode::NOT_FOUND,
        )
    }

    /// `422 Unprocessable Entity`, carrier for field-level failures
    pub fn validation_failed() -> Self {
        Self::new(
            "validation_failed",
            "Validation failed.",
            StatusCode::UNPROCESSABLE_ENTITY,
        )
    }

    /// `500 Internal Server Error`, reported even in production
    pub fn internal_server_error() -> Self {
        Self::new(
            "internal_server_error",
            "Internal Server Error.",
            StatusCode::INTERNAL_SERVER_ERROR,
        )
        .with_report(true)
    }

    /// Replace the client-facing message
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Attach a structured `meta` payload
    #[must_use]
    pub fn with_meta(mut self, meta: Value) -> Self {
        self.meta = Some(meta);
        self
    }

    /// Attach free-form diagnostic context
    #[must_use]
    pub fn with_context(mut self, context: Value) -> Self {
        self.context = Some(context);
        self
    }

    /// Attach field-level failures as the `meta` payload
    #[must_use]
    pub fn with_errors(self, errors: &ValidationErrors) -> Self {
        self.with_meta(serde_json::to_value(errors).unwrap_or_default())
    }

    /// Force or suppress reporting by the recovery layer
    #[must_use]
    pub fn with_report(mut self, report: bool) -> Self {
        self.should_report = report;
        self
    }

    /// Request a backtrace on the log event even outside debug mode
    #[must_use]
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.show_trace = trace;
        self
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.id, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Render as a JSON response and stash a copy in the response extensions
/// so the recovery layer's reporting pass can observe the failure.
#[cfg(feature = "http")]
impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let mut response = (self.status, axum::Json(&self)).into_response();
        response.extensions_mut().insert(self);
        response
    }
}
