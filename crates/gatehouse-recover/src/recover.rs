use std::any::Any;
use std::backtrace::Backtrace;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use gatehouse_core::ApiError;
use tower_http::catch_panic::{CatchPanicLayer, ResponseForPanic};

use crate::classify;
use crate::config::RecoveryConfig;

/// Original failure text, kept next to the response so the report event
/// still carries it when the client-facing message was suppressed
#[derive(Debug, Clone)]
pub(crate) struct FailureDetail(pub(crate) String);

/// Panic recovery and error reporting for a router
///
/// Construct once from a [`RecoveryConfig`] and install both pieces:
/// [`catch_panics`](Self::catch_panics) converts unwinding handlers into
/// structured responses, [`report`](Self::report) logs every failed
/// request. Install `report` outermost so it observes panic-path and
/// result-path failures alike.
#[derive(Debug, Clone)]
pub struct ErrorRecovery {
    config: RecoveryConfig,
}

impl ErrorRecovery {
    pub fn new(config: RecoveryConfig) -> Self {
        Self { config }
    }

    /// Layer that catches panics below it and renders them as
    /// [`ApiError`] responses
    pub fn catch_panics(&self) -> CatchPanicLayer<PanicResponder> {
        CatchPanicLayer::custom(PanicResponder {
            config: self.config,
        })
    }

    /// Middleware that logs requests which ended in an [`ApiError`]
    ///
    /// An error is reported when it asks to be or when the environment is
    /// not production. The backtrace is attached when the error asks for
    /// it or when debug mode is off; it is captured after the unwind, so
    /// it locates the recovery site rather than the failure site.
    pub async fn report(&self, request: Request, next: Next) -> Response {
        let response = next.run(request).await;

        if let Some(fail) = response.extensions().get::<ApiError>()
            && self.should_log(fail)
        {
            let detail = response
                .extensions()
                .get::<FailureDetail>()
                .map_or(fail.message.as_str(), |detail| detail.0.as_str());

            if self.wants_backtrace(fail) {
                let backtrace = Backtrace::force_capture();
                tracing::error!(
                    id = %fail.id,
                    status = %fail.status,
                    error = %detail,
                    backtrace = %backtrace,
                    "request failed"
                );
            } else {
                tracing::error!(
                    id = %fail.id,
                    status = %fail.status,
                    error = %detail,
                    "request failed"
                );
            }
        }

        response
    }

    /// Whether a failed request gets a log event at all
    ///
    /// Production only logs errors that ask for it; everywhere else,
    /// every failure is logged.
    const fn should_log(&self, fail: &ApiError) -> bool {
        fail.should_report || !self.config.environment.is_production()
    }

    /// Whether the log event carries a captured backtrace
    const fn wants_backtrace(&self, fail: &ApiError) -> bool {
        fail.show_trace || !self.config.debug
    }
}

/// [`ResponseForPanic`] implementation that classifies panic payloads
#[derive(Debug, Clone)]
pub struct PanicResponder {
    config: RecoveryConfig,
}

impl ResponseForPanic for PanicResponder {
    type ResponseBody = axum::body::Body;

    fn response_for_panic(
        &mut self,
        err: Box<dyn Any + Send + 'static>,
    ) -> http::Response<Self::ResponseBody> {
        let (fail, detail) = classify::classify(&self.config, err);

        let mut response = fail.into_response();
        response.extensions_mut().insert(FailureDetail(detail));
        response
    }
}
