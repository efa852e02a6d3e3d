use std::any::Any;

use gatehouse_core::ApiError;

use crate::config::RecoveryConfig;

/// Stand-in text when a panic payload is neither an error nor a string
const OPAQUE_PAYLOAD: &str = "opaque panic payload";

/// Convert a panic payload into a structured error plus its original text
///
/// Ordered ladder, first match wins: an [`ApiError`] passes through
/// untouched; error and string payloads go through the internal-error
/// policy; anything else is an opaque `Any` value and degrades to a fixed
/// placeholder. The returned text is what the report event should carry,
/// independent of what the client gets to see.
pub(crate) fn classify(
    config: &RecoveryConfig,
    payload: Box<dyn Any + Send>,
) -> (ApiError, String) {
    let payload = match payload.downcast::<ApiError>() {
        Ok(fail) => {
            let detail = fail.to_string();
            return (*fail, detail);
        }
        Err(payload) => payload,
    };

    let payload = match payload.downcast::<anyhow::Error>() {
        Ok(err) => return wrapped(config, &err.to_string()),
        Err(payload) => payload,
    };

    let payload = match payload.downcast::<Box<dyn std::error::Error + Send + Sync>>() {
        Ok(err) => return wrapped(config, &err.to_string()),
        Err(payload) => payload,
    };

    let payload = match payload.downcast::<String>() {
        Ok(message) => return wrapped(config, &message),
        Err(payload) => payload,
    };

    match payload.downcast::<&'static str>() {
        Ok(message) => wrapped(config, *message),
        Err(_) => wrapped(config, OPAQUE_PAYLOAD),
    }
}

fn wrapped(config: &RecoveryConfig, message: &str) -> (ApiError, String) {
    (internal_error(config, message), message.to_owned())
}

/// Wrap an unknown failure, suppressing its text from clients in production
pub(crate) fn internal_error(config: &RecoveryConfig, message: &str) -> ApiError {
    if config.environment.is_production() {
        return ApiError::internal_server_error();
    }

    ApiError::internal_server_error().with_message(message)
}
