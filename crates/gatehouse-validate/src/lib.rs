//! Request population and validation middleware
//!
//! Decodes incoming requests into typed descriptors (JSON, XML or form
//! bodies, query strings, route parameters), runs their self-validation,
//! and dispatches failures either as structured `422` API errors or as
//! flash-and-redirect web responses. Successfully validated descriptors
//! land in the request extensions for the [`Validated`] extractor.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod extract;
mod failures;
mod handler;
mod middleware;
mod populate;
mod request;
mod session;

pub use extract::Validated;
pub use failures::Failures;
pub use handler::{DefaultFailureHandler, FailureHandler, PopulationFailure, ValidationFailure};
pub use populate::PopulateError;
pub use request::{FieldBinding, HttpRequest, SourceKind};
pub use session::{
    ERRORS_KEY, OLD_INPUT_KEY, PREVIOUS_URL_KEY, flash_errors, flash_old_input, previous_url,
    remember_url, take_errors, take_old_input,
};
pub use middleware::{RequestValidator, record_previous_url};
