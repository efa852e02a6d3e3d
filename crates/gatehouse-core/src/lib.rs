//! Shared error vocabulary for the gatehouse middleware crates
//!
//! Defines the structured [`ApiError`] wire type with its well-known
//! templates, the field-level [`ValidationError`] shape, and the
//! [`Environment`] policy that controls how much of an error is disclosed
//! to clients. HTTP integration stays behind the default-on `http`
//! feature so embedded consumers can use the types without axum.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod environment;
mod error;
mod validation;

pub use environment::Environment;
pub use error::ApiError;
pub use validation::{ValidationError, ValidationErrors};
