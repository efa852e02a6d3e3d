//! Panic recovery middleware
//!
//! Catches panics unwinding out of downstream handlers, classifies the
//! payload into a structured [`ApiError`](gatehouse_core::ApiError), and
//! renders it as the HTTP response. A companion reporting middleware logs
//! failed requests according to the environment policy, so panic-path and
//! result-path errors share a single reporting site.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod classify;
mod config;
mod recover;

pub use config::RecoveryConfig;
pub use recover::{ErrorRecovery, PanicResponder};
