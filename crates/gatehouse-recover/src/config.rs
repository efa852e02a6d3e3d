use gatehouse_core::Environment;
use serde::Deserialize;

/// Configuration for the recovery middleware
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct RecoveryConfig {
    /// Deployment environment; production suppresses error text and
    /// reports only errors that ask for it
    pub environment: Environment,
    /// Debug mode; report events skip the backtrace while it is on
    pub debug: bool,
}
