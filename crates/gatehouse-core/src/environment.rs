use serde::Deserialize;

/// Deployment environment of the host application
///
/// Drives error disclosure: production suppresses the text of
/// unrecognized errors, every other environment echoes it to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    #[default]
    Local,
    Development,
    Staging,
    Production,
}

impl Environment {
    /// Whether internal error details must stay hidden from clients
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}
