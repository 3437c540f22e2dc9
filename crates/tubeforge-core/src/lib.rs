use thiserror::Error;

mod app_config;
mod buckets;
mod config;
pub mod telemetry;

pub use app_config::{AppConfig, Environment};
pub use buckets::{is_short, ViewBucket};
pub use config::{load_app_config, load_app_config_from_env};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Account subscription tier. `Pro` accounts bypass the monthly quota.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountTier {
    Free,
    Pro,
}

impl AccountTier {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AccountTier::Free => "free",
            AccountTier::Pro => "pro",
        }
    }

    /// Parses a tier from its stored text form. Unknown values map to `Free`
    /// so a bad row never grants unlimited access.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "pro" => AccountTier::Pro,
            _ => AccountTier::Free,
        }
    }
}

impl std::fmt::Display for AccountTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
