//! Logging initialization

use std::sync::Once;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

/// Environment variable consulted by [`Profile::from_env`]
pub const PROFILE_ENV_VAR: &str = "GROVE_LOG_PROFILE";

/// Logging profile configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable output, `grove_core=debug` unless RUST_LOG says otherwise
    Development,
    /// JSON output, `grove_core=info` unless RUST_LOG says otherwise
    Production,
    /// Bare registry; tests install their own capture layer
    Test,
}

impl Profile {
    /// Parse a profile name, case-insensitively
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Some(Profile::Development),
            "production" | "prod" => Some(Profile::Production),
            "test" => Some(Profile::Test),
            _ => None,
        }
    }

    /// Read the profile from `GROVE_LOG_PROFILE`, falling back to Development
    pub fn from_env() -> Self {
        std::env::var(PROFILE_ENV_VAR)
            .ok()
            .and_then(|v| Self::parse(&v))
            .unwrap_or(Profile::Development)
    }

    fn default_filter(&self) -> &'static str {
        match self {
            Profile::Development => "grove_core=debug",
            Profile::Production => "grove_core=info",
            Profile::Test => "off",
        }
    }
}

static INIT_ONCE: Once = Once::new();

/// Initialize the logging facility
///
/// Only the first call installs a subscriber; later calls are ignored
/// whatever profile they pass.
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(profile.default_filter()));
        match profile {
            Profile::Development => {
                tracing_subscriber::fmt().with_env_filter(filter).init();
            }
            Profile::Production => {
                tracing_subscriber::fmt().json().with_env_filter(filter).init();
            }
            Profile::Test => {
                tracing_subscriber::registry().init();
            }
        }
    });
}
