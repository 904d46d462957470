//! Logging facility
//!
//! Provides a single initialization point for the tracing subscriber.

use std::sync::Once;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

/// Logging profile configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogProfile {
    /// Human-readable output for development
    Development,
    /// JSON structured output for production
    Production,
    /// No-op subscriber for deterministic testing
    Test,
}

static INIT_ONCE: Once = Once::new();

/// Initialize the logging facility
///
/// Should be called once at application startup. Subsequent calls are
/// no-ops, so library tests can call it freely.
pub fn init(profile: LogProfile) {
    INIT_ONCE.call_once(|| {
        match profile {
            LogProfile::Development => {
                tracing_subscriber::fmt()
                    .with_env_filter(
                        EnvFilter::try_from_default_env()
                            .unwrap_or_else(|_| EnvFilter::new("polystore=debug")),
                    )
                    .init();
            }
            LogProfile::Production => {
                tracing_subscriber::fmt()
                    .json()
                    .with_env_filter(
                        EnvFilter::try_from_default_env()
                            .unwrap_or_else(|_| EnvFilter::new("polystore=info")),
                    )
                    .init();
            }
            LogProfile::Test => {
                tracing_subscriber::registry().init();
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_idempotent() {
        // Multiple calls should not panic
        init(LogProfile::Test);
        init(LogProfile::Test);
        init(LogProfile::Test);
    }

    #[test]
    fn test_profile_equality() {
        assert_eq!(LogProfile::Development, LogProfile::Development);
        assert_ne!(LogProfile::Development, LogProfile::Production);
    }
}
