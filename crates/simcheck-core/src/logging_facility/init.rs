//! Logging initialization module
//!
//! Provides a single initialization point for the logging facility.

use std::sync::Once;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

/// Logging profile configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable output for development
    Development,
    /// JSON structured output for production
    Production,
    /// Test capture mode for deterministic testing
    Test,
}

impl Profile {
    /// Parse a profile name as accepted on the command line.
    ///
    /// `pretty`/`development` and `json`/`production` are accepted; anything
    /// else yields `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pretty" | "development" => Some(Profile::Development),
            "json" | "production" => Some(Profile::Production),
            "test" => Some(Profile::Test),
            _ => None,
        }
    }
}

static INIT_ONCE: Once = Once::new();

/// Initialize the logging facility
///
/// Call once at application startup. Later calls are no-ops.
///
/// # Profiles
///
/// - **Development**: Human-readable logs on stderr, `simcheck=debug`
/// - **Production**: JSON structured logs on stderr, `simcheck=info`
/// - **Test**: Bare registry; use `init_test_capture()` to record events
///
/// `RUST_LOG` overrides the default filter in both output profiles.
///
/// # Example
///
/// ```
/// use simcheck_core::logging_facility::{init, Profile};
///
/// init(Profile::Development);
/// ```
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| match profile {
        Profile::Development => {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_env_filter(
                    EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| EnvFilter::new("simcheck=debug")),
                )
                .init();
        }
        Profile::Production => {
            tracing_subscriber::fmt()
                .json()
                .with_writer(std::io::stderr)
                .with_env_filter(
                    EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| EnvFilter::new("simcheck=info")),
                )
                .init();
        }
        Profile::Test => {
            tracing_subscriber::registry().init();
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_parse() {
        assert_eq!(Profile::parse("pretty"), Some(Profile::Development));
        assert_eq!(Profile::parse("json"), Some(Profile::Production));
        assert_eq!(Profile::parse("production"), Some(Profile::Production));
        assert_eq!(Profile::parse("verbose"), None);
    }

    #[test]
    fn test_profile_equality() {
        assert_eq!(Profile::Development, Profile::Development);
        assert_ne!(Profile::Development, Profile::Production);
    }
}
