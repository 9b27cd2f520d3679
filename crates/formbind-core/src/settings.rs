//! Library configuration.
//!
//! [`Settings`] holds the small amount of configuration the library
//! reads: whether it runs in debug mode and the log filter passed to the
//! tracing subscriber. Values come from [`Settings::default`] or from
//! the `FORMBIND_DEBUG` / `FORMBIND_LOG` environment variables.

use serde::{Deserialize, Serialize};

/// Runtime configuration for the library.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Debug mode. Switches log output to the pretty human-readable
    /// format and enables file/line locations.
    pub debug: bool,
    /// The log filter directive (e.g. "info", "formbind=debug").
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: false,
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Builds settings from the environment.
    ///
    /// `FORMBIND_DEBUG` set to `1` or `true` enables debug mode;
    /// `FORMBIND_LOG` overrides the log filter. Unset variables leave
    /// the defaults in place.
    pub fn from_env() -> Self {
        let mut settings = Self::default();
        if let Ok(val) = std::env::var("FORMBIND_DEBUG") {
            settings.debug = matches!(val.to_lowercase().as_str(), "1" | "true" | "yes");
        }
        if let Ok(val) = std::env::var("FORMBIND_LOG") {
            settings.log_level = val;
        }
        settings
    }
}
