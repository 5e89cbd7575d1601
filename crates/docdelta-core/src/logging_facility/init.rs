//! Global subscriber setup

use std::sync::Once;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

/// Output profile for the global subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Human-readable lines at `debug`
    Development,
    /// One JSON object per event at `info`
    Production,
    /// Bare registry; tests install their own capture layer
    Test,
}

impl Profile {
    /// Directive used when neither `RUST_LOG` nor an override is given
    pub fn default_directive(self) -> &'static str {
        match self {
            Profile::Development => "docdelta=debug",
            Profile::Production | Profile::Test => "docdelta=info",
        }
    }
}

static INIT_ONCE: Once = Once::new();

/// Install the global subscriber for `profile`.
///
/// Only the first call in a process has any effect. `RUST_LOG` takes
/// precedence over the profile's default directive.
pub fn init(profile: Profile) {
    install(profile, None);
}

/// Like [`init`], but with an explicit directive (e.g. from a deployment's
/// config file) standing in for the profile default. `RUST_LOG` still wins.
///
/// An unparsable directive falls back to the profile default.
pub fn init_with_filter(profile: Profile, directive: &str) {
    install(profile, Some(directive));
}

fn resolve_filter(profile: Profile, directive: Option<&str>) -> EnvFilter {
    if let Ok(from_env) = EnvFilter::try_from_default_env() {
        return from_env;
    }
    directive
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(profile.default_directive()))
}

fn install(profile: Profile, directive: Option<&str>) {
    INIT_ONCE.call_once(|| {
        let filter = resolve_filter(profile, directive);
        // try_init: a subscriber installed elsewhere (a test harness) is left alone
        let _ = match profile {
            Profile::Development => tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .finish()
                .try_init(),
            Profile::Production => tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .finish()
                .try_init(),
            Profile::Test => tracing_subscriber::registry().try_init(),
        };
    });
}
