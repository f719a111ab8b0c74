//! Subscriber installation

use std::sync::Once;

use serde::Deserialize;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Output mode selected by configuration (`log_profile`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Human-readable lines on stderr, debug level for ContractX crates
    Development,
    /// One JSON object per event on stderr, info level
    Production,
    /// No output; tests install the capture layer themselves
    Test,
}

impl Profile {
    fn default_directives(self) -> &'static str {
        match self {
            Profile::Development => {
                "warn,contractx_core=debug,contractx_store=debug,contractx_engine=debug,contractx=debug"
            }
            Profile::Production | Profile::Test => {
                "warn,contractx_core=info,contractx_store=info,contractx_engine=info,contractx=info"
            }
        }
    }

    /// `RUST_LOG` when set, otherwise the profile's directives
    pub fn filter(self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.default_directives()))
    }
}

static INSTALL: Once = Once::new();

/// Install the global subscriber for `profile`
///
/// Only the first call in a process has any effect.
pub fn init(profile: Profile) {
    INSTALL.call_once(|| {
        // A subscriber installed elsewhere (e.g. the test capture) wins.
        let _ = match profile {
            Profile::Development => tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_env_filter(profile.filter())
                .finish()
                .try_init(),
            Profile::Production => tracing_subscriber::fmt()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(false)
                .with_env_filter(profile.filter())
                .finish()
                .try_init(),
            Profile::Test => tracing_subscriber::registry().try_init(),
        };
    });
}
