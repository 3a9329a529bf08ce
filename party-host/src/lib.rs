pub mod config;
pub mod match_host;
pub mod prompt_source;

pub use config::HostConfig;
pub use match_host::{HostNotice, MatchHost};
pub use prompt_source::{HttpPromptSource, PromptFetchError, PromptSource, StaticPromptSource};

use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG` overrides the default `info`
/// level. Safe to call more than once.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
