//! Stderr log output for the `abajiang` binary.

use std::env;

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "warn,abajiang_lib=info,abajiang=info";
const VERBOSE_FILTER: &str = "info,abajiang_lib=debug,abajiang=debug";

/// Install the stderr subscriber. Safe to call twice; the second call is a no-op.
///
/// `RUST_LOG` beats `ABAJIANG_LOG`, which beats `--verbose`. With none of
/// them set only warnings and this crate's info lines show.
pub fn init(verbose: bool) {
    let env_filter = filter_from_env(verbose);
    let _ = tracing_subscriber::fmt()
        .with_target(true)
        .with_writer(std::io::stderr)
        .with_env_filter(env_filter)
        .try_init();
}

fn filter_from_env(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .ok()
        .or_else(|| {
            env::var("ABAJIANG_LOG")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .and_then(|v| EnvFilter::try_new(v).ok())
        })
        .unwrap_or_else(|| EnvFilter::new(if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER }))
}
