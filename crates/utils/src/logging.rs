//! provides logging helpers

use tracing_subscriber::filter::{self};
use tracing_subscriber::fmt::layer;
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry;

/// Environment variable read by the env filter, e.g. `CODEFLARE_LOG=debug`.
pub const LOG_ENV_VAR: &str = "CODEFLARE_LOG";

/// initiate the global tracing subscriber
///
/// Events go to stderr so generated documents printed on stdout stay clean.
/// `default_level` applies when [`LOG_ENV_VAR`] is unset.
pub fn init(default_level: filter::LevelFilter) {
    let env_filter = filter::EnvFilter::builder()
        .with_default_directive(default_level.into())
        .with_env_var(LOG_ENV_VAR)
        .from_env_lossy();

    let fmt_layer = layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(env_filter);

    registry().with(fmt_layer).init();
}
