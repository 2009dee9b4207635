pub use tracing::{debug, error, info, warn, trace, instrument};
use tracing::Subscriber;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt::{self, MakeWriter, format::FmtSpan}};

use crate::raw_pipeline::Verbosity;

/// Default filter directive for a console verbosity level.
///
/// Silent runs still surface per-file failures; `RUST_LOG` always wins.
pub fn default_directive(verbosity: Verbosity) -> &'static str {
    match verbosity {
        Verbosity::Silent => "error",
        Verbosity::Progress => "warn",
        Verbosity::Info => "info",
    }
}

/// Builds the log subscriber, writing formatted events to `writer`.
pub fn subscriber<W>(env_filter: EnvFilter, writer: W) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let is_debug = env_filter.to_string().contains("debug");

    let fmt_layer = fmt::layer()
        .with_writer(writer)
        .with_target(false)
        .with_timer(fmt::time::uptime())
        .with_span_events(if is_debug {
            FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
}

pub fn init(verbosity: Verbosity) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    subscriber(env_filter, std::io::stderr).init();
}
