//! Console logging setup.
//!
//! Log lines go to stdout without timestamps or targets, e.g.
//! `INFO Processing item 2 of 5`, so existing tooling can follow a run.
//! Colors are only used when stdout is a terminal.

use std::io::IsTerminal;

use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Filter used when `RUST_LOG` is not set.
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose { "dvcli=debug" } else { "dvcli=info" }
}

/// The line format shared by the console and by tests.
pub fn layer<S, W>(make_writer: W, ansi: bool) -> impl Layer<S>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::fmt::layer()
        .with_writer(make_writer)
        .with_ansi(ansi)
        .with_target(false)
        .without_time()
}

pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));
    tracing_subscriber::registry()
        .with(filter)
        .with(layer(std::io::stdout, std::io::stdout().is_terminal()))
        .init();
}
