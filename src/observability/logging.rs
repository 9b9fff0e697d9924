//! Structured logging.

use tracing_subscriber::{
    fmt, layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter, Registry,
};

/// Handle to adjust the log level after initialization.
pub struct LogHandle {
    filter: reload::Handle<EnvFilter, Registry>,
}

impl LogHandle {
    /// Switch to the level selected by the debug and trace settings.
    pub fn apply(&self, debug: bool, trace: bool) {
        let directive = directive(debug, trace);
        if let Err(e) = self.filter.modify(|filter| *filter = EnvFilter::new(directive)) {
            tracing::warn!(error = %e, "Failed to change log level");
            return;
        }
        tracing::debug!(directive, "Log level set");
    }
}

/// Install the global subscriber at the default level.
pub fn init() -> LogHandle {
    let (filter, handle) = reload::Layer::new(EnvFilter::new(directive(false, false)));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    LogHandle { filter: handle }
}

/// Filter directive for the given settings. Trace implies debug.
pub fn directive(debug: bool, trace: bool) -> &'static str {
    match (debug, trace) {
        (_, true) => "info,resgate=trace,tower_http=trace",
        (true, false) => "info,resgate=debug,tower_http=debug",
        (false, false) => "info",
    }
}
