//! Configuration resolution.
//!
//! Layers are applied in increasing precedence: the base configuration, the
//! config file, then the options given explicitly on the command line.
//! Whatever is still unset afterwards takes its compiled-in default.

use crate::config::args::CommandLine;
use crate::config::defaults::LEGACY_TIMEOUT_THRESHOLD;
use crate::config::schema::Config;
use crate::config::store::{ConfigError, ConfigStore};

/// Merge `base`, the config file named on the command line and the explicit
/// command-line options into the final configuration.
///
/// A config file that does not exist yet is created from the result.
pub fn resolve(
    base: Config,
    cli: &CommandLine,
    store: &impl ConfigStore,
) -> Result<Config, ConfigError> {
    let mut config = base;

    let missing_file = match cli.config_file() {
        Some(path) => match store.load(path)? {
            Some(layer) => {
                layer.apply_to(&mut config);
                None
            }
            None => Some(path),
        },
        None => None,
    };

    cli.apply_to(&mut config);
    config.set_default();
    upgrade_legacy_timeout(&mut config);

    if let Some(path) = missing_file {
        store.persist_if_absent(path, &config)?;
    }

    tracing::debug!(
        overrides = ?cli.explicit().collect::<Vec<_>>(),
        "Configuration resolved"
    );
    Ok(config)
}

/// Request timeouts used to be given in seconds. Small values are assumed to
/// still be in that unit.
fn upgrade_legacy_timeout(config: &mut Config) {
    if config.request_timeout > LEGACY_TIMEOUT_THRESHOLD {
        return;
    }
    let millis = config.request_timeout * 1000;
    tracing::warn!(
        "[DEPRECATED] Request timeout should be in milliseconds. \
         Change your requestTimeout from {} to {}, and you won't be bothered anymore.",
        config.request_timeout,
        millis
    );
    config.request_timeout = millis;
}
