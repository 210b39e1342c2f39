//! Logger initialisation for the command-line runner.

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Installs the global logger.
///
/// `RUST_LOG` wins when set; otherwise `verbose` selects between debug and
/// info output.
pub(crate) fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let env = Env::default().default_filter_or(level.to_string());
    // fails only when a logger is already installed
    let _ = Builder::from_env(env).format_timestamp_millis().try_init();
}
