use std::sync::Once;

use env_logger::Builder;
use log::LevelFilter;

static INIT: Once = Once::new();

/// Installs the global `env_logger` once. `RUST_LOG` overrides the defaults.
pub fn initialize_logger() {
    INIT.call_once_force(|_| {
        let mut builder = Builder::new();

        builder
            .filter_level(LevelFilter::Info)
            .filter_module("libris::graph", LevelFilter::Warn)
            .filter_module("libris::recommend", LevelFilter::Info)
            .format_timestamp_millis()
            .parse_default_env();

        // A test harness or host binary may have installed a logger already.
        let _ = builder.try_init();
    });
}
