//! # opsdeck Log
//!
//! Structured logging setup on top of `tracing-subscriber`.
//!
//! ```rust,no_run
//! let _guard = opsdeck_log::auto_init().expect("logger");
//! tracing::info!(guid = "g1", "ready");
//! ```
//!
//! Environment:
//!
//! - `OPSDECK_LOG` (or `RUST_LOG`): filter directives
//! - `OPSDECK_LOG_FORMAT`: `pretty`, `compact` or `json`
//! - `OPSDECK_SERVICE`, `OPSDECK_ENV`, `OPSDECK_VERSION`: global fields

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod builder;
pub mod config;
mod error;

use std::sync::Once;

pub use builder::{LoggerBuilder, LoggerGuard};
pub use config::{Config, DisplayConfig, Fields, Format, Writer};
pub use error::{LogError, LogResult};

/// Initialize from the environment.
///
/// Uses [`Config::from_env`] when `OPSDECK_LOG` or `RUST_LOG` is set,
/// otherwise the development preset in debug builds and the production
/// preset in release builds.
///
/// # Errors
///
/// See [`LoggerBuilder::build`].
pub fn auto_init() -> LogResult<LoggerGuard> {
    let configured =
        std::env::var_os("OPSDECK_LOG").is_some() || std::env::var_os("RUST_LOG").is_some();
    let config = if configured {
        Config::from_env()
    } else if cfg!(debug_assertions) {
        Config::development()
    } else {
        Config::production()
    };
    init_with(config)
}

/// Initialize with an explicit configuration.
///
/// # Errors
///
/// See [`LoggerBuilder::build`].
pub fn init_with(config: Config) -> LogResult<LoggerGuard> {
    LoggerBuilder::from_config(config).build()
}

/// Install the test preset once per process. Safe to call from every test.
///
/// Losing the race against another global subscriber is ignored.
pub fn init_test() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let mut config = Config::test();
        if let Ok(level) = std::env::var("OPSDECK_LOG") {
            config.level = level;
        }
        if let Err(e) = init_with(config) {
            eprintln!("opsdeck-log: test logger not installed: {e}");
        }
    });
}
