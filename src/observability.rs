//! Logging and diagnostics.
//!
//! The codec logs through the `log` facade only; nothing is printed unless the
//! host application installs a logger. `init_logging` is a convenience for
//! binaries, benches and tests that want `env_logger` output without wiring it
//! up themselves. The `log_metric!` macro emits one structured key/value line
//! at debug level and costs a single level check when debug logging is off.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::sync::Once;

use log::LevelFilter;

use crate::error::CodecError;

/// Logs a structured key-value metric line at debug level.
///
/// # Example
/// ```ignore
/// log_metric!("event" = "rle_flush", "values" = 1024);
/// ```
macro_rules! log_metric {
    ($($key:literal = $value:expr),+ $(,)?) => {
        if log::log_enabled!(log::Level::Debug) {
            let mut parts = Vec::new();
            $(
                parts.push(format!("\"{}\": \"{}\"", $key, $value));
            )+
            log::debug!("RLE_METRIC: {{ {} }}", parts.join(", "));
        }
    };
}

static INIT_LOGGER: Once = Once::new();

/// Installs an `env_logger` at `level`, writing `[LEVEL] message` lines to
/// stderr or, when `log_file` is given, appending them to that file.
///
/// Only the first call has any effect; later calls are no-ops.
pub fn init_logging(level: LevelFilter, log_file: Option<&Path>) -> Result<(), CodecError> {
    let file = match log_file {
        Some(path) => Some(OpenOptions::new().append(true).create(true).open(path)?),
        None => None,
    };

    INIT_LOGGER.call_once(move || {
        let mut builder = env_logger::Builder::new();

        builder.is_test(false);
        builder.filter_level(level);

        // Custom formatter: just print the level and message
        builder.format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()));

        if let Some(file) = file {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }

        let _ = builder.try_init();
    });
    Ok(())
}

/// Routes log output through the test harness so it is shown only for failing tests.
#[cfg(test)]
pub(crate) fn init_test_logging() {
    let _ = env_logger::Builder::new()
        .is_test(true)
        .filter_level(LevelFilter::Trace)
        .try_init();
}
