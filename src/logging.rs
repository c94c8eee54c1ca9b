//! Diagnostic logging for the binary.
//!
//! Library code emits `key=value` events through the `log` facade; this
//! installs a stderr backend. `RUST_LOG` overrides the configured level.

use crate::errors::{AppError, AppResult};
use flexi_logger::{Logger, LoggerHandle};

/// Start the stderr logger. Keep the handle alive for the process lifetime.
pub fn init_logging(level: &str) -> AppResult<LoggerHandle> {
    Logger::try_with_env_or_str(level)
        .map_err(|e| AppError::Config(format!("invalid log level `{}`: {}", level, e)))?
        .log_to_stderr()
        .start()
        .map_err(|e| AppError::Config(format!("failed to start logger: {}", e)))
}
