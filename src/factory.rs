//! Sink factory: configuration in, ready sink out

use crate::appenders::{ConsoleAppender, JsonAppender, RotatingFileWriter};
use crate::config::{LogConfig, SinkType};
use crate::core::{AtomicLevel, Result, StructuredSink};
use std::sync::Arc;

pub const KEY_APP_NAME: &str = "app_name";
pub const KEY_APP_MODE: &str = "app_mode";

/// Build the sink described by `config`, filtering through `level`.
///
/// The threshold cell is shared, not reset, so a rebuilt sink keeps the
/// severity the process was running with.
///
/// # Errors
///
/// Fails when the rotating writer cannot be created, e.g. the log directory
/// is not writable.
pub fn build_sink(config: &LogConfig, level: Arc<AtomicLevel>) -> Result<StructuredSink> {
    let builder = StructuredSink::builder()
        .level(level)
        .fixed_field(KEY_APP_NAME, config.app_name())
        .fixed_field(KEY_APP_MODE, config.app_mode());

    let sink = match config.sink_type() {
        SinkType::File => {
            let writer = RotatingFileWriter::new(config.file_pattern(), config.rotation_options())?;
            builder.appender(JsonAppender::new(writer)).build()
        }
        SinkType::Console => builder.appender(ConsoleAppender::new()).build(),
    };

    eprintln!(
        "[LOGGER INFO] {} sink ready for '{}' ({})",
        config.log_type(),
        config.app_name(),
        config.app_mode()
    );

    Ok(sink)
}
