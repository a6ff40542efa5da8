use flexi_logger::{Duplicate, FileSpec, FlexiLoggerError, Logger, LoggerHandle, WriteMode};

/// Starts the global logger. Keep the returned handle alive for the life of
/// the process, buffered records are flushed when it drops.
pub fn init_logger(level: &str, log_to_file: bool) -> Result<LoggerHandle, FlexiLoggerError> {
    let logger = Logger::try_with_str(level)?.write_mode(WriteMode::BufferAndFlush);
    let logger = if log_to_file {
        logger
            .log_to_file(FileSpec::default())
            .duplicate_to_stderr(Duplicate::Warn)
    } else {
        logger.log_to_stderr()
    };
    logger.start()
}
