use crate::config::LoggingConfig;
use crate::domains::logger::{DomainLogger, DynLogger};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::mpsc;

const TARGET: &str = "tilemap_path";

/// Forwards domain log lines to `tracing`.
pub struct TracingLogger;

impl DomainLogger for TracingLogger {
    fn info(&self, msg: &str) {
        tracing::info!(target: TARGET, "{}", msg);
    }

    fn warn(&self, msg: &str) {
        tracing::warn!(target: TARGET, "{}", msg);
    }

    fn error(&self, msg: &str) {
        tracing::error!(target: TARGET, "{}", msg);
    }
}

/// Discards everything; the default for unit tests.
pub struct NoopLogger;

impl DomainLogger for NoopLogger {
    fn info(&self, _msg: &str) {}
    fn warn(&self, _msg: &str) {}
    fn error(&self, _msg: &str) {}
}

/// Writes through the `log` facade into a `fast_log` file appender.
pub struct FileLogger;

impl FileLogger {
    /// Installs `fast_log` as the global `log` backend. Can only succeed once
    /// per process.
    pub fn init(path: &str) -> Result<Self, String> {
        fast_log::init(
            fast_log::config::Config::new()
                .file(path)
                .level(log::LevelFilter::Info),
        )
        .map_err(|e| format!("Failed to initialize fast_log at {}: {}", path, e))?;
        Ok(Self)
    }
}

impl DomainLogger for FileLogger {
    fn info(&self, msg: &str) {
        log::info!(target: TARGET, "{} - {}", Utc::now().to_rfc3339(), msg);
    }

    fn warn(&self, msg: &str) {
        log::warn!(target: TARGET, "{} - {}", Utc::now().to_rfc3339(), msg);
    }

    fn error(&self, msg: &str) {
        log::error!(target: TARGET, "{} - {}", Utc::now().to_rfc3339(), msg);
    }
}

/// Fans each line out to every inner logger, in order.
pub struct MultiLogger {
    loggers: Vec<DynLogger>,
}

impl MultiLogger {
    pub fn new(loggers: Vec<DynLogger>) -> Self {
        Self { loggers }
    }
}

impl DomainLogger for MultiLogger {
    fn info(&self, msg: &str) {
        self.loggers.iter().for_each(|l| l.info(msg));
    }

    fn warn(&self, msg: &str) {
        self.loggers.iter().for_each(|l| l.warn(msg));
    }

    fn error(&self, msg: &str) {
        self.loggers.iter().for_each(|l| l.error(msg));
    }
}

enum Level {
    Info,
    Warn,
    Error,
}

/// Hands lines to a background task so a slow sink never stalls a follow
/// task. Lines are dropped when the buffer is full. Needs a tokio runtime.
pub fn init_buffered_logger(inner: DynLogger, capacity: usize) -> DynLogger {
    let (tx, mut rx) = mpsc::channel::<(Level, String)>(capacity.max(1));

    tokio::spawn(async move {
        while let Some((level, msg)) = rx.recv().await {
            match level {
                Level::Info => inner.info(&msg),
                Level::Warn => inner.warn(&msg),
                Level::Error => inner.error(&msg),
            }
        }
    });

    struct BufferedLogger {
        sender: mpsc::Sender<(Level, String)>,
    }

    impl DomainLogger for BufferedLogger {
        fn info(&self, msg: &str) {
            let _ = self.sender.try_send((Level::Info, msg.to_string()));
        }

        fn warn(&self, msg: &str) {
            let _ = self.sender.try_send((Level::Warn, msg.to_string()));
        }

        fn error(&self, msg: &str) {
            let _ = self.sender.try_send((Level::Error, msg.to_string()));
        }
    }

    Arc::new(BufferedLogger { sender: tx })
}

/// Builds the domain logger described by `config`: tracing always, plus the
/// file sink when configured. Falls back to tracing alone if the file logger
/// cannot be installed.
pub fn init_logger(config: &LoggingConfig) -> DynLogger {
    let tracing_logger: DynLogger = Arc::new(TracingLogger);

    let logger = match &config.file {
        Some(path) => match FileLogger::init(path) {
            Ok(file_logger) => {
                Arc::new(MultiLogger::new(vec![tracing_logger, Arc::new(file_logger)])) as DynLogger
            }
            Err(e) => {
                tracing_logger.warn(&e);
                tracing_logger
            }
        },
        None => tracing_logger,
    };

    if config.buffered {
        init_buffered_logger(logger, config.buffer_capacity)
    } else {
        logger
    }
}

pub fn init_noop_logger() -> DynLogger {
    Arc::new(NoopLogger)
}
