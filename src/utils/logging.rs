// Sat Oct 17 2026 - Alex

use colored::*;
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::time::Instant;

pub struct LoggingUtils;

impl LoggingUtils {
    /// Installs the coloured stderr logger. A second call is a no-op.
    pub fn init_logger(level: LevelFilter, use_color: bool) {
        let logger = Box::new(ColoredLogger::new(level, use_color));
        if log::set_boxed_logger(logger).is_ok() {
            log::set_max_level(level);
        }
    }

    /// Defers to `RUST_LOG` via env_logger, falling back to `level`.
    pub fn init_from_env(level: LevelFilter) {
        let _ = env_logger::Builder::new()
            .filter_level(level)
            .parse_default_env()
            .format_timestamp(None)
            .try_init();
    }

    pub fn level_from_str(s: &str) -> Option<LevelFilter> {
        match s.to_lowercase().as_str() {
            "error" => Some(LevelFilter::Error),
            "warn" | "warning" => Some(LevelFilter::Warn),
            "info" => Some(LevelFilter::Info),
            "debug" => Some(LevelFilter::Debug),
            "trace" => Some(LevelFilter::Trace),
            "off" => Some(LevelFilter::Off),
            _ => None,
        }
    }
}

struct ColoredLogger {
    level: LevelFilter,
    use_color: bool,
}

impl ColoredLogger {
    fn new(level: LevelFilter, use_color: bool) -> Self {
        Self { level, use_color }
    }

    fn format_level(&self, level: Level) -> String {
        if !self.use_color {
            return format!("{:5}", level);
        }
        match level {
            Level::Error => "ERROR".red().bold(),
            Level::Warn => "WARN ".yellow().bold(),
            Level::Info => "INFO ".green().bold(),
            Level::Debug => "DEBUG".blue().bold(),
            Level::Trace => "TRACE".magenta().bold(),
        }
        .to_string()
    }
}

impl Log for ColoredLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let target = record.target().trim_start_matches("krossbones::");
        let target = if self.use_color {
            format!("[{}]", target).dimmed().to_string()
        } else {
            format!("[{}]", target)
        };

        eprintln!("{} {} {}", self.format_level(record.level()), target, record.args());
    }

    fn flush(&self) {}
}

pub struct ScopedTimer {
    name: String,
    start: Instant,
}

impl ScopedTimer {
    pub fn new(name: &str) -> Self {
        log::debug!("[TIMER] {} started", name);
        Self {
            name: name.to_string(),
            start: Instant::now(),
        }
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        let elapsed = self.start.elapsed();
        log::debug!("[TIMER] {} took {:.2}ms", self.name, elapsed.as_secs_f64() * 1000.0);
    }
}

pub fn scoped_timer(name: &str) -> ScopedTimer {
    ScopedTimer::new(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_str() {
        assert_eq!(LoggingUtils::level_from_str("DEBUG"), Some(LevelFilter::Debug));
        assert_eq!(LoggingUtils::level_from_str("warning"), Some(LevelFilter::Warn));
        assert_eq!(LoggingUtils::level_from_str("loud"), None);
    }

    #[test]
    fn test_plain_level_format() {
        let logger = ColoredLogger::new(LevelFilter::Info, false);
        assert_eq!(logger.format_level(Level::Warn), "WARN ");
        assert!(logger.enabled(&Metadata::builder().level(Level::Info).build()));
        assert!(!logger.enabled(&Metadata::builder().level(Level::Debug).build()));
    }
}
