//! Rolling Logger
//!
//! A `tracing` subscriber for browser applications. Formatted lines are
//! kept in a fixed-size circular buffer (so the UI can show recent
//! activity) and mirrored to the browser console, or stderr natively.

use std::collections::VecDeque;
use std::fmt;
use std::io;
use std::sync::{Arc, Mutex, OnceLock};

use tracing::{Level, Metadata};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::fmt::MakeWriter;

static BUFFER: OnceLock<Arc<LogBuffer>> = OnceLock::new();

/// Logger setup errors
#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    #[error("logger already initialized")]
    AlreadyInitialized,
    #[error("logger not initialized")]
    NotInitialized,
    #[error("failed to install subscriber: {0}")]
    Install(String),
}

/// Circular buffer of formatted log lines
#[derive(Debug)]
pub struct LogBuffer {
    capacity: usize,
    lines: Mutex<VecDeque<String>>,
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            lines: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    /// Append a line, evicting the oldest one when full
    pub fn push(&self, line: String) {
        let mut lines = self.lines.lock().unwrap_or_else(|e| e.into_inner());
        if lines.len() == self.capacity {
            lines.pop_front();
        }
        lines.push_back(line);
    }

    /// Copy of the buffered lines, oldest first
    pub fn snapshot(&self) -> Vec<String> {
        let lines = self.lines.lock().unwrap_or_else(|e| e.into_inner());
        lines.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Wall-clock timestamps via chrono (std's SystemTime panics on wasm32)
struct ClockTime;

impl FormatTime for ClockTime {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%H:%M:%S%.3f"))
    }
}

/// Writer factory handed to the fmt layer
#[derive(Clone)]
pub struct BufferMakeWriter {
    buffer: Arc<LogBuffer>,
    mirror: bool,
}

impl BufferMakeWriter {
    pub fn new(buffer: Arc<LogBuffer>, mirror: bool) -> Self {
        Self { buffer, mirror }
    }
}

impl<'a> MakeWriter<'a> for BufferMakeWriter {
    type Writer = LineWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LineWriter {
            buffer: self.buffer.clone(),
            mirror: self.mirror,
            level: Level::INFO,
            pending: Vec::new(),
        }
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        let mut writer = self.make_writer();
        writer.level = *meta.level();
        writer
    }
}

/// Collects one formatted event; the line is committed on drop
pub struct LineWriter {
    buffer: Arc<LogBuffer>,
    mirror: bool,
    level: Level,
    pending: Vec<u8>,
}

impl io::Write for LineWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for LineWriter {
    fn drop(&mut self) {
        let line = String::from_utf8_lossy(&self.pending).trim_end().to_string();
        if line.is_empty() {
            return;
        }
        if self.mirror {
            mirror_line(self.level, &line);
        }
        self.buffer.push(line);
    }
}

#[cfg(target_arch = "wasm32")]
fn mirror_line(level: Level, line: &str) {
    if level == Level::ERROR {
        web_sys::console::error_1(&line.into());
    } else if level == Level::WARN {
        web_sys::console::warn_1(&line.into());
    } else if level > Level::INFO {
        web_sys::console::debug_1(&line.into());
    } else {
        web_sys::console::log_1(&line.into());
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn mirror_line(_level: Level, line: &str) {
    eprintln!("{}", line);
}

/// Parse a level name, falling back to INFO
pub fn parse_level(level: &str) -> LevelFilter {
    level.trim().parse::<LevelFilter>().unwrap_or(LevelFilter::INFO)
}

/// Install the global subscriber. Call once at startup.
pub fn init_logger(app_name: &str, capacity: usize, level: &str) -> Result<(), LoggerError> {
    let buffer = Arc::new(LogBuffer::new(capacity));
    BUFFER
        .set(buffer.clone())
        .map_err(|_| LoggerError::AlreadyInitialized)?;

    tracing_subscriber::fmt()
        .with_writer(BufferMakeWriter::new(buffer, true))
        .with_timer(ClockTime)
        .with_ansi(false)
        .with_max_level(parse_level(level))
        .try_init()
        .map_err(|e| LoggerError::Install(e.to_string()))?;

    tracing::info!(app = app_name, capacity, "logger initialized");
    Ok(())
}

/// Log an info line through the installed subscriber
pub fn info(msg: &str) -> Result<(), LoggerError> {
    BUFFER.get().ok_or(LoggerError::NotInitialized)?;
    tracing::info!("{}", msg);
    Ok(())
}

/// Most recent lines, oldest first. Empty before `init_logger`.
pub fn recent_lines() -> Vec<String> {
    BUFFER.get().map(|b| b.snapshot()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_buffer_evicts_oldest() {
        let buffer = LogBuffer::new(3);
        for i in 0..5 {
            buffer.push(format!("line {}", i));
        }
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.snapshot(), vec!["line 2", "line 3", "line 4"]);
    }

    #[test]
    fn test_zero_capacity_keeps_one_line() {
        let buffer = LogBuffer::new(0);
        buffer.push("a".to_string());
        buffer.push("b".to_string());
        assert_eq!(buffer.capacity(), 1);
        assert_eq!(buffer.snapshot(), vec!["b"]);
    }

    #[test]
    fn test_line_writer_commits_on_drop() {
        let buffer = Arc::new(LogBuffer::new(10));
        let make = BufferMakeWriter::new(buffer.clone(), false);
        {
            let mut w = make.make_writer();
            w.write_all(b"INFO request ").unwrap();
            w.write_all(b"sent\n").unwrap();
        }
        {
            // Blank events are not stored
            let mut w = make.make_writer();
            w.write_all(b"\n").unwrap();
        }
        assert_eq!(buffer.snapshot(), vec!["INFO request sent"]);
    }

    #[test]
    fn test_subscriber_writes_into_buffer() {
        let buffer = Arc::new(LogBuffer::new(10));
        let subscriber = tracing_subscriber::fmt()
            .with_writer(BufferMakeWriter::new(buffer.clone(), false))
            .with_timer(ClockTime)
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(status = 401, "session purged");
        });

        let lines = buffer.snapshot();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("WARN"));
        assert!(lines[0].contains("session purged"));
        assert!(lines[0].contains("status=401"));
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), LevelFilter::DEBUG);
        assert_eq!(parse_level(" WARN "), LevelFilter::WARN);
        assert_eq!(parse_level("nonsense"), LevelFilter::INFO);
    }

    #[test]
    fn test_helpers_require_init() {
        if BUFFER.get().is_none() {
            assert!(matches!(info("x"), Err(LoggerError::NotInitialized)));
            assert!(recent_lines().is_empty());
        }
    }
}
