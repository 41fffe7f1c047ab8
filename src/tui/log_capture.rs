//! In-memory log capture for TUI display

use crate::window::RollingWindow;
use std::io::{self, Write};
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

/// Maximum number of log lines to keep in memory
const MAX_LOG_LINES: NonZeroUsize = NonZeroUsize::new(1000).expect("non-zero");

/// Shared log buffer accessible by both tracing subscriber and TUI
#[derive(Clone)]
pub struct LogBuffer {
    lines: Arc<Mutex<RollingWindow<String>>>,
}

impl LogBuffer {
    /// Create a new log buffer
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(MAX_LOG_LINES)
    }

    /// Create a buffer keeping at most `capacity` lines
    #[must_use]
    pub fn with_capacity(capacity: NonZeroUsize) -> Self {
        Self {
            lines: Arc::new(Mutex::new(RollingWindow::new(capacity))),
        }
    }

    /// Add a log line to the buffer, dropping the oldest when full
    pub fn push(&self, line: String) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line);
        }
    }

    /// Get the most recent `count` lines, oldest first
    #[must_use]
    pub fn recent_lines(&self, count: usize) -> Vec<String> {
        if let Ok(lines) = self.lines.lock() {
            let skip = lines.len().saturating_sub(count);
            lines.iter().skip(skip).cloned().collect()
        } else {
            Vec::new()
        }
    }

    /// Get all log lines (returns a copy to avoid holding lock)
    #[must_use]
    pub fn all_lines(&self) -> Vec<String> {
        self.lines.lock().map(|lines| lines.to_vec()).unwrap_or_default()
    }
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LogBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let len = self.lines.lock().map(|lines| lines.len()).unwrap_or(0);
        f.debug_struct("LogBuffer").field("lines", &len).finish()
    }
}

/// Writer that appends complete lines to a [`LogBuffer`]
pub struct LogWriter {
    buffer: LogBuffer,
    line_buffer: String,
}

impl LogWriter {
    #[must_use]
    pub fn new(buffer: LogBuffer) -> Self {
        Self {
            buffer,
            line_buffer: String::with_capacity(256),
        }
    }

    fn take_line(&mut self) {
        if !self.line_buffer.is_empty() {
            self.buffer.push(std::mem::take(&mut self.line_buffer));
        }
    }
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let s = std::str::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut parts = s.split('\n');
        if let Some(first) = parts.next() {
            self.line_buffer.push_str(first);
        }
        for part in parts {
            self.take_line();
            self.line_buffer.push_str(part);
        }

        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.take_line();
        Ok(())
    }
}

impl Drop for LogWriter {
    fn drop(&mut self) {
        self.take_line();
    }
}

/// MakeWriter implementation for tracing_subscriber
pub struct LogMakeWriter {
    buffer: LogBuffer,
}

impl LogMakeWriter {
    #[must_use]
    pub fn new(buffer: LogBuffer) -> Self {
        Self { buffer }
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LogMakeWriter {
    type Writer = LogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogWriter::new(self.buffer.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_log_buffer_push_and_retrieve() {
        let buffer = LogBuffer::new();
        buffer.push("Line 1".to_string());
        buffer.push("Line 2".to_string());
        buffer.push("Line 3".to_string());

        let lines = buffer.all_lines();
        assert_eq!(lines, vec!["Line 1", "Line 2", "Line 3"]);
    }

    #[test]
    fn test_log_buffer_capacity_limit() {
        let buffer = LogBuffer::new();
        for i in 0..1500 {
            buffer.push(format!("Line {}", i));
        }

        let lines = buffer.all_lines();
        assert_eq!(lines.len(), MAX_LOG_LINES.get());
        assert_eq!(lines[0], "Line 500");
    }

    #[test]
    fn test_log_buffer_recent_lines() {
        let buffer = LogBuffer::with_capacity(NonZeroUsize::new(8).unwrap());
        for i in 0..10 {
            buffer.push(format!("Line {}", i));
        }

        assert_eq!(buffer.recent_lines(3), vec!["Line 7", "Line 8", "Line 9"]);
        assert_eq!(buffer.recent_lines(50).len(), 8);
    }

    #[test]
    fn test_log_writer_splits_lines() {
        let buffer = LogBuffer::new();
        let mut writer = LogWriter::new(buffer.clone());

        writer.write_all(b"Line 1\nLine 2\nLine 3\n").unwrap();
        writer.flush().unwrap();

        assert_eq!(buffer.all_lines(), vec!["Line 1", "Line 2", "Line 3"]);
    }

    #[test]
    fn test_log_writer_partial_lines() {
        let buffer = LogBuffer::new();
        let mut writer = LogWriter::new(buffer.clone());

        writer.write_all(b"Partial ").unwrap();
        writer.write_all(b"line\n").unwrap();
        assert_eq!(buffer.all_lines(), vec!["Partial line"]);
    }

    #[test]
    fn test_log_writer_drop_flushes() {
        let buffer = LogBuffer::new();
        {
            let mut writer = LogWriter::new(buffer.clone());
            writer.write_all(b"No newline").unwrap();
        }
        assert_eq!(buffer.all_lines(), vec!["No newline"]);
    }
}
