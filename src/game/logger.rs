//! Encounter logger
//!
//! Text lines go to stdout, an in-memory buffer, or both. In JSON format each
//! entry is printed as one object per line, and structured events are emitted
//! as their serde representation so tooling can consume a run directly.

use serde::{Deserialize, Serialize};
use std::cell::{Ref, RefCell};
use std::ops::Deref;

/// Verbosity level for encounter output
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Default,
    Serialize,
    Deserialize,
)]
pub enum VerbosityLevel {
    /// Silent - no output
    Silent = 0,
    /// Minimal - only the encounter outcome
    Minimal = 1,
    /// Normal - narrated results of every action (default)
    #[default]
    Normal = 2,
    /// Verbose - every state transition inside the engine
    Verbose = 3,
}

/// Output format for log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputFormat {
    /// Human-readable text output (default)
    #[default]
    Text,
    /// Machine-readable JSON output (one object per line)
    Json,
}

/// Output destination for log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputMode {
    /// Output only to stdout (default)
    #[default]
    Stdout,
    /// Capture only to in-memory buffer (no stdout)
    Memory,
    /// Both stdout and in-memory buffer
    Both,
}

/// A captured log entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    pub level: VerbosityLevel,
    pub message: String,
    /// Optional category (e.g. "event", "narration")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Read-only access to captured entries
pub struct LogGuard<'a> {
    guard: Ref<'a, Vec<LogEntry>>,
}

impl<'a> LogGuard<'a> {
    pub fn iter(&self) -> std::slice::Iter<'_, LogEntry> {
        self.guard.iter()
    }

    pub fn len(&self) -> usize {
        self.guard.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guard.is_empty()
    }
}

impl<'a> Deref for LogGuard<'a> {
    type Target = [LogEntry];

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

/// Centralized logger owned by the encounter
///
/// Logging methods take `&self`; the buffer uses interior mutability so the
/// engine can log while other fields are borrowed.
pub struct GameLogger {
    verbosity: VerbosityLevel,
    output_format: OutputFormat,
    output_mode: OutputMode,
    log_buffer: RefCell<Vec<LogEntry>>,
}

impl GameLogger {
    /// Create a new logger with default verbosity (Normal)
    pub fn new() -> Self {
        Self::with_verbosity(VerbosityLevel::default())
    }

    pub fn with_verbosity(verbosity: VerbosityLevel) -> Self {
        GameLogger {
            verbosity,
            output_format: OutputFormat::default(),
            output_mode: OutputMode::default(),
            log_buffer: RefCell::new(Vec::new()),
        }
    }

    pub fn set_output_mode(&mut self, mode: OutputMode) {
        self.output_mode = mode;
    }

    /// Capture to memory only, suppressing stdout
    pub fn enable_capture(&mut self) {
        self.output_mode = OutputMode::Memory;
    }

    pub fn is_capturing(&self) -> bool {
        matches!(self.output_mode, OutputMode::Memory | OutputMode::Both)
    }

    /// Print buffered entries allowed by the current verbosity, then clear
    pub fn flush_buffer(&mut self) {
        let buffer = self.log_buffer.borrow();
        for entry in buffer.iter() {
            if entry.level <= self.verbosity {
                self.write_stdout(entry);
            }
        }
        drop(buffer);
        self.clear_logs();
    }

    /// Captured entries, borrowed
    pub fn logs(&self) -> LogGuard<'_> {
        LogGuard {
            guard: self.log_buffer.borrow(),
        }
    }

    pub fn clear_logs(&mut self) {
        self.log_buffer.borrow_mut().clear();
    }

    pub fn set_output_format(&mut self, format: OutputFormat) {
        self.output_format = format;
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output_format
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        self.verbosity
    }

    pub fn set_verbosity(&mut self, verbosity: VerbosityLevel) {
        self.verbosity = verbosity;
    }

    /// Whether a message at `level` would be printed or captured
    #[inline]
    pub fn enabled(&self, level: VerbosityLevel) -> bool {
        level != VerbosityLevel::Silent && (level <= self.verbosity || self.is_capturing())
    }

    fn write_stdout(&self, entry: &LogEntry) {
        match self.output_format {
            OutputFormat::Text => {
                if entry.level == VerbosityLevel::Minimal {
                    println!("{}", entry.message);
                } else {
                    println!("  {}", entry.message);
                }
            }
            OutputFormat::Json => {
                // Event entries already hold a JSON object
                if entry.category.as_deref() == Some("event") {
                    println!("{}", entry.message);
                } else if let Ok(line) = serde_json::to_string(entry) {
                    println!("{}", line);
                }
            }
        }
    }

    fn record(&self, level: VerbosityLevel, message: String, category: Option<&str>) {
        if level == VerbosityLevel::Silent {
            return;
        }
        let should_capture = self.is_capturing();
        let should_output = matches!(self.output_mode, OutputMode::Stdout | OutputMode::Both)
            && level <= self.verbosity;
        if !should_capture && !should_output {
            return;
        }

        let entry = LogEntry {
            level,
            message,
            category: category.map(str::to_string),
        };
        if should_output {
            self.write_stdout(&entry);
        }
        if should_capture {
            self.log_buffer.borrow_mut().push(entry);
        }
    }

    #[inline]
    pub fn minimal(&self, message: &str) {
        if self.enabled(VerbosityLevel::Minimal) {
            self.record(VerbosityLevel::Minimal, message.to_string(), None);
        }
    }

    #[inline]
    pub fn normal(&self, message: &str) {
        if self.enabled(VerbosityLevel::Normal) {
            self.record(VerbosityLevel::Normal, message.to_string(), None);
        }
    }

    #[inline]
    pub fn verbose(&self, message: &str) {
        if self.enabled(VerbosityLevel::Verbose) {
            self.record(VerbosityLevel::Verbose, message.to_string(), None);
        }
    }

    /// Log a narration line at Normal level
    pub fn narration(&self, message: &str) {
        if self.enabled(VerbosityLevel::Normal) {
            self.record(
                VerbosityLevel::Normal,
                message.to_string(),
                Some("narration"),
            );
        }
    }

    /// Log a structured record
    ///
    /// In JSON format the record itself is written; in text format `text` is.
    pub fn event<T: Serialize>(&self, level: VerbosityLevel, record: &T, text: &str) {
        if !self.enabled(level) {
            return;
        }
        match self.output_format {
            OutputFormat::Json => match serde_json::to_string(record) {
                Ok(json) => self.record(level, json, Some("event")),
                Err(_) => self.record(level, text.to_string(), None),
            },
            OutputFormat::Text => self.record(level, text.to_string(), Some("event")),
        }
    }
}

impl Default for GameLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for GameLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameLogger")
            .field("verbosity", &self.verbosity)
            .field("output_mode", &self.output_mode)
            .field("log_count", &self.log_buffer.borrow().len())
            .finish()
    }
}

// Clones share settings but start with an empty buffer
impl Clone for GameLogger {
    fn clone(&self) -> Self {
        GameLogger {
            verbosity: self.verbosity,
            output_format: self.output_format,
            output_mode: self.output_mode,
            log_buffer: RefCell::new(Vec::new()),
        }
    }
}

impl Serialize for GameLogger {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("GameLogger", 3)?;
        state.serialize_field("verbosity", &self.verbosity)?;
        state.serialize_field("output_format", &self.output_format)?;
        state.serialize_field("output_mode", &self.output_mode)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for GameLogger {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct GameLoggerData {
            verbosity: VerbosityLevel,
            #[serde(default)]
            output_format: OutputFormat,
            #[serde(default)]
            output_mode: OutputMode,
        }

        let data = GameLoggerData::deserialize(deserializer)?;
        let mut logger = GameLogger::with_verbosity(data.verbosity);
        logger.output_format = data.output_format;
        logger.output_mode = data.output_mode;
        Ok(logger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logger_creation() {
        let logger = GameLogger::new();
        assert_eq!(logger.verbosity(), VerbosityLevel::Normal);
    }

    #[test]
    fn test_log_capture() {
        let mut logger = GameLogger::new();
        logger.enable_capture();

        logger.normal("test message");
        logger.minimal("minimal message");

        let logs = logger.logs();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].message, "test message");
        assert_eq!(logs[1].message, "minimal message");
    }

    #[test]
    fn test_capture_keeps_verbose_entries() {
        let mut logger = GameLogger::with_verbosity(VerbosityLevel::Minimal);
        logger.enable_capture();
        logger.verbose("transition");
        assert_eq!(logger.logs().len(), 1);
        assert_eq!(logger.logs()[0].level, VerbosityLevel::Verbose);
    }

    #[test]
    fn test_silent_never_records() {
        let mut logger = GameLogger::with_verbosity(VerbosityLevel::Silent);
        logger.enable_capture();
        assert!(!logger.enabled(VerbosityLevel::Silent));
        logger.minimal("kept in buffer");
        assert_eq!(logger.logs().len(), 1);
    }

    #[test]
    fn test_json_event_entries() {
        #[derive(Serialize)]
        struct Ping {
            n: u32,
        }

        let mut logger = GameLogger::new();
        logger.enable_capture();
        logger.set_output_format(OutputFormat::Json);
        logger.event(VerbosityLevel::Normal, &Ping { n: 3 }, "ping 3");

        let logs = logger.logs();
        assert_eq!(logs[0].message, r#"{"n":3}"#);
        assert_eq!(logs[0].category.as_deref(), Some("event"));
    }

    #[test]
    fn test_both_mode_captures_within_verbosity() {
        let mut logger = GameLogger::with_verbosity(VerbosityLevel::Minimal);
        logger.set_output_mode(OutputMode::Both);
        logger.minimal("printed and kept");
        logger.narration("kept only");
        let logs = logger.logs();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[1].category.as_deref(), Some("narration"));
    }

    #[test]
    fn test_flush_buffer() {
        let mut logger = GameLogger::new();
        logger.enable_capture();
        logger.normal("message 1");
        logger.normal("message 2");
        assert_eq!(logger.logs().len(), 2);

        logger.flush_buffer();
        assert_eq!(logger.logs().len(), 0);
    }

    #[test]
    fn test_serde_drops_buffer() {
        let mut logger = GameLogger::with_verbosity(VerbosityLevel::Verbose);
        logger.enable_capture();
        logger.normal("gone after round trip");
        let json = serde_json::to_string(&logger).unwrap();
        let back: GameLogger = serde_json::from_str(&json).unwrap();
        assert_eq!(back.verbosity(), VerbosityLevel::Verbose);
        assert!(back.is_capturing());
        assert!(back.logs().is_empty());
    }
}
