// Copyright 2026 Hypermesh Foundation. All rights reserved.
// WebTracking Simulation Suite - Console Log Feed

use crate::types::{LogEntry, LogLevel};

/// Scripted boot messages, appended one at a time on startup.
pub const BOOT_MESSAGES: [&str; 5] = [
    "Initializing orchestrator ai.sh...",
    "Loading scoreboard from memory...",
    "Checking dependencies: curl [OK], jq [OK]",
    "Connecting to OLLAMA_HOST...",
    "Model 'core' ready for meta-eval.",
];

pub const MISSING_CREDENTIAL_MESSAGE: &str = "API Key not found in environment. AI features disabled.";

// ─── Time Source ─────────────────────────────────────────────────────────────

/// Produces the display timestamp for a new entry.
pub trait TimeSource {
    fn timestamp(&self) -> String;
}

/// Local wall-clock time, 24-hour `HH:MM:SS`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl TimeSource for LocalClock {
    fn timestamp(&self) -> String {
        chrono::Local::now().format("%H:%M:%S").to_string()
    }
}

/// Always returns the same stamp. Used by tests and replay runs.
#[derive(Debug, Clone)]
pub struct FixedClock(pub String);

impl TimeSource for FixedClock {
    fn timestamp(&self) -> String {
        self.0.clone()
    }
}

// ─── LogFeed ─────────────────────────────────────────────────────────────────

/// Append-only console history. Entries are never edited or removed.
pub struct LogFeed {
    entries: Vec<LogEntry>,
    clock: Box<dyn TimeSource>,
}

impl std::fmt::Debug for LogFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogFeed").field("entries", &self.entries.len()).finish()
    }
}

impl Default for LogFeed {
    fn default() -> Self {
        Self::new(Box::new(LocalClock))
    }
}

impl LogFeed {
    pub fn new(clock: Box<dyn TimeSource>) -> Self {
        Self { entries: Vec::new(), clock }
    }

    pub fn append(&mut self, level: LogLevel, module: &str, message: impl Into<String>) -> &LogEntry {
        let entry = LogEntry {
            timestamp: self.clock.timestamp(),
            level,
            module: module.to_string(),
            message: message.into(),
        };
        tracing::debug!(level = %entry.level, module = %entry.module, "log entry appended");
        self.entries.push(entry);
        &self.entries[self.entries.len() - 1]
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Entries appended at or after `from`, for incremental host redraws.
    pub fn since(&self, from: usize) -> &[LogEntry] {
        &self.entries[from.min(self.entries.len())..]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
