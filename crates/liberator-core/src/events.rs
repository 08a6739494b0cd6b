//! Structured per-agent event logs.
//!
//! Analyses never print. Each one returns an [`EventLog`] alongside its
//! result, and the coordinator decides where the events go: the tracing
//! subscriber, the `agent_logs` section of the report, or both.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Severity of a log event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventLevel {
    Info,
    Warn,
}

/// A single event emitted by an agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEvent {
    /// Wall-clock time the event was recorded.
    pub at: DateTime<Local>,
    /// Severity.
    pub level: EventLevel,
    /// Message text.
    pub message: String,
}

impl LogEvent {
    /// Render as `[HH:MM:SS] Agent: message`.
    pub fn line(&self, agent: &str) -> String {
        format!("[{}] {}: {}", self.at.format("%H:%M:%S"), agent, self.message)
    }
}

/// Ordered list of events from one agent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<LogEvent>,
}

impl EventLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an informational event.
    pub fn info(&mut self, message: impl Into<String>) {
        self.push(EventLevel::Info, message);
    }

    /// Record a per-file failure or other warning.
    pub fn warn(&mut self, message: impl Into<String>) {
        self.push(EventLevel::Warn, message);
    }

    fn push(&mut self, level: EventLevel, message: impl Into<String>) {
        self.events.push(LogEvent {
            at: Local::now(),
            level,
            message: message.into(),
        });
    }

    /// Append all events from another log.
    pub fn extend(&mut self, other: EventLog) {
        self.events.extend(other.events);
    }

    /// Get the events in order.
    pub fn events(&self) -> &[LogEvent] {
        &self.events
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if no events were recorded.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of warnings.
    pub fn warning_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| e.level == EventLevel::Warn)
            .count()
    }

    /// Render every event as a report line.
    pub fn lines(&self, agent: &str) -> Vec<String> {
        self.events.iter().map(|e| e.line(agent)).collect()
    }

    /// Forward every event to the tracing subscriber.
    pub fn emit(&self, agent: &str) {
        for event in &self.events {
            match event.level {
                EventLevel::Info => {
                    tracing::info!(target: "liberator::agent", agent, "{}", event.message)
                }
                EventLevel::Warn => {
                    tracing::warn!(target: "liberator::agent", agent, "{}", event.message)
                }
            }
        }
    }
}
