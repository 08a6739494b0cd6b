//! Named agents and their collected log streams.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, IntoEnumIterator};

use liberator_core::EventLog;

/// The components whose event streams appear in a report.
///
/// Declaration order is report order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Agent {
    DuplicateHunter,
    FolderOrganizer,
    SizeOptimizer,
    JunkDetector,
    ProgressReporter,
    SafetyNet,
}

impl Agent {
    /// Name used as the prefix of each log line.
    pub fn display_name(self) -> &'static str {
        match self {
            Agent::DuplicateHunter => "Duplicate-Hunter",
            Agent::FolderOrganizer => "Folder-Organizer",
            Agent::SizeOptimizer => "Size-Optimizer",
            Agent::JunkDetector => "Junk-Detector",
            Agent::ProgressReporter => "Progress-Reporter",
            Agent::SafetyNet => "Safety-Net",
        }
    }
}

/// Event logs for every agent, forwarded to tracing as they arrive.
#[derive(Debug, Clone)]
pub struct AgentLogs {
    logs: BTreeMap<Agent, EventLog>,
}

impl AgentLogs {
    /// Create an empty log for every agent.
    pub fn new() -> Self {
        Self {
            logs: Agent::iter().map(|a| (a, EventLog::new())).collect(),
        }
    }

    /// Append `events` to an agent's stream and emit them.
    pub fn record(&mut self, agent: Agent, events: EventLog) {
        events.emit(agent.display_name());
        self.logs.entry(agent).or_default().extend(events);
    }

    /// Record a single informational message.
    pub fn info(&mut self, agent: Agent, message: impl Into<String>) {
        let mut events = EventLog::new();
        events.info(message);
        self.record(agent, events);
    }

    /// Get an agent's log.
    pub fn get(&self, agent: Agent) -> Option<&EventLog> {
        self.logs.get(&agent)
    }

    /// Render every stream as report lines.
    pub fn lines(&self) -> BTreeMap<Agent, Vec<String>> {
        self.logs
            .iter()
            .map(|(agent, log)| (*agent, log.lines(agent.display_name())))
            .collect()
    }
}

impl Default for AgentLogs {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_and_names() {
        assert_eq!(Agent::DuplicateHunter.as_ref(), "duplicate_hunter");
        assert_eq!(Agent::SafetyNet.as_ref(), "safety_net");
        assert_eq!(Agent::SizeOptimizer.display_name(), "Size-Optimizer");
    }

    #[test]
    fn test_every_agent_present() {
        let mut logs = AgentLogs::new();
        logs.info(Agent::JunkDetector, "Found 0 junk files, 0.0 MB total");

        let lines = logs.lines();
        assert_eq!(lines.len(), 6);
        assert!(lines[&Agent::DuplicateHunter].is_empty());

        let line = &lines[&Agent::JunkDetector][0];
        assert!(line.starts_with('['));
        assert!(line.ends_with("] Junk-Detector: Found 0 junk files, 0.0 MB total"));
    }

    #[test]
    fn test_report_order() {
        let order: Vec<_> = AgentLogs::new().lines().into_keys().collect();
        assert_eq!(order, Agent::iter().collect::<Vec<_>>());
    }
}
