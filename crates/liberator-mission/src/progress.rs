//! Progress reporting with an ETA.

use std::time::{Duration, Instant};

use liberator_core::EventLog;

/// Default number of items between progress lines.
pub const DEFAULT_REPORT_EVERY: u64 = 50;

/// Point-in-time view of a long operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSnapshot {
    /// Items finished so far.
    pub current: u64,
    /// Items expected in total.
    pub total: u64,
    /// Time since the reporter was created.
    pub elapsed: Duration,
}

impl ProgressSnapshot {
    /// Completion in percent. Zero when the total is unknown.
    pub fn percent(&self) -> f64 {
        if self.total > 0 {
            self.current as f64 / self.total as f64 * 100.0
        } else {
            0.0
        }
    }

    /// Items per second so far.
    pub fn files_per_second(&self) -> f64 {
        if self.elapsed.as_secs_f64() > 0.0 {
            self.current as f64 / self.elapsed.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Projected remaining time at the current rate.
    pub fn eta(&self) -> Option<Duration> {
        if self.current == 0 {
            return None;
        }
        let remaining = self.total.saturating_sub(self.current) as f64;
        Some(Duration::from_secs_f64(
            self.elapsed.as_secs_f64() / self.current as f64 * remaining,
        ))
    }
}

/// Logs progress every N items and at completion.
#[derive(Debug)]
pub struct ProgressReporter {
    start_time: Instant,
    every: u64,
    last: Option<ProgressSnapshot>,
    events: EventLog,
}

impl ProgressReporter {
    /// Create a reporter that logs every `every` items (0 = only at completion).
    pub fn new(every: u64) -> Self {
        Self {
            start_time: Instant::now(),
            every,
            last: None,
            events: EventLog::new(),
        }
    }

    /// Record progress; logs a line when `current` hits the cadence or the total.
    pub fn report_progress(&mut self, current: u64, total: u64, operation: &str) {
        let snapshot = ProgressSnapshot {
            current,
            total,
            elapsed: self.start_time.elapsed(),
        };
        self.last = Some(snapshot);

        let on_cadence = self.every > 0 && current % self.every == 0;
        if !on_cadence && current != total {
            return;
        }

        match snapshot.eta() {
            Some(eta) => self.events.info(format!(
                "{operation}: {current}/{total} ({:.1}%) ETA: {:.1}min",
                snapshot.percent(),
                eta.as_secs_f64() / 60.0
            )),
            None => self
                .events
                .info(format!("{operation}: {current}/{total} (0.0%)")),
        }
    }

    /// Most recent progress, if any was reported.
    pub fn snapshot(&self) -> Option<ProgressSnapshot> {
        self.last
    }

    /// Items per second at the last report.
    pub fn files_per_second(&self) -> f64 {
        self.last.map(|s| s.files_per_second()).unwrap_or(0.0)
    }

    /// Logged events so far.
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Consume the reporter, returning its log.
    pub fn into_events(self) -> EventLog {
        self.events
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new(DEFAULT_REPORT_EVERY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cadence_and_completion() {
        let mut reporter = ProgressReporter::new(50);
        for i in 1..=120 {
            reporter.report_progress(i, 120, "Hashing");
        }

        let messages: Vec<_> = reporter
            .events()
            .events()
            .iter()
            .map(|e| e.message.clone())
            .collect();
        assert_eq!(messages.len(), 3);
        assert!(messages[0].starts_with("Hashing: 50/120 (41.7%) ETA: "));
        assert!(messages[1].starts_with("Hashing: 100/120 (83.3%)"));
        assert!(messages[2].starts_with("Hashing: 120/120 (100.0%) ETA: 0.0min"));
    }

    #[test]
    fn test_zero_progress() {
        let mut reporter = ProgressReporter::new(50);
        reporter.report_progress(0, 10, "Hashing");

        let events = reporter.into_events();
        assert_eq!(events.events()[0].message, "Hashing: 0/10 (0.0%)");
    }

    #[test]
    fn test_snapshot_math() {
        let snapshot = ProgressSnapshot {
            current: 10,
            total: 40,
            elapsed: Duration::from_secs(5),
        };
        assert_eq!(snapshot.percent(), 25.0);
        assert_eq!(snapshot.files_per_second(), 2.0);
        assert_eq!(snapshot.eta(), Some(Duration::from_secs(15)));
    }

    #[test]
    fn test_files_per_second_before_any_report() {
        assert_eq!(ProgressReporter::default().files_per_second(), 0.0);
    }
}
