//! Workload report DTO
//!
//! Serializable summary printed by the binary after a workload run.

use serde::Serialize;

/// Outcome of one workload run.
#[derive(Debug, Clone, Serialize)]
pub struct WorkloadReport {
    /// Run start (RFC 3339)
    pub started_at: String,
    /// Cache capacity
    pub capacity: usize,
    /// Worker threads
    pub workers: usize,
    /// Sequences per worker
    pub iterations: usize,
    /// Cache operations issued in total
    pub operations: u64,
    /// Fresh entries pushed out by other workers before they could be read back
    pub early_evictions: u64,
    /// Contract violations observed
    pub failures: u64,
    /// First violation, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_failure: Option<String>,
    /// Entry count when the run finished
    pub final_len: usize,
    /// Wall time in milliseconds
    pub elapsed_ms: u64,
}

impl WorkloadReport {
    /// Creates an empty report stamped with the current time.
    pub fn new(capacity: usize, workers: usize, iterations: usize) -> Self {
        Self {
            started_at: chrono::Utc::now().to_rfc3339(),
            capacity,
            workers,
            iterations,
            operations: 0,
            early_evictions: 0,
            failures: 0,
            first_failure: None,
            final_len: 0,
            elapsed_ms: 0,
        }
    }

    /// True when no violation was observed.
    pub fn is_clean(&self) -> bool {
        self.failures == 0
    }

    /// Adds a per-worker report into this one.
    pub(crate) fn absorb(&mut self, other: WorkloadReport) {
        self.operations += other.operations;
        self.early_evictions += other.early_evictions;
        self.failures += other.failures;
        if self.first_failure.is_none() {
            self.first_failure = other.first_failure;
        }
    }

    pub(crate) fn record_failure(&mut self, message: String) {
        self.failures += 1;
        if self.first_failure.is_none() {
            self.first_failure = Some(message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_serialize() {
        let report = WorkloadReport::new(10, 2, 100);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["capacity"], 10);
        assert_eq!(json["workers"], 2);
        assert_eq!(json["failures"], 0);
        assert!(json["started_at"].is_string());
        // Omitted while clean
        assert!(json.get("first_failure").is_none());
    }

    #[test]
    fn test_report_keeps_first_failure() {
        let mut report = WorkloadReport::new(10, 1, 1);

        report.record_failure("first".to_string());
        report.record_failure("second".to_string());

        assert!(!report.is_clean());
        assert_eq!(report.failures, 2);
        assert_eq!(report.first_failure.as_deref(), Some("first"));
    }

    #[test]
    fn test_report_absorb() {
        let mut total = WorkloadReport::new(10, 2, 5);

        let mut a = WorkloadReport::new(10, 1, 5);
        a.operations = 60;
        let mut b = WorkloadReport::new(10, 1, 5);
        b.operations = 60;
        b.early_evictions = 2;
        b.record_failure("boom".to_string());

        total.absorb(a);
        total.absorb(b);

        assert_eq!(total.operations, 120);
        assert_eq!(total.early_evictions, 2);
        assert_eq!(total.failures, 1);
        assert_eq!(total.first_failure.as_deref(), Some("boom"));
    }
}
