//! Benchmark Reports
//!
//! Plain structured reports (string and number fields only) plus the pure
//! scoring and grading functions. Reports are built once at the end of a
//! run and never mutated afterwards.

use serde::Serialize;

// == Score Weights ==
const THROUGHPUT_WEIGHT: f64 = 0.4;
const LATENCY_WEIGHT: f64 = 0.4;
const STABILITY_WEIGHT: f64 = 0.2;

/// Labels for the stress classification.
pub const STABILITY_STABLE: &str = "stable";
pub const STABILITY_UNSTABLE: &str = "unstable";

// == Benchmark Report ==
/// Result of a single benchmark run.
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkReport {
    /// Which benchmark produced this report
    pub name: String,
    /// Wall-clock seconds the run actually took
    pub duration_actual: f64,
    /// Operations completed before the deadline
    pub operations_completed: u64,
    /// Completed operations divided by actual elapsed seconds
    pub ops_per_second: f64,
    /// Mean per-operation latency in seconds
    pub avg_latency: f64,
    /// Errors observed during the run
    pub total_errors: u64,
    /// Errors divided by actual elapsed seconds
    pub error_rate_per_second: f64,
    /// Whether this run met its configured target
    pub target_achieved: bool,
    /// "stable" or "unstable", from the error rate
    pub stability: String,
    /// Letter grade for this run's primary score
    pub grade: String,
    /// When the run finished (RFC 3339)
    pub completed_at: String,
}

// == Suite Report ==
/// Combined result of the full benchmark suite.
#[derive(Debug, Clone, Serialize)]
pub struct SuiteReport {
    pub throughput: BenchmarkReport,
    pub latency: BenchmarkReport,
    pub stress: BenchmarkReport,
    /// Weighted 0-100 score across the three runs
    pub overall_score: f64,
    pub all_targets_achieved: bool,
    pub grade: String,
}

// == Scoring ==
/// 0-100 score for throughput against its floor.
pub fn throughput_score(ops_per_second: f64, floor: f64) -> f64 {
    if floor <= 0.0 {
        return 100.0;
    }
    (ops_per_second / floor).min(1.0) * 100.0
}

/// 0-100 score for average latency against its ceiling.
pub fn latency_score(avg_latency: f64, ceiling: f64) -> f64 {
    if avg_latency <= 0.0 {
        return 100.0;
    }
    (ceiling / avg_latency).min(1.0) * 100.0
}

/// 0-100 score for the stress error rate against its ceiling.
pub fn stability_score(error_rate: f64, ceiling: f64) -> f64 {
    if error_rate <= ceiling {
        100.0
    } else {
        (ceiling / error_rate).min(1.0) * 100.0
    }
}

/// Weighted overall score: throughput 0.4, latency 0.4, stability 0.2.
pub fn overall_score(throughput: f64, latency: f64, stability: f64) -> f64 {
    throughput * THROUGHPUT_WEIGHT + latency * LATENCY_WEIGHT + stability * STABILITY_WEIGHT
}

// == Grading ==
/// Maps a 0-100 score to a letter grade.
pub fn grade_for_score(score: f64) -> &'static str {
    if score >= 95.0 {
        "A+"
    } else if score >= 90.0 {
        "A"
    } else if score >= 85.0 {
        "B+"
    } else if score >= 80.0 {
        "B"
    } else if score >= 75.0 {
        "C+"
    } else if score >= 70.0 {
        "C"
    } else {
        "D"
    }
}

/// Stability label for an observed error rate.
pub fn stability_label(error_rate: f64, ceiling: f64) -> &'static str {
    if error_rate <= ceiling {
        STABILITY_STABLE
    } else {
        STABILITY_UNSTABLE
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_throughput_score_caps_at_100() {
        assert_eq!(throughput_score(5000.0, 1000.0), 100.0);
        assert_eq!(throughput_score(500.0, 1000.0), 50.0);
        assert_eq!(throughput_score(0.0, 1000.0), 0.0);
    }

    #[test]
    fn test_latency_score_caps_at_100() {
        assert_eq!(latency_score(0.05, 0.1), 100.0);
        assert_eq!(latency_score(0.2, 0.1), 50.0);
        assert_eq!(latency_score(0.0, 0.1), 100.0);
    }

    #[test]
    fn test_stability_score() {
        assert_eq!(stability_score(0.0, 0.01), 100.0);
        assert_eq!(stability_score(0.01, 0.01), 100.0);
        assert_eq!(stability_score(0.02, 0.01), 50.0);
    }

    #[test]
    fn test_overall_score_weights() {
        // 100/100/100 is a perfect run
        assert_eq!(overall_score(100.0, 100.0, 100.0), 100.0);
        // Stability carries the smallest weight
        let unstable = overall_score(100.0, 100.0, 0.0);
        let slow = overall_score(0.0, 100.0, 100.0);
        assert!(unstable > slow);
        assert_eq!(unstable, 80.0);
        assert_eq!(slow, 60.0);
    }

    #[test]
    fn test_grade_thresholds() {
        assert_eq!(grade_for_score(100.0), "A+");
        assert_eq!(grade_for_score(95.0), "A+");
        assert_eq!(grade_for_score(94.9), "A");
        assert_eq!(grade_for_score(90.0), "A");
        assert_eq!(grade_for_score(87.0), "B+");
        assert_eq!(grade_for_score(82.0), "B");
        assert_eq!(grade_for_score(76.0), "C+");
        assert_eq!(grade_for_score(71.0), "C");
        assert_eq!(grade_for_score(50.0), "D");
    }

    #[test]
    fn test_stability_label() {
        assert_eq!(stability_label(0.005, 0.01), STABILITY_STABLE);
        assert_eq!(stability_label(0.05, 0.01), STABILITY_UNSTABLE);
    }

    #[test]
    fn test_report_serialize() {
        let report = BenchmarkReport {
            name: "throughput".to_string(),
            duration_actual: 10.0,
            operations_completed: 25_000,
            ops_per_second: 2_500.0,
            avg_latency: 0.002,
            total_errors: 0,
            error_rate_per_second: 0.0,
            target_achieved: true,
            stability: STABILITY_STABLE.to_string(),
            grade: "A+".to_string(),
            completed_at: chrono::Utc::now().to_rfc3339(),
        };

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"name\":\"throughput\""));
        assert!(json.contains("\"target_achieved\":true"));
        assert!(json.contains("\"grade\":\"A+\""));
    }
}
