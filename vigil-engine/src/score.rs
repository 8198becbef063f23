//! Quality metrics and score aggregation.
//!
//! The quality score is a penalty model, not a weighted average: a single
//! critical failure can dominate an otherwise high pass rate. The formula
//! is fixed so downstream consumers can reproduce it bit for bit:
//!
//! ```text
//! score = max(0, pass_rate - (critical * 10 + major * 5 + minor * 1))
//! ```

use crate::engine::DataQualityCheck;
use crate::rules::RuleType;
use crate::severity::Severity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregate counts over a set of checks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityMetrics {
    /// Total number of checks
    pub total_checks: usize,
    /// Number of passed checks
    pub passed_checks: usize,
    /// Number of failed checks
    pub failed_checks: usize,
    /// Passed / total as a percentage, rounded to 2 decimals, 0 when empty
    pub pass_rate: f64,
    /// Failed checks with critical severity
    pub critical_failures: usize,
    /// Failed checks with major severity
    pub major_failures: usize,
    /// Failed checks with minor severity
    pub minor_failures: usize,
    /// Check counts per rule type, covering passed and failed checks
    pub checks_by_type: BTreeMap<RuleType, usize>,
}

/// Reduces checks into metrics and a single 0 to 100 quality score.
///
/// # Examples
///
/// ```rust
/// use vigil_engine::score::{QualityMetrics, ScoreAggregator};
///
/// let metrics = QualityMetrics {
///     total_checks: 10,
///     passed_checks: 9,
///     failed_checks: 1,
///     pass_rate: 90.0,
///     critical_failures: 1,
///     ..Default::default()
/// };
/// assert_eq!(ScoreAggregator::compute_score(&metrics), 80.0);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoreAggregator;

impl ScoreAggregator {
    /// Computes aggregate metrics over a set of checks.
    pub fn compute_metrics(checks: &[DataQualityCheck]) -> QualityMetrics {
        let total_checks = checks.len();
        let passed_checks = checks.iter().filter(|check| check.passed).count();
        let failed_checks = total_checks - passed_checks;

        let pass_rate = if total_checks == 0 {
            0.0
        } else {
            round2(passed_checks as f64 / total_checks as f64 * 100.0)
        };

        let mut critical_failures = 0;
        let mut major_failures = 0;
        let mut minor_failures = 0;
        let mut checks_by_type: BTreeMap<RuleType, usize> = BTreeMap::new();

        for check in checks {
            *checks_by_type.entry(check.rule_type).or_default() += 1;
            if !check.passed {
                match check.severity {
                    Severity::Critical => critical_failures += 1,
                    Severity::Major => major_failures += 1,
                    Severity::Minor => minor_failures += 1,
                    Severity::Info => {}
                }
            }
        }

        QualityMetrics {
            total_checks,
            passed_checks,
            failed_checks,
            pass_rate,
            critical_failures,
            major_failures,
            minor_failures,
            checks_by_type,
        }
    }

    /// Computes the quality score for a set of metrics.
    ///
    /// The score starts at the pass rate and loses the severity-weighted
    /// penalty of every failed check, floored at zero and rounded to 2
    /// decimals.
    pub fn compute_score(metrics: &QualityMetrics) -> f64 {
        let penalty = metrics.critical_failures as f64 * Severity::Critical.penalty_weight()
            + metrics.major_failures as f64 * Severity::Major.penalty_weight()
            + metrics.minor_failures as f64 * Severity::Minor.penalty_weight();
        round2((metrics.pass_rate - penalty).max(0.0))
    }
}

/// Rounds to 2 decimal places.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
