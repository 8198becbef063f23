//! Issue reporting and quality report assembly.
//!
//! Failed checks become structured [`QualityIssue`]s with a per-rule-type
//! impact heuristic, and issues become a deduplicated set of remediation
//! recommendations. [`DataQualityReport`] bundles checks, metrics, score,
//! issues, and recommendations for the persistence and alerting layers.

use crate::engine::DataQualityCheck;
use crate::rules::RuleType;
use crate::score::{QualityMetrics, ScoreAggregator};
use crate::severity::Severity;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;

/// A structured issue derived from one failed check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityIssue {
    /// Name of the violated rule
    pub rule_name: String,
    /// Type of the violated rule
    pub rule_type: RuleType,
    /// Severity of the violation
    pub severity: Severity,
    /// Field the rule was evaluated against
    pub field_path: String,
    /// Short description of the issue
    pub description: String,
    /// Violation details copied from the check
    pub failure_details: Option<String>,
    /// Heuristic impact statement for the rule type
    pub impact: String,
}

/// Converts failed checks into issues and remediation recommendations.
#[derive(Debug, Clone, Copy, Default)]
pub struct IssueReporter;

impl IssueReporter {
    /// Builds one issue per failed check, in check order.
    pub fn build_issues(checks: &[DataQualityCheck]) -> Vec<QualityIssue> {
        checks
            .iter()
            .filter(|check| !check.passed)
            .map(|check| QualityIssue {
                rule_name: check.rule_name.clone(),
                rule_type: check.rule_type,
                severity: check.severity,
                field_path: check.field_path.clone(),
                description: format!(
                    "{} check failed on '{}'",
                    check.rule_type, check.field_path
                ),
                failure_details: check.failure_details.clone(),
                impact: impact_for(check.rule_type).to_string(),
            })
            .collect()
    }

    /// Builds the deduplicated union of recommendations for the rule types
    /// present among the issues. Output is sorted for determinism; order
    /// carries no meaning.
    pub fn build_recommendations(issues: &[QualityIssue]) -> Vec<String> {
        let mut recommendations: BTreeSet<&'static str> = BTreeSet::new();
        for issue in issues {
            recommendations.extend(recommendations_for(issue.rule_type));
        }
        recommendations.into_iter().map(String::from).collect()
    }
}

/// Heuristic impact statement per rule type.
fn impact_for(rule_type: RuleType) -> &'static str {
    match rule_type {
        RuleType::Completeness => {
            "Missing data can block downstream processing and skew aggregates"
        }
        RuleType::Accuracy => "Inaccurate values propagate incorrect results to consumers",
        RuleType::Consistency => "Inconsistent fields undermine cross-field integrity",
        RuleType::Validity => "Out-of-domain values can break type-sensitive consumers",
        RuleType::Uniqueness => "Duplicate values can double-count entities in reports",
        RuleType::Timeliness => "Stale data misrepresents the current state of the system",
        RuleType::ReferentialIntegrity => "Dangling references break joins and lookups",
        RuleType::BusinessRule => "Business rule violations indicate upstream process defects",
    }
}

/// Static remediation recommendations per rule type.
fn recommendations_for(rule_type: RuleType) -> &'static [&'static str] {
    match rule_type {
        RuleType::Completeness => &[
            "Enforce mandatory field validation at data entry",
            "Provide sensible defaults for optional fields",
        ],
        RuleType::Accuracy => &[
            "Validate values against reference data at the source",
            "Review format patterns with the data owners",
        ],
        RuleType::Consistency => &[
            "Derive dependent fields instead of entering them twice",
            "Add cross-field validation to the ingestion pipeline",
        ],
        RuleType::Validity => &[
            "Constrain value domains in the schema",
            "Reject out-of-range values before persistence",
        ],
        RuleType::Uniqueness => &[
            "Add unique constraints in the system of record",
            "Deduplicate incoming batches before ingestion",
        ],
        RuleType::Timeliness => &[
            "Tighten upstream delivery schedules",
            "Alert when feeds fall behind their freshness threshold",
        ],
        RuleType::ReferentialIntegrity => &[
            "Load reference data before dependent records",
            "Reconcile orphaned references with the owning system",
        ],
        RuleType::BusinessRule => &[
            "Review violated business rules with domain experts",
            "Add guard rails where the violating values originate",
        ],
    }
}

/// The complete outcome of evaluating one record against a rule set.
///
/// # Examples
///
/// ```rust
/// use vigil_engine::engine::RuleEngine;
/// use vigil_engine::record::DataRecord;
/// use vigil_engine::report::DataQualityReport;
/// use vigil_engine::rules::{QualityRule, RuleType};
///
/// # async fn example() {
/// let engine = RuleEngine::builder().build();
/// let rules = vec![
///     QualityRule::builder("r-1", "email present", RuleType::Completeness, "email")
///         .required(true)
///         .build(),
/// ];
/// let record = DataRecord::new();
///
/// let checks = engine.evaluate(&record, &rules).await;
/// let report = DataQualityReport::from_checks(checks);
/// assert_eq!(report.metrics.failed_checks, 1);
/// assert_eq!(report.issues.len(), 1);
/// # }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataQualityReport {
    /// All evaluated checks
    pub checks: Vec<DataQualityCheck>,
    /// Aggregate metrics over the checks
    pub metrics: QualityMetrics,
    /// The 0 to 100 quality score
    pub quality_score: f64,
    /// One issue per failed check
    pub issues: Vec<QualityIssue>,
    /// Deduplicated remediation recommendations
    pub recommendations: Vec<String>,
}

impl DataQualityReport {
    /// Assembles a report from evaluated checks.
    pub fn from_checks(checks: Vec<DataQualityCheck>) -> Self {
        let metrics = ScoreAggregator::compute_metrics(&checks);
        let quality_score = ScoreAggregator::compute_score(&metrics);
        let issues = IssueReporter::build_issues(&checks);
        let recommendations = IssueReporter::build_recommendations(&issues);
        Self {
            checks,
            metrics,
            quality_score,
            issues,
            recommendations,
        }
    }

    /// Renders a compact text summary suitable for logs.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "quality score {:.2} ({}/{} checks passed, pass rate {:.2}%)",
            self.quality_score,
            self.metrics.passed_checks,
            self.metrics.total_checks,
            self.metrics.pass_rate
        );

        let mut by_severity: BTreeMap<Severity, usize> = BTreeMap::new();
        for issue in &self.issues {
            *by_severity.entry(issue.severity).or_default() += 1;
        }
        for (severity, count) in by_severity.iter().rev() {
            let _ = writeln!(out, "  {severity}: {count} issue(s)");
        }
        for issue in &self.issues {
            let _ = writeln!(
                out,
                "  [{}] {} on '{}': {}",
                issue.severity,
                issue.rule_name,
                issue.field_path,
                issue.failure_details.as_deref().unwrap_or(&issue.description)
            );
        }
        out
    }
}
