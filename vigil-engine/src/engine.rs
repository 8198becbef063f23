//! Rule engine orchestration.
//!
//! [`RuleEngine::evaluate`] runs every active rule against a record through
//! the per-type evaluator strategy table and returns one
//! [`DataQualityCheck`] per rule. Evaluation of a batch never aborts on a
//! single rule: evaluator errors are folded into the affected check and the
//! remaining rules still run.

use crate::record::DataRecord;
use crate::rules::{Collaborators, EvaluatorRegistry, QualityRule, RuleType, Verdict};
use crate::severity::Severity;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, error, instrument, warn};

/// The result of evaluating one rule against one record.
///
/// Exactly one of `passed = true` or a populated `failure_details` holds.
/// `error_message` is additionally populated when the evaluation itself
/// errored (malformed pattern, unreachable collaborator, type mismatch).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataQualityCheck {
    /// Identifier of the evaluated rule
    pub rule_id: String,
    /// Name of the evaluated rule
    pub rule_name: String,
    /// Type of the evaluated rule
    pub rule_type: RuleType,
    /// Severity copied from the rule
    pub severity: Severity,
    /// Field the rule was evaluated against
    pub field_path: String,
    /// Whether the rule passed
    pub passed: bool,
    /// Violation details, present iff the check failed
    pub failure_details: Option<String>,
    /// Error detail, present iff the evaluation itself errored
    pub error_message: Option<String>,
    /// Wall-clock time the evaluation took
    pub execution_time: Duration,
}

impl DataQualityCheck {
    fn from_verdict(rule: &QualityRule, verdict: Verdict, execution_time: Duration) -> Self {
        Self {
            rule_id: rule.id.clone(),
            rule_name: rule.name.clone(),
            rule_type: rule.rule_type,
            severity: rule.severity,
            field_path: rule.field_path.clone(),
            passed: verdict.passed,
            failure_details: verdict.details,
            error_message: None,
            execution_time,
        }
    }

    fn from_error(
        rule: &QualityRule,
        message: impl Into<String>,
        execution_time: Duration,
    ) -> Self {
        Self {
            rule_id: rule.id.clone(),
            rule_name: rule.name.clone(),
            rule_type: rule.rule_type,
            severity: rule.severity,
            field_path: rule.field_path.clone(),
            passed: false,
            failure_details: Some("rule evaluation did not complete".to_string()),
            error_message: Some(message.into()),
            execution_time,
        }
    }

    /// Returns true if the check failed because the evaluation errored.
    pub fn is_errored(&self) -> bool {
        self.error_message.is_some()
    }
}

/// Evaluates sets of quality rules against records.
///
/// The engine holds no state between calls apart from its evaluator table
/// and collaborator handles, so one instance can serve many records
/// concurrently.
///
/// # Examples
///
/// ```rust
/// use vigil_engine::engine::RuleEngine;
/// use vigil_engine::record::DataRecord;
/// use vigil_engine::rules::{QualityRule, RuleType};
///
/// # async fn example() {
/// let engine = RuleEngine::builder().build();
/// let rules = vec![
///     QualityRule::builder("r-1", "email present", RuleType::Completeness, "email")
///         .required(true)
///         .build(),
/// ];
/// let record = DataRecord::new().with_field("email", "user@example.com");
///
/// let checks = engine.evaluate(&record, &rules).await;
/// assert!(checks[0].passed);
/// # }
/// ```
#[derive(Debug)]
pub struct RuleEngine {
    registry: EvaluatorRegistry,
}

impl RuleEngine {
    /// Creates a builder for configuring collaborators.
    pub fn builder() -> RuleEngineBuilder {
        RuleEngineBuilder::default()
    }

    /// Creates an engine from a prebuilt evaluator registry.
    pub fn with_registry(registry: EvaluatorRegistry) -> Self {
        Self { registry }
    }

    /// Evaluates all active rules against a record.
    ///
    /// Returns one check per active rule, in rule order. Inactive rules
    /// are skipped entirely. This method never fails; per-rule errors are
    /// embedded in the corresponding check.
    #[instrument(skip(self, record, rules), fields(rules.total = rules.len()))]
    pub async fn evaluate(
        &self,
        record: &DataRecord,
        rules: &[QualityRule],
    ) -> Vec<DataQualityCheck> {
        let mut checks = Vec::with_capacity(rules.len());

        for rule in rules.iter().filter(|rule| rule.active) {
            let start = Instant::now();
            let check = match self.registry.get(rule.rule_type) {
                Some(evaluator) => match evaluator.evaluate(rule, record).await {
                    Ok(verdict) => {
                        let check =
                            DataQualityCheck::from_verdict(rule, verdict, start.elapsed());
                        if check.passed {
                            debug!(
                                rule.name = %rule.name,
                                rule.type = %rule.rule_type,
                                "Rule passed"
                            );
                        } else {
                            warn!(
                                rule.name = %rule.name,
                                rule.type = %rule.rule_type,
                                rule.severity = %rule.severity,
                                failure.details = %check.failure_details.as_deref().unwrap_or(""),
                                "Rule failed"
                            );
                        }
                        check
                    }
                    Err(e) => {
                        error!(
                            rule.name = %rule.name,
                            rule.type = %rule.rule_type,
                            error = %e,
                            "Error evaluating rule"
                        );
                        DataQualityCheck::from_error(rule, e.to_string(), start.elapsed())
                    }
                },
                None => DataQualityCheck::from_error(
                    rule,
                    format!("no evaluator registered for rule type {}", rule.rule_type),
                    start.elapsed(),
                ),
            };
            checks.push(check);
        }

        checks
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Builder wiring collaborators into a [`RuleEngine`].
///
/// Unset collaborators default to empty in-memory stores and an
/// always-true expression evaluator.
#[derive(Debug, Default)]
pub struct RuleEngineBuilder {
    collaborators: Collaborators,
}

impl RuleEngineBuilder {
    /// Sets the uniqueness history store.
    pub fn uniqueness_store(
        mut self,
        store: std::sync::Arc<dyn crate::collaborators::UniquenessStore>,
    ) -> Self {
        self.collaborators.uniqueness = store;
        self
    }

    /// Sets the reference data store.
    pub fn reference_store(
        mut self,
        store: std::sync::Arc<dyn crate::collaborators::ReferenceStore>,
    ) -> Self {
        self.collaborators.reference = store;
        self
    }

    /// Sets the expression evaluator.
    pub fn expression_evaluator(
        mut self,
        evaluator: std::sync::Arc<dyn crate::collaborators::ExpressionEvaluator>,
    ) -> Self {
        self.collaborators.expressions = evaluator;
        self
    }

    /// Builds the engine with the standard evaluator table.
    pub fn build(self) -> RuleEngine {
        RuleEngine {
            registry: EvaluatorRegistry::standard(self.collaborators),
        }
    }
}
