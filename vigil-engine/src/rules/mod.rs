//! Quality rule definitions and the per-type evaluator strategy table.
//!
//! Each of the eight rule types has its own evaluator implementing the
//! [`RuleEvaluator`] trait, registered in an [`EvaluatorRegistry`]. Keeping
//! the evaluators separate keeps each rule type independently testable and
//! lets the compiler check that the closed set of types stays covered.
//!
//! ## Rule types
//!
//! | Type | Validates |
//! |------|-----------|
//! | `Completeness` | required fields are present and non-blank |
//! | `Accuracy` | values match reference data or a format pattern |
//! | `Consistency` | cross-field expressions hold, related fields agree |
//! | `Validity` | runtime type, numeric range, allowed-value membership |
//! | `Uniqueness` | values have not been observed before within a scope |
//! | `Timeliness` | timestamps are fresh enough |
//! | `ReferentialIntegrity` | values exist in external reference data |
//! | `BusinessRule` | a configured business expression holds |

mod accuracy;
mod business;
mod completeness;
mod consistency;
mod referential;
mod timeliness;
mod uniqueness;
mod validity;

pub use accuracy::AccuracyEvaluator;
pub use business::BusinessRuleEvaluator;
pub use completeness::CompletenessEvaluator;
pub use consistency::ConsistencyEvaluator;
pub use referential::ReferentialIntegrityEvaluator;
pub use timeliness::TimelinessEvaluator;
pub use uniqueness::UniquenessEvaluator;
pub use validity::ValidityEvaluator;

use crate::collaborators::{ExpressionEvaluator, ReferenceStore, UniquenessStore};
use crate::error::Result;
use crate::record::{DataRecord, DataType, FieldValue};
use crate::severity::Severity;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

/// The closed set of quality rule types.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleType {
    /// Required fields are present and non-blank
    Completeness,
    /// Values match reference data or a format pattern
    Accuracy,
    /// Cross-field expressions hold
    Consistency,
    /// Runtime type, range, and allowed-value membership
    Validity,
    /// Values are unique within a scope
    Uniqueness,
    /// Timestamps are fresh enough
    Timeliness,
    /// Values exist in external reference data
    ReferentialIntegrity,
    /// A configured business expression holds
    BusinessRule,
}

impl RuleType {
    /// All rule types, in declaration order.
    pub const ALL: [RuleType; 8] = [
        RuleType::Completeness,
        RuleType::Accuracy,
        RuleType::Consistency,
        RuleType::Validity,
        RuleType::Uniqueness,
        RuleType::Timeliness,
        RuleType::ReferentialIntegrity,
        RuleType::BusinessRule,
    ];

    /// Returns the canonical snake_case name of the rule type.
    pub fn name(&self) -> &'static str {
        match self {
            RuleType::Completeness => "completeness",
            RuleType::Accuracy => "accuracy",
            RuleType::Consistency => "consistency",
            RuleType::Validity => "validity",
            RuleType::Uniqueness => "uniqueness",
            RuleType::Timeliness => "timeliness",
            RuleType::ReferentialIntegrity => "referential_integrity",
            RuleType::BusinessRule => "business_rule",
        }
    }
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A data-quality rule to evaluate against records.
///
/// Rules are immutable for the duration of an evaluation call. Only the
/// fields relevant to the rule's type are consulted by its evaluator; the
/// rest stay `None`.
///
/// # Examples
///
/// ```rust
/// use vigil_engine::rules::{QualityRule, RuleType};
/// use vigil_engine::severity::Severity;
///
/// let rule = QualityRule::builder("r-001", "email format", RuleType::Accuracy, "email")
///     .severity(Severity::Major)
///     .format_pattern(r"[^@\s]+@[^@\s]+\.[^@\s]+")
///     .build();
///
/// assert!(rule.active);
/// assert_eq!(rule.rule_type, RuleType::Accuracy);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityRule {
    /// Unique rule identifier
    pub id: String,
    /// Human-readable rule name
    pub name: String,
    /// The rule type, selecting the evaluator
    pub rule_type: RuleType,
    /// Severity copied onto every check this rule produces
    pub severity: Severity,
    /// The record field the rule validates
    pub field_path: String,
    /// Whether the field must carry a value
    pub required: bool,
    /// Regex the value must fully match (accuracy)
    pub format_pattern: Option<String>,
    /// Known-good values the field must be drawn from (accuracy)
    pub reference_data: Option<BTreeSet<String>>,
    /// Cross-field expression delegated to the expression evaluator (consistency)
    pub consistency_expression: Option<String>,
    /// Fields that must agree for the record to be consistent (consistency)
    pub related_fields: Vec<String>,
    /// Expected runtime type of the value (validity)
    pub expected_data_type: Option<DataType>,
    /// Inclusive lower bound for numeric values (validity)
    pub min_value: Option<f64>,
    /// Inclusive upper bound for numeric values (validity)
    pub max_value: Option<f64>,
    /// Closed set of permitted values, stringified (validity)
    pub allowed_values: Option<BTreeSet<String>>,
    /// Maximum age of a timestamp value (timeliness)
    pub timeliness_threshold: Option<Duration>,
    /// Reference table to look the value up in (referential integrity)
    pub reference_table: Option<String>,
    /// Reference column to look the value up in (referential integrity)
    pub reference_column: Option<String>,
    /// Business expression delegated to the expression evaluator (business rule)
    pub business_rule_expression: Option<String>,
    /// Scope for uniqueness history, defaults to `"global"`
    pub scope: String,
    /// Inactive rules are skipped entirely
    pub active: bool,
}

impl QualityRule {
    /// Creates a builder for a rule of the given type on the given field.
    pub fn builder(
        id: impl Into<String>,
        name: impl Into<String>,
        rule_type: RuleType,
        field_path: impl Into<String>,
    ) -> QualityRuleBuilder {
        QualityRuleBuilder::new(id, name, rule_type, field_path)
    }
}

/// Builder for [`QualityRule`] instances.
#[derive(Debug, Clone)]
pub struct QualityRuleBuilder {
    rule: QualityRule,
}

impl QualityRuleBuilder {
    /// Creates a new builder. The rule starts active, not required, with
    /// [`Severity::Major`] and `"global"` scope.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        rule_type: RuleType,
        field_path: impl Into<String>,
    ) -> Self {
        Self {
            rule: QualityRule {
                id: id.into(),
                name: name.into(),
                rule_type,
                severity: Severity::Major,
                field_path: field_path.into(),
                required: false,
                format_pattern: None,
                reference_data: None,
                consistency_expression: None,
                related_fields: Vec::new(),
                expected_data_type: None,
                min_value: None,
                max_value: None,
                allowed_values: None,
                timeliness_threshold: None,
                reference_table: None,
                reference_column: None,
                business_rule_expression: None,
                scope: "global".to_string(),
                active: true,
            },
        }
    }

    /// Sets the severity copied onto checks produced by this rule.
    pub fn severity(mut self, severity: Severity) -> Self {
        self.rule.severity = severity;
        self
    }

    /// Marks the field as required.
    pub fn required(mut self, required: bool) -> Self {
        self.rule.required = required;
        self
    }

    /// Sets the regex the value must fully match.
    pub fn format_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.rule.format_pattern = Some(pattern.into());
        self
    }

    /// Sets the reference data set the value must be drawn from.
    pub fn reference_data<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rule.reference_data = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the consistency expression.
    pub fn consistency_expression(mut self, expression: impl Into<String>) -> Self {
        self.rule.consistency_expression = Some(expression.into());
        self
    }

    /// Sets the related fields that must agree.
    pub fn related_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rule.related_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the expected runtime data type.
    pub fn expected_data_type(mut self, data_type: DataType) -> Self {
        self.rule.expected_data_type = Some(data_type);
        self
    }

    /// Sets the inclusive numeric lower bound.
    pub fn min_value(mut self, min: f64) -> Self {
        self.rule.min_value = Some(min);
        self
    }

    /// Sets the inclusive numeric upper bound.
    pub fn max_value(mut self, max: f64) -> Self {
        self.rule.max_value = Some(max);
        self
    }

    /// Sets the closed set of permitted values.
    pub fn allowed_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rule.allowed_values = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the maximum age a timestamp may have.
    pub fn timeliness_threshold(mut self, threshold: Duration) -> Self {
        self.rule.timeliness_threshold = Some(threshold);
        self
    }

    /// Sets the reference table and column for lookups.
    pub fn reference(mut self, table: impl Into<String>, column: impl Into<String>) -> Self {
        self.rule.reference_table = Some(table.into());
        self.rule.reference_column = Some(column.into());
        self
    }

    /// Sets the business rule expression.
    pub fn business_rule_expression(mut self, expression: impl Into<String>) -> Self {
        self.rule.business_rule_expression = Some(expression.into());
        self
    }

    /// Sets the uniqueness scope.
    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.rule.scope = scope.into();
        self
    }

    /// Activates or deactivates the rule.
    pub fn active(mut self, active: bool) -> Self {
        self.rule.active = active;
        self
    }

    /// Builds the rule.
    pub fn build(self) -> QualityRule {
        self.rule
    }
}

/// The outcome of evaluating one rule against one record.
///
/// A failed verdict always carries details describing the violation.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    /// Whether the rule passed
    pub passed: bool,
    /// Violation details, present iff the rule failed
    pub details: Option<String>,
}

impl Verdict {
    /// Creates a passing verdict.
    pub fn pass() -> Self {
        Self {
            passed: true,
            details: None,
        }
    }

    /// Creates a failing verdict with violation details.
    pub fn fail(details: impl Into<String>) -> Self {
        Self {
            passed: false,
            details: Some(details.into()),
        }
    }
}

/// A strategy that evaluates one rule type against a record.
///
/// Implementations must be stateless and reusable across evaluations.
/// Returning an error marks the check as errored; the engine continues
/// with the remaining rules.
#[async_trait]
pub trait RuleEvaluator: Debug + Send + Sync {
    /// Evaluates `rule` against `record`.
    async fn evaluate(&self, rule: &QualityRule, record: &DataRecord) -> Result<Verdict>;

    /// The rule type this evaluator handles.
    fn rule_type(&self) -> RuleType;
}

/// Shared vacuity handling: a rule on an absent or null field passes
/// vacuously unless the rule marks the field as required.
///
/// Returns the value when the evaluator should proceed with it, or the
/// already-decided verdict when the field's absence settles the rule.
pub(crate) fn vacuous_verdict<'a>(
    rule: &QualityRule,
    record: &'a DataRecord,
) -> std::result::Result<&'a FieldValue, Verdict> {
    match record.get(&rule.field_path) {
        Some(value) if !value.is_null() => Ok(value),
        _ if rule.required => Err(Verdict::fail(format!(
            "required field '{}' has no value",
            rule.field_path
        ))),
        _ => Err(Verdict::pass()),
    }
}

/// The strategy table mapping each rule type to its evaluator.
///
/// # Examples
///
/// ```rust
/// use vigil_engine::rules::{EvaluatorRegistry, RuleType};
///
/// let registry = EvaluatorRegistry::standard(Default::default());
/// assert!(registry.get(RuleType::Completeness).is_some());
/// ```
#[derive(Debug)]
pub struct EvaluatorRegistry {
    evaluators: HashMap<RuleType, Box<dyn RuleEvaluator>>,
}

/// Collaborators shared by the evaluators that need external lookups.
#[derive(Debug, Clone)]
pub struct Collaborators {
    /// Uniqueness history lookups
    pub uniqueness: Arc<dyn UniquenessStore>,
    /// Reference data lookups
    pub reference: Arc<dyn ReferenceStore>,
    /// Consistency and business expression evaluation
    pub expressions: Arc<dyn ExpressionEvaluator>,
}

impl Default for Collaborators {
    /// Empty in-memory stores and an always-true expression evaluator.
    fn default() -> Self {
        Self {
            uniqueness: Arc::new(crate::collaborators::InMemoryUniquenessStore::new()),
            reference: Arc::new(crate::collaborators::InMemoryReferenceStore::new()),
            expressions: Arc::new(crate::collaborators::StaticExpressionEvaluator::always(true)),
        }
    }
}

impl EvaluatorRegistry {
    /// Builds the standard registry covering all eight rule types.
    pub fn standard(collaborators: Collaborators) -> Self {
        let mut evaluators: HashMap<RuleType, Box<dyn RuleEvaluator>> = HashMap::new();
        let table: [Box<dyn RuleEvaluator>; 8] = [
            Box::new(CompletenessEvaluator),
            Box::new(AccuracyEvaluator),
            Box::new(ConsistencyEvaluator::new(Arc::clone(
                &collaborators.expressions,
            ))),
            Box::new(ValidityEvaluator),
            Box::new(UniquenessEvaluator::new(Arc::clone(
                &collaborators.uniqueness,
            ))),
            Box::new(TimelinessEvaluator),
            Box::new(ReferentialIntegrityEvaluator::new(Arc::clone(
                &collaborators.reference,
            ))),
            Box::new(BusinessRuleEvaluator::new(Arc::clone(
                &collaborators.expressions,
            ))),
        ];
        for evaluator in table {
            evaluators.insert(evaluator.rule_type(), evaluator);
        }
        Self { evaluators }
    }

    /// Looks up the evaluator for a rule type.
    pub fn get(&self, rule_type: RuleType) -> Option<&dyn RuleEvaluator> {
        self.evaluators.get(&rule_type).map(|b| b.as_ref())
    }

    /// Replaces the evaluator for one rule type.
    pub fn register(&mut self, evaluator: Box<dyn RuleEvaluator>) {
        self.evaluators.insert(evaluator.rule_type(), evaluator);
    }
}
