//! Business rule evaluation.

use super::{QualityRule, RuleEvaluator, RuleType, Verdict};
use crate::collaborators::ExpressionEvaluator;
use crate::error::{Result, VigilError};
use crate::record::DataRecord;
use async_trait::async_trait;
use std::sync::Arc;

/// Evaluates a configured business expression against the full record.
///
/// Expression semantics belong to the external [`ExpressionEvaluator`];
/// this evaluator only forwards the expression and interprets the verdict.
#[derive(Debug)]
pub struct BusinessRuleEvaluator {
    expressions: Arc<dyn ExpressionEvaluator>,
}

impl BusinessRuleEvaluator {
    /// Creates an evaluator delegating to `expressions`.
    pub fn new(expressions: Arc<dyn ExpressionEvaluator>) -> Self {
        Self { expressions }
    }
}

#[async_trait]
impl RuleEvaluator for BusinessRuleEvaluator {
    async fn evaluate(&self, rule: &QualityRule, record: &DataRecord) -> Result<Verdict> {
        let expression = rule.business_rule_expression.as_deref().ok_or_else(|| {
            VigilError::invalid_config(format!(
                "business rule '{}' has no expression configured",
                rule.name
            ))
        })?;

        if self.expressions.evaluate(expression, record).await? {
            Ok(Verdict::pass())
        } else {
            Ok(Verdict::fail(format!(
                "business rule expression '{expression}' does not hold"
            )))
        }
    }

    fn rule_type(&self) -> RuleType {
        RuleType::BusinessRule
    }
}
