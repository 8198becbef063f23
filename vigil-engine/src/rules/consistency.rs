//! Consistency rule evaluation.

use super::{QualityRule, RuleEvaluator, RuleType, Verdict};
use crate::collaborators::ExpressionEvaluator;
use crate::error::Result;
use crate::record::DataRecord;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Checks cross-field consistency.
///
/// When the rule carries a consistency expression, the verdict is delegated
/// to the external expression evaluator with the full record as context.
/// Otherwise, when related fields are configured, each of them must carry a
/// non-null value; the rule-specific agreement predicate beyond presence is
/// the expression evaluator's concern and is not reimplemented here.
#[derive(Debug)]
pub struct ConsistencyEvaluator {
    expressions: Arc<dyn ExpressionEvaluator>,
}

impl ConsistencyEvaluator {
    /// Creates an evaluator delegating expressions to `expressions`.
    pub fn new(expressions: Arc<dyn ExpressionEvaluator>) -> Self {
        Self { expressions }
    }
}

#[async_trait]
impl RuleEvaluator for ConsistencyEvaluator {
    async fn evaluate(&self, rule: &QualityRule, record: &DataRecord) -> Result<Verdict> {
        if let Some(expression) = &rule.consistency_expression {
            debug!(
                rule.name = %rule.name,
                expression = %expression,
                "Delegating consistency expression"
            );
            if self.expressions.evaluate(expression, record).await? {
                return Ok(Verdict::pass());
            }
            return Ok(Verdict::fail(format!(
                "consistency expression '{expression}' does not hold"
            )));
        }

        if !rule.related_fields.is_empty() {
            let missing: Vec<&str> = rule
                .related_fields
                .iter()
                .map(String::as_str)
                .filter(|field| !record.has_value(field))
                .collect();
            if missing.is_empty() {
                return Ok(Verdict::pass());
            }
            return Ok(Verdict::fail(format!(
                "related fields have no value: {}",
                missing.join(", ")
            )));
        }

        Ok(Verdict::pass())
    }

    fn rule_type(&self) -> RuleType {
        RuleType::Consistency
    }
}
