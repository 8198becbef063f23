//! Uniqueness rule evaluation.

use super::{vacuous_verdict, QualityRule, RuleEvaluator, RuleType, Verdict};
use crate::collaborators::UniquenessStore;
use crate::error::Result;
use crate::record::DataRecord;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::instrument;

/// Checks that a value has not been observed before within the rule's scope.
///
/// History lives in the external [`UniquenessStore`]; the evaluator only
/// queries, it never records. A store failure surfaces as an evaluation
/// error, never as a pass.
#[derive(Debug)]
pub struct UniquenessEvaluator {
    store: Arc<dyn UniquenessStore>,
}

impl UniquenessEvaluator {
    /// Creates an evaluator querying `store`.
    pub fn new(store: Arc<dyn UniquenessStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RuleEvaluator for UniquenessEvaluator {
    #[instrument(skip(self, rule, record), fields(rule.name = %rule.name, rule.scope = %rule.scope))]
    async fn evaluate(&self, rule: &QualityRule, record: &DataRecord) -> Result<Verdict> {
        let value = match vacuous_verdict(rule, record) {
            Ok(value) => value,
            Err(verdict) => return Ok(verdict),
        };
        let rendered = value.to_string_pretty();

        if self
            .store
            .exists(&rendered, &rule.field_path, &rule.scope)
            .await?
        {
            return Ok(Verdict::fail(format!(
                "value '{rendered}' already exists for '{}' in scope '{}'",
                rule.field_path, rule.scope
            )));
        }
        Ok(Verdict::pass())
    }

    fn rule_type(&self) -> RuleType {
        RuleType::Uniqueness
    }
}
