//! Referential integrity rule evaluation.

use super::{vacuous_verdict, QualityRule, RuleEvaluator, RuleType, Verdict};
use crate::collaborators::ReferenceStore;
use crate::error::{Result, VigilError};
use crate::record::DataRecord;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::instrument;

/// Checks that a value exists in externally managed reference data.
///
/// The rule must name both a reference table and a column. Lookups go
/// through the [`ReferenceStore`] collaborator; a lookup failure surfaces
/// as an evaluation error, never as a pass.
#[derive(Debug)]
pub struct ReferentialIntegrityEvaluator {
    store: Arc<dyn ReferenceStore>,
}

impl ReferentialIntegrityEvaluator {
    /// Creates an evaluator querying `store`.
    pub fn new(store: Arc<dyn ReferenceStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RuleEvaluator for ReferentialIntegrityEvaluator {
    #[instrument(skip(self, rule, record), fields(rule.name = %rule.name))]
    async fn evaluate(&self, rule: &QualityRule, record: &DataRecord) -> Result<Verdict> {
        let (table, column) = match (&rule.reference_table, &rule.reference_column) {
            (Some(table), Some(column)) => (table, column),
            _ => {
                return Err(VigilError::invalid_config(format!(
                    "referential rule '{}' names no reference table/column",
                    rule.name
                )))
            }
        };

        let value = match vacuous_verdict(rule, record) {
            Ok(value) => value,
            Err(verdict) => return Ok(verdict),
        };
        let rendered = value.to_string_pretty();

        if self.store.exists(&rendered, table, column).await? {
            Ok(Verdict::pass())
        } else {
            Ok(Verdict::fail(format!(
                "value '{rendered}' does not exist in {table}.{column}"
            )))
        }
    }

    fn rule_type(&self) -> RuleType {
        RuleType::ReferentialIntegrity
    }
}
