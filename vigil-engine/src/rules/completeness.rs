//! Completeness rule evaluation.

use super::{QualityRule, RuleEvaluator, RuleType, Verdict};
use crate::error::Result;
use crate::record::DataRecord;
use async_trait::async_trait;
use tracing::debug;

/// Checks that a field carries a value.
///
/// A non-required rule passes regardless of presence; a required rule fails
/// when the field is absent, null, an empty collection, or a string that is
/// empty after trimming.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompletenessEvaluator;

#[async_trait]
impl RuleEvaluator for CompletenessEvaluator {
    async fn evaluate(&self, rule: &QualityRule, record: &DataRecord) -> Result<Verdict> {
        if !rule.required {
            return Ok(Verdict::pass());
        }

        match record.get(&rule.field_path) {
            Some(value) if !value.is_blank() => Ok(Verdict::pass()),
            Some(value) => {
                debug!(
                    rule.name = %rule.name,
                    field.name = %rule.field_path,
                    "Required field is blank"
                );
                Ok(Verdict::fail(format!(
                    "required field '{}' is blank (got {})",
                    rule.field_path,
                    value.to_string_pretty()
                )))
            }
            None => Ok(Verdict::fail(format!(
                "required field '{}' is missing",
                rule.field_path
            ))),
        }
    }

    fn rule_type(&self) -> RuleType {
        RuleType::Completeness
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FieldValue;

    fn rule(required: bool) -> QualityRule {
        QualityRule::builder("r-c", "name present", RuleType::Completeness, "name")
            .required(required)
            .build()
    }

    #[tokio::test]
    async fn test_required_field_present_passes() {
        let record = DataRecord::new().with_field("name", "ada");
        let verdict = CompletenessEvaluator
            .evaluate(&rule(true), &record)
            .await
            .unwrap();
        assert!(verdict.passed);
    }

    #[tokio::test]
    async fn test_required_field_missing_fails() {
        let record = DataRecord::new();
        let verdict = CompletenessEvaluator
            .evaluate(&rule(true), &record)
            .await
            .unwrap();
        assert!(!verdict.passed);
        assert!(verdict.details.unwrap().contains("missing"));
    }

    #[tokio::test]
    async fn test_required_blank_string_fails() {
        let record = DataRecord::new().with_field("name", "   ");
        let verdict = CompletenessEvaluator
            .evaluate(&rule(true), &record)
            .await
            .unwrap();
        assert!(!verdict.passed);
        assert!(verdict.details.unwrap().contains("blank"));
    }

    #[tokio::test]
    async fn test_required_empty_collection_fails() {
        let record = DataRecord::new().with_field("name", FieldValue::Texts(vec![]));
        let verdict = CompletenessEvaluator
            .evaluate(&rule(true), &record)
            .await
            .unwrap();
        assert!(!verdict.passed);
    }

    #[tokio::test]
    async fn test_optional_field_missing_passes() {
        let record = DataRecord::new();
        let verdict = CompletenessEvaluator
            .evaluate(&rule(false), &record)
            .await
            .unwrap();
        assert!(verdict.passed);
    }
}
