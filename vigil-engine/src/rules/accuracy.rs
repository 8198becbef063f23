//! Accuracy rule evaluation.

use super::{vacuous_verdict, QualityRule, RuleEvaluator, RuleType, Verdict};
use crate::error::Result;
use crate::record::DataRecord;
use async_trait::async_trait;
use regex::Regex;

/// Checks a value against configured reference data or a format pattern.
///
/// Reference data takes precedence when both are configured. The pattern
/// must match the entire stringified value, not a substring. A rule with
/// neither configured passes trivially.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccuracyEvaluator;

#[async_trait]
impl RuleEvaluator for AccuracyEvaluator {
    async fn evaluate(&self, rule: &QualityRule, record: &DataRecord) -> Result<Verdict> {
        let value = match vacuous_verdict(rule, record) {
            Ok(value) => value,
            Err(verdict) => return Ok(verdict),
        };
        let rendered = value.to_string_pretty();

        if let Some(reference) = &rule.reference_data {
            if reference.contains(&rendered) {
                return Ok(Verdict::pass());
            }
            return Ok(Verdict::fail(format!(
                "value '{rendered}' is not in the reference data for '{}'",
                rule.field_path
            )));
        }

        if let Some(pattern) = &rule.format_pattern {
            // Anchor so the pattern must cover the whole value.
            let regex = Regex::new(&format!(r"\A(?:{pattern})\z"))?;
            if regex.is_match(&rendered) {
                return Ok(Verdict::pass());
            }
            return Ok(Verdict::fail(format!(
                "value '{rendered}' does not match pattern '{pattern}'"
            )));
        }

        Ok(Verdict::pass())
    }

    fn rule_type(&self) -> RuleType {
        RuleType::Accuracy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VigilError;

    #[tokio::test]
    async fn test_reference_data_membership() {
        let rule = QualityRule::builder("r-a", "country code", RuleType::Accuracy, "country")
            .reference_data(["DE", "FR", "IT"])
            .build();

        let record = DataRecord::new().with_field("country", "DE");
        assert!(AccuracyEvaluator
            .evaluate(&rule, &record)
            .await
            .unwrap()
            .passed);

        let record = DataRecord::new().with_field("country", "XX");
        let verdict = AccuracyEvaluator.evaluate(&rule, &record).await.unwrap();
        assert!(!verdict.passed);
        assert!(verdict.details.unwrap().contains("reference data"));
    }

    #[tokio::test]
    async fn test_pattern_must_cover_whole_value() {
        let rule = QualityRule::builder("r-a", "zip format", RuleType::Accuracy, "zip")
            .format_pattern(r"\d{5}")
            .build();

        let record = DataRecord::new().with_field("zip", "12345");
        assert!(AccuracyEvaluator
            .evaluate(&rule, &record)
            .await
            .unwrap()
            .passed);

        // A substring match is not enough.
        let record = DataRecord::new().with_field("zip", "12345-6789");
        assert!(!AccuracyEvaluator
            .evaluate(&rule, &record)
            .await
            .unwrap()
            .passed);
    }

    #[tokio::test]
    async fn test_numeric_values_are_stringified() {
        let rule = QualityRule::builder("r-a", "code set", RuleType::Accuracy, "code")
            .reference_data(["100", "200"])
            .build();

        let record = DataRecord::new().with_field("code", 200.0);
        assert!(AccuracyEvaluator
            .evaluate(&rule, &record)
            .await
            .unwrap()
            .passed);
    }

    #[tokio::test]
    async fn test_malformed_pattern_is_an_error() {
        let rule = QualityRule::builder("r-a", "broken", RuleType::Accuracy, "zip")
            .format_pattern("[unclosed")
            .build();

        let record = DataRecord::new().with_field("zip", "12345");
        let err = AccuracyEvaluator.evaluate(&rule, &record).await.unwrap_err();
        assert!(matches!(err, VigilError::Pattern(_)));
    }

    #[tokio::test]
    async fn test_unconfigured_rule_passes() {
        let rule = QualityRule::builder("r-a", "noop", RuleType::Accuracy, "zip").build();
        let record = DataRecord::new().with_field("zip", "anything");
        assert!(AccuracyEvaluator
            .evaluate(&rule, &record)
            .await
            .unwrap()
            .passed);
    }

    #[tokio::test]
    async fn test_missing_optional_field_passes_vacuously() {
        let rule = QualityRule::builder("r-a", "zip format", RuleType::Accuracy, "zip")
            .format_pattern(r"\d{5}")
            .build();
        let record = DataRecord::new();
        assert!(AccuracyEvaluator
            .evaluate(&rule, &record)
            .await
            .unwrap()
            .passed);
    }
}
