//! Validity rule evaluation.

use super::{vacuous_verdict, QualityRule, RuleEvaluator, RuleType, Verdict};
use crate::error::{Result, VigilError};
use crate::record::DataRecord;
use async_trait::async_trait;

/// Checks runtime type, numeric range, and allowed-value membership.
///
/// All configured conditions must hold. A configured range on a
/// non-numeric value is a type-cast failure and surfaces as an evaluation
/// error on the check rather than a plain fail.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidityEvaluator;

#[async_trait]
impl RuleEvaluator for ValidityEvaluator {
    async fn evaluate(&self, rule: &QualityRule, record: &DataRecord) -> Result<Verdict> {
        let value = match vacuous_verdict(rule, record) {
            Ok(value) => value,
            Err(verdict) => return Ok(verdict),
        };

        if let (Some(min), Some(max)) = (rule.min_value, rule.max_value) {
            if min > max {
                return Err(VigilError::invalid_config(format!(
                    "rule '{}' has an impossible range [{min}, {max}]",
                    rule.name
                )));
            }
        }

        if let Some(expected) = rule.expected_data_type {
            match value.data_type() {
                Some(actual) if actual == expected => {}
                actual => {
                    let actual = actual
                        .map(|t| t.to_string())
                        .unwrap_or_else(|| "null".to_string());
                    return Ok(Verdict::fail(format!(
                        "field '{}' has type {actual}, expected {expected}",
                        rule.field_path
                    )));
                }
            }
        }

        if rule.min_value.is_some() || rule.max_value.is_some() {
            let number = value.as_number().ok_or_else(|| {
                VigilError::invalid_data(format!(
                    "field '{}' is not numeric but rule '{}' configures a range",
                    rule.field_path, rule.name
                ))
            })?;
            if let Some(min) = rule.min_value {
                if number < min {
                    return Ok(Verdict::fail(format!(
                        "value {number} is below the minimum {min}"
                    )));
                }
            }
            if let Some(max) = rule.max_value {
                if number > max {
                    return Ok(Verdict::fail(format!(
                        "value {number} is above the maximum {max}"
                    )));
                }
            }
        }

        if let Some(allowed) = &rule.allowed_values {
            let rendered = value.to_string_pretty();
            if !allowed.contains(&rendered) {
                return Ok(Verdict::fail(format!(
                    "value '{rendered}' is not among the allowed values"
                )));
            }
        }

        Ok(Verdict::pass())
    }

    fn rule_type(&self) -> RuleType {
        RuleType::Validity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::DataType;

    #[tokio::test]
    async fn test_type_match() {
        let rule = QualityRule::builder("r-v", "age is numeric", RuleType::Validity, "age")
            .expected_data_type(DataType::Number)
            .build();

        let record = DataRecord::new().with_field("age", 30.0);
        assert!(ValidityEvaluator
            .evaluate(&rule, &record)
            .await
            .unwrap()
            .passed);

        let record = DataRecord::new().with_field("age", "thirty");
        let verdict = ValidityEvaluator.evaluate(&rule, &record).await.unwrap();
        assert!(!verdict.passed);
        assert!(verdict.details.unwrap().contains("expected number"));
    }

    #[tokio::test]
    async fn test_range_bounds_are_inclusive() {
        let rule = QualityRule::builder("r-v", "age range", RuleType::Validity, "age")
            .min_value(0.0)
            .max_value(120.0)
            .build();

        for age in [0.0, 120.0, 57.0] {
            let record = DataRecord::new().with_field("age", age);
            assert!(
                ValidityEvaluator
                    .evaluate(&rule, &record)
                    .await
                    .unwrap()
                    .passed,
                "age {age} should pass"
            );
        }

        let record = DataRecord::new().with_field("age", 121.0);
        assert!(!ValidityEvaluator
            .evaluate(&rule, &record)
            .await
            .unwrap()
            .passed);

        let record = DataRecord::new().with_field("age", -1.0);
        assert!(!ValidityEvaluator
            .evaluate(&rule, &record)
            .await
            .unwrap()
            .passed);
    }

    #[tokio::test]
    async fn test_allowed_values() {
        let rule = QualityRule::builder("r-v", "status domain", RuleType::Validity, "status")
            .allowed_values(["open", "closed", "pending"])
            .build();

        let record = DataRecord::new().with_field("status", "open");
        assert!(ValidityEvaluator
            .evaluate(&rule, &record)
            .await
            .unwrap()
            .passed);

        let record = DataRecord::new().with_field("status", "archived");
        assert!(!ValidityEvaluator
            .evaluate(&rule, &record)
            .await
            .unwrap()
            .passed);
    }

    #[tokio::test]
    async fn test_impossible_range_is_a_configuration_error() {
        let rule = QualityRule::builder("r-v", "bad range", RuleType::Validity, "age")
            .min_value(10.0)
            .max_value(1.0)
            .build();

        let record = DataRecord::new().with_field("age", 5.0);
        let err = ValidityEvaluator.evaluate(&rule, &record).await.unwrap_err();
        assert!(matches!(err, VigilError::InvalidConfiguration(_)));
    }

    #[tokio::test]
    async fn test_range_on_non_numeric_value_is_an_error() {
        let rule = QualityRule::builder("r-v", "range", RuleType::Validity, "age")
            .min_value(0.0)
            .build();

        let record = DataRecord::new().with_field("age", "old");
        let err = ValidityEvaluator.evaluate(&rule, &record).await.unwrap_err();
        assert!(matches!(err, VigilError::InvalidData(_)));
    }
}
