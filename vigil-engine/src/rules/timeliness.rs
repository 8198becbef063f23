//! Timeliness rule evaluation.

use super::{vacuous_verdict, QualityRule, RuleEvaluator, RuleType, Verdict};
use crate::error::{Result, VigilError};
use crate::record::DataRecord;
use async_trait::async_trait;
use chrono::{Duration, Utc};

/// Checks that a timestamp value is fresh enough.
///
/// The rule passes iff `now - value <= timeliness_threshold`. Future
/// timestamps are fresh by that definition; plausibility of future dates
/// is the anomaly detector's concern, not this rule's.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimelinessEvaluator;

#[async_trait]
impl RuleEvaluator for TimelinessEvaluator {
    async fn evaluate(&self, rule: &QualityRule, record: &DataRecord) -> Result<Verdict> {
        let threshold = rule.timeliness_threshold.ok_or_else(|| {
            VigilError::invalid_config(format!(
                "timeliness rule '{}' has no threshold configured",
                rule.name
            ))
        })?;
        let threshold = Duration::from_std(threshold).map_err(|_| {
            VigilError::invalid_config(format!(
                "timeliness threshold of rule '{}' is out of range",
                rule.name
            ))
        })?;

        let value = match vacuous_verdict(rule, record) {
            Ok(value) => value,
            Err(verdict) => return Ok(verdict),
        };
        let timestamp = value.as_timestamp().ok_or_else(|| {
            VigilError::invalid_data(format!(
                "field '{}' is not a timestamp",
                rule.field_path
            ))
        })?;

        let age = Utc::now() - timestamp;
        if age <= threshold {
            Ok(Verdict::pass())
        } else {
            Ok(Verdict::fail(format!(
                "value is {} old, allowed at most {}",
                humanize(age),
                humanize(threshold)
            )))
        }
    }

    fn rule_type(&self) -> RuleType {
        RuleType::Timeliness
    }
}

/// Coarse rendering of a duration for failure details.
fn humanize(duration: Duration) -> String {
    if duration.num_days() > 0 {
        format!("{}d", duration.num_days())
    } else if duration.num_hours() > 0 {
        format!("{}h", duration.num_hours())
    } else if duration.num_minutes() > 0 {
        format!("{}m", duration.num_minutes())
    } else {
        format!("{}s", duration.num_seconds())
    }
}
