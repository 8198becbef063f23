//! Named business-field checks.
//!
//! A small battery of domain rules keyed off the field name: prices must
//! not be negative, percentages must stay within [0, 100]. Matching is a
//! case-insensitive substring test, consistent with the format checks.

use super::{AnomalyType, DataAnomaly};
use crate::severity::Severity;

/// Checks a scalar number against the named business-field rules.
pub(super) fn check_scalar(field: &str, value: f64) -> Vec<DataAnomaly> {
    let lowered = field.to_lowercase();
    let mut anomalies = Vec::new();

    if lowered.contains("price") && value < 0.0 {
        anomalies.push(DataAnomaly::new(
            field,
            AnomalyType::BusinessRule,
            format!("{value}"),
            value.abs(),
            Severity::Critical,
            format!("price field '{field}' is negative"),
            "business_rule",
        ));
    }

    if lowered.contains("percentage") && !(0.0..=100.0).contains(&value) {
        let distance = if value < 0.0 { -value } else { value - 100.0 };
        anomalies.push(DataAnomaly::new(
            field,
            AnomalyType::BusinessRule,
            format!("{value}"),
            distance,
            Severity::Major,
            format!("percentage field '{field}' is outside [0, 100]"),
            "business_rule",
        ));
    }

    anomalies
}
