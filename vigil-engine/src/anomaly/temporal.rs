//! Temporal plausibility and gap detection.

use super::{AnomalyType, DataAnomaly, DetectorConfig};
use crate::severity::Severity;
use chrono::{DateTime, Duration, Utc};

/// Flags timestamps that are implausibly far in the future or the past.
pub(super) fn check_scalar(
    field: &str,
    timestamp: DateTime<Utc>,
    config: &DetectorConfig,
) -> Vec<DataAnomaly> {
    let now = Utc::now();

    if timestamp > now + Duration::days(config.max_future_days) {
        let days_ahead = (timestamp - now).num_days();
        return vec![DataAnomaly::new(
            field,
            AnomalyType::Temporal,
            timestamp.to_rfc3339(),
            days_ahead as f64,
            Severity::Major,
            format!("timestamp lies {days_ahead} day(s) in the future"),
            "temporal_range",
        )];
    }

    let oldest = now - Duration::days(365 * config.max_age_years);
    if timestamp < oldest {
        let days_back = (now - timestamp).num_days();
        return vec![DataAnomaly::new(
            field,
            AnomalyType::Temporal,
            timestamp.to_rfc3339(),
            days_back as f64,
            Severity::Major,
            format!(
                "timestamp lies more than {} years in the past",
                config.max_age_years
            ),
            "temporal_range",
        )];
    }

    Vec::new()
}

/// Flags gaps larger than the configured limit between consecutive
/// timestamps.
///
/// The collection is scanned in ascending order; each offending gap is
/// reported at its later timestamp with the whole-day gap as value and
/// score. Indices refer to the original collection.
pub(super) fn detect_gaps(
    field: &str,
    timestamps: &[DateTime<Utc>],
    config: &DetectorConfig,
) -> Vec<DataAnomaly> {
    if timestamps.len() < 2 {
        return Vec::new();
    }

    let mut order: Vec<usize> = (0..timestamps.len()).collect();
    order.sort_by_key(|&i| timestamps[i]);

    order
        .windows(2)
        .filter_map(|pair| {
            let (earlier, later) = (timestamps[pair[0]], timestamps[pair[1]]);
            let gap_days = (later - earlier).num_days();
            if gap_days > config.max_gap_days {
                Some(
                    DataAnomaly::new(
                        field,
                        AnomalyType::TemporalGap,
                        gap_days.to_string(),
                        gap_days as f64,
                        Severity::Minor,
                        format!(
                            "gap of {gap_days} days before {}",
                            later.to_rfc3339()
                        ),
                        "temporal_gap",
                    )
                    .with_index(pair[1]),
                )
            } else {
                None
            }
        })
        .collect()
}
