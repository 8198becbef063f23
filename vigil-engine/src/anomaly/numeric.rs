//! Numeric outlier detection.
//!
//! Three independent methods run over the same collection, each with its
//! own minimum sample size, threshold, and score scale: Z-score, IQR
//! fences, and a neighbor-count isolation heuristic. Scores are not
//! comparable across methods.

use super::{AnomalyType, DataAnomaly, DetectorConfig};
use crate::severity::{Severity, SeverityClassifier};
use tracing::debug;

/// Runs all applicable outlier detectors over a numeric collection.
pub(super) fn detect_in_collection(
    field: &str,
    values: &[f64],
    config: &DetectorConfig,
    classifier: &SeverityClassifier,
) -> Vec<DataAnomaly> {
    let mut anomalies = z_score(field, values, config, classifier);
    anomalies.extend(iqr(field, values, config, classifier));
    anomalies.extend(isolation(field, values, config, classifier));
    anomalies
}

/// Flags values whose absolute Z-score exceeds the configured threshold.
///
/// Uses the population standard deviation. A collection with zero or
/// non-finite spread is skipped entirely.
fn z_score(
    field: &str,
    values: &[f64],
    config: &DetectorConfig,
    classifier: &SeverityClassifier,
) -> Vec<DataAnomaly> {
    let n = values.len();
    if n < config.min_z_score_samples {
        return Vec::new();
    }

    let mean = values.iter().sum::<f64>() / n as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64;
    let std_dev = variance.sqrt();
    if !std_dev.is_finite() || std_dev == 0.0 {
        debug!(field.name = %field, "Skipping z-score, no usable spread");
        return Vec::new();
    }

    values
        .iter()
        .enumerate()
        .filter_map(|(index, &value)| {
            let z = ((value - mean) / std_dev).abs();
            if z > config.z_score_threshold {
                Some(
                    DataAnomaly::new(
                        field,
                        AnomalyType::Outlier,
                        format!("{value}"),
                        z,
                        classifier.classify(z),
                        format!(
                            "value {value} deviates {z:.2} standard deviations from mean {mean:.2}"
                        ),
                        "z_score",
                    )
                    .with_index(index),
                )
            } else {
                None
            }
        })
        .collect()
}

/// Flags values outside the IQR fences `[q1 - k*iqr, q3 + k*iqr]`.
///
/// Quartiles use plain integer indexing into the sorted collection
/// (`sorted[n/4]`, `sorted[3n/4]`), a deliberately simple approximation
/// that downstream consumers rely on; do not replace it with interpolated
/// quartiles. The score is the distance beyond the violated fence in IQR
/// units.
fn iqr(
    field: &str,
    values: &[f64],
    config: &DetectorConfig,
    classifier: &SeverityClassifier,
) -> Vec<DataAnomaly> {
    let n = values.len();
    if n < config.min_iqr_samples {
        return Vec::new();
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let q1 = sorted[n / 4];
    let q3 = sorted[3 * n / 4];
    let iqr = q3 - q1;
    if !iqr.is_finite() || iqr == 0.0 {
        debug!(field.name = %field, "Skipping IQR, zero interquartile range");
        return Vec::new();
    }

    let lower = q1 - config.iqr_multiplier * iqr;
    let upper = q3 + config.iqr_multiplier * iqr;

    values
        .iter()
        .enumerate()
        .filter_map(|(index, &value)| {
            let distance = if value < lower {
                (lower - value) / iqr
            } else if value > upper {
                (value - upper) / iqr
            } else {
                return None;
            };
            Some(
                DataAnomaly::new(
                    field,
                    AnomalyType::Outlier,
                    format!("{value}"),
                    distance,
                    classifier.classify(distance),
                    format!(
                        "value {value} lies outside the IQR fences [{lower:.2}, {upper:.2}]"
                    ),
                    "iqr",
                )
                .with_index(index),
            )
        })
        .collect()
}

/// Flags values with few neighbors within a fraction of the value range.
///
/// The isolation score for a value is `1 - neighbors/n`, where neighbors
/// counts all values (the value itself included) within
/// `neighbor_radius_fraction * range`. This is an O(n^2) neighbor-count
/// heuristic, not an isolation forest; callers with large collections
/// should cap or sample before detection.
fn isolation(
    field: &str,
    values: &[f64],
    config: &DetectorConfig,
    classifier: &SeverityClassifier,
) -> Vec<DataAnomaly> {
    let n = values.len();
    if n < config.min_isolation_samples {
        return Vec::new();
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    if !range.is_finite() || range == 0.0 {
        debug!(field.name = %field, "Skipping isolation score, zero range");
        return Vec::new();
    }

    let radius = config.neighbor_radius_fraction * range;
    values
        .iter()
        .enumerate()
        .filter_map(|(index, &value)| {
            let neighbors = values
                .iter()
                .filter(|other| (*other - value).abs() <= radius)
                .count();
            let score = 1.0 - neighbors as f64 / n as f64;
            if score > config.isolation_threshold {
                Some(
                    DataAnomaly::new(
                        field,
                        AnomalyType::Isolation,
                        format!("{value}"),
                        score,
                        classifier.classify(score * config.isolation_severity_scale),
                        format!(
                            "value {value} has only {neighbors} of {n} values within radius {radius:.2}"
                        ),
                        "isolation_score",
                    )
                    .with_index(index),
                )
            } else {
                None
            }
        })
        .collect()
}

/// Flags non-finite scalar values.
pub(super) fn check_scalar(field: &str, value: f64) -> Vec<DataAnomaly> {
    if value.is_finite() {
        return Vec::new();
    }
    let rendered = if value.is_nan() {
        "NaN".to_string()
    } else {
        format!("{value}")
    };
    vec![DataAnomaly::new(
        field,
        AnomalyType::InvalidValue,
        rendered,
        0.0,
        Severity::Critical,
        format!("field '{field}' holds a non-finite numeric value"),
        "scalar_check",
    )]
}
