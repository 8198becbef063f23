//! String format, length, and pattern-consistency detection.

use super::{AnomalyType, DataAnomaly, DetectorConfig};
use crate::severity::Severity;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// Well-known format patterns, matched against field names by token.
///
/// A field whose lowercased name contains a token is expected to match the
/// associated pattern. The first matching token wins.
static FORMAT_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    vec![
        (
            "email",
            Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("email regex"),
        ),
        (
            "phone",
            Regex::new(r"^\+?[0-9][0-9 ().-]{5,18}[0-9]$").expect("phone regex"),
        ),
        (
            "url",
            Regex::new(r"^https?://[^\s/$.?#].[^\s]*$").expect("url regex"),
        ),
        (
            "ip",
            Regex::new(r"^(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)$")
                .expect("ip regex"),
        ),
    ]
});

/// Checks a scalar string for format violations and excessive length.
pub(super) fn check_scalar(field: &str, value: &str, config: &DetectorConfig) -> Vec<DataAnomaly> {
    let mut anomalies = Vec::new();
    let lowered = field.to_lowercase();

    if let Some((token, pattern)) = FORMAT_PATTERNS
        .iter()
        .find(|(token, _)| lowered.contains(token))
    {
        if !pattern.is_match(value) {
            anomalies.push(DataAnomaly::new(
                field,
                AnomalyType::Format,
                value.to_string(),
                1.0,
                Severity::Major,
                format!("value does not look like a well-formed {token}"),
                "format_check",
            ));
        }
    }

    let length = value.chars().count();
    if length > config.max_text_length {
        anomalies.push(DataAnomaly::new(
            field,
            AnomalyType::Length,
            truncate(value, config.truncate_display_length),
            length as f64,
            Severity::Major,
            format!(
                "value is {length} characters long, limit is {}",
                config.max_text_length
            ),
            "length_check",
        ));
    }

    anomalies
}

/// Flags strings whose shape signature is rare within the collection.
///
/// Each string maps to a signature (digits to `N`, lowercase to `a`,
/// uppercase to `A`, everything else to `X`). In a large enough collection
/// a signature seen fewer times than the frequency floor marks its values
/// as pattern outliers.
pub(super) fn detect_pattern_outliers(
    field: &str,
    values: &[String],
    config: &DetectorConfig,
) -> Vec<DataAnomaly> {
    if values.len() <= config.min_pattern_collection {
        return Vec::new();
    }

    let signatures: Vec<String> = values.iter().map(|s| signature(s)).collect();
    let mut frequency: HashMap<&str, usize> = HashMap::new();
    for sig in &signatures {
        *frequency.entry(sig.as_str()).or_default() += 1;
    }

    values
        .iter()
        .enumerate()
        .filter_map(|(index, value)| {
            let count = frequency[signatures[index].as_str()];
            if count < config.min_pattern_frequency {
                Some(
                    DataAnomaly::new(
                        field,
                        AnomalyType::Pattern,
                        value.clone(),
                        count as f64,
                        Severity::Minor,
                        format!(
                            "shape '{}' appears only {count} time(s) across {} values",
                            signatures[index],
                            values.len()
                        ),
                        "pattern_frequency",
                    )
                    .with_index(index),
                )
            } else {
                None
            }
        })
        .collect()
}

/// Maps a string to its shape signature.
fn signature(value: &str) -> String {
    value
        .chars()
        .map(|c| {
            if c.is_ascii_digit() {
                'N'
            } else if c.is_lowercase() {
                'a'
            } else if c.is_uppercase() {
                'A'
            } else {
                'X'
            }
        })
        .collect()
}

/// Truncates a value for display, appending an ellipsis when shortened.
fn truncate(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        value.to_string()
    } else {
        let shortened: String = value.chars().take(max_chars).collect();
        format!("{shortened}...")
    }
}
