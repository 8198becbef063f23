//! Statistical and structural anomaly detection.
//!
//! The detector scans a record field by field and dispatches on the shape
//! of each value:
//!
//! - numeric collections run three independent outlier methods (Z-score,
//!   IQR fences, isolation score), each with its own threshold and score
//!   scale
//! - scalar numbers are checked for non-finite values and named
//!   business-field rules
//! - scalar strings are checked against well-known format patterns and a
//!   length limit
//! - string collections are checked for shape-signature consistency
//! - scalar timestamps are checked for plausibility, timestamp
//!   collections for large gaps
//!
//! Every detector is a pure function of its inputs; the detector holds no
//! state across calls and one instance can serve concurrent evaluations.
//! Scores are method-specific and not comparable across detection methods;
//! severity is the comparable dimension.
//!
//! ## Example
//!
//! ```rust
//! use vigil_engine::anomaly::AnomalyDetector;
//! use vigil_engine::record::DataRecord;
//!
//! let detector = AnomalyDetector::default();
//! let record = DataRecord::new()
//!     .with_field("price", -10.0)
//!     .with_field("amounts", vec![1.0, 2.0, 3.0, 4.0, 5.0, 100.0]);
//!
//! let anomalies = detector.detect(&record);
//! assert!(!anomalies.is_empty());
//! // Most severe findings come first.
//! assert!(anomalies.windows(2).all(|w| w[0].severity >= w[1].severity));
//! ```

mod business;
mod numeric;
mod temporal;
mod text;

use crate::record::{DataRecord, FieldValue};
use crate::severity::{Severity, SeverityClassifier};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, instrument};

/// The kinds of anomalies the detector reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnomalyType {
    /// Statistical outlier in a numeric collection (Z-score or IQR)
    Outlier,
    /// Value isolated from its neighbors (isolation score)
    Isolation,
    /// String value violating a well-known format
    Format,
    /// String value exceeding the length limit
    Length,
    /// String value with a rare shape signature
    Pattern,
    /// Timestamp outside the plausible range
    Temporal,
    /// Large gap between consecutive timestamps
    TemporalGap,
    /// Non-finite numeric value
    InvalidValue,
    /// Violation of a named business-field rule
    BusinessRule,
}

impl fmt::Display for AnomalyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AnomalyType::Outlier => "outlier",
            AnomalyType::Isolation => "isolation",
            AnomalyType::Format => "format",
            AnomalyType::Length => "length",
            AnomalyType::Pattern => "pattern",
            AnomalyType::Temporal => "temporal",
            AnomalyType::TemporalGap => "temporal_gap",
            AnomalyType::InvalidValue => "invalid_value",
            AnomalyType::BusinessRule => "business_rule",
        };
        write!(f, "{name}")
    }
}

/// A single detected anomaly.
///
/// `score` is specific to the detection method that produced the anomaly
/// and must not be compared across methods; use `severity` for ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataAnomaly {
    /// The field the anomaly was found in
    pub field_name: String,
    /// The kind of anomaly
    pub anomaly_type: AnomalyType,
    /// The offending value, possibly truncated for display
    pub value: String,
    /// Method-specific anomaly score
    pub score: f64,
    /// Classified severity
    pub severity: Severity,
    /// Human-readable description
    pub description: String,
    /// Name of the detection method that fired
    pub detection_method: String,
    /// When the anomaly was detected
    pub detection_time: DateTime<Utc>,
    /// Index into the source collection, when applicable
    pub index: Option<usize>,
}

impl DataAnomaly {
    /// Creates a new anomaly stamped with the current time.
    pub fn new(
        field_name: impl Into<String>,
        anomaly_type: AnomalyType,
        value: impl Into<String>,
        score: f64,
        severity: Severity,
        description: impl Into<String>,
        detection_method: impl Into<String>,
    ) -> Self {
        Self {
            field_name: field_name.into(),
            anomaly_type,
            value: value.into(),
            score,
            severity,
            description: description.into(),
            detection_method: detection_method.into(),
            detection_time: Utc::now(),
            index: None,
        }
    }

    /// Attaches the index of the offending value in its source collection.
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }
}

/// Thresholds and limits for the anomaly detectors.
///
/// Every cutoff the detectors use lives here so tests can pin them and
/// operators can tune them without touching detector code. The defaults
/// reproduce the standard configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Absolute Z-score above which a value is an outlier
    pub z_score_threshold: f64,
    /// Fence multiplier for the interquartile range
    pub iqr_multiplier: f64,
    /// Isolation score above which a value is isolated
    pub isolation_threshold: f64,
    /// Neighbor radius as a fraction of the value range
    pub neighbor_radius_fraction: f64,
    /// Factor applied to isolation scores before severity classification
    pub isolation_severity_scale: f64,
    /// Minimum collection size for Z-score detection
    pub min_z_score_samples: usize,
    /// Minimum collection size for IQR detection
    pub min_iqr_samples: usize,
    /// Minimum collection size for isolation detection
    pub min_isolation_samples: usize,
    /// Collection size above which pattern consistency is checked
    pub min_pattern_collection: usize,
    /// Signature frequency below which a value is a pattern outlier
    pub min_pattern_frequency: usize,
    /// String length above which a value is flagged
    pub max_text_length: usize,
    /// Display truncation for overlong values
    pub truncate_display_length: usize,
    /// Days into the future a timestamp may plausibly lie
    pub max_future_days: i64,
    /// Years into the past a timestamp may plausibly lie
    pub max_age_years: i64,
    /// Largest tolerated gap between consecutive timestamps, in days
    pub max_gap_days: i64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            z_score_threshold: 3.0,
            iqr_multiplier: 1.5,
            isolation_threshold: 0.6,
            neighbor_radius_fraction: 0.1,
            isolation_severity_scale: 5.0,
            min_z_score_samples: 3,
            min_iqr_samples: 4,
            min_isolation_samples: 10,
            min_pattern_collection: 20,
            min_pattern_frequency: 5,
            max_text_length: 1000,
            truncate_display_length: 50,
            max_future_days: 1,
            max_age_years: 100,
            max_gap_days: 365,
        }
    }
}

/// Scans records for statistical, format, temporal, and business-rule
/// anomalies.
///
/// `detect` never fails; malformed values surface as anomalies, not
/// errors. The output is sorted by severity, most severe first, with ties
/// keeping detection order (fields in name order, detectors in dispatch
/// order, values in collection order).
#[derive(Debug, Clone, Default)]
pub struct AnomalyDetector {
    config: DetectorConfig,
    classifier: SeverityClassifier,
}

impl AnomalyDetector {
    /// Creates a detector with custom thresholds.
    pub fn new(config: DetectorConfig) -> Self {
        Self {
            config,
            classifier: SeverityClassifier::default(),
        }
    }

    /// Replaces the severity classifier.
    pub fn with_classifier(mut self, classifier: SeverityClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Returns the detector configuration.
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Detects anomalies across all fields of a record.
    #[instrument(skip(self, record), fields(record.fields = record.len()))]
    pub fn detect(&self, record: &DataRecord) -> Vec<DataAnomaly> {
        let mut anomalies = Vec::new();

        for (field, value) in record.iter() {
            let mut found = match value {
                FieldValue::Numbers(values) => {
                    numeric::detect_in_collection(field, values, &self.config, &self.classifier)
                }
                FieldValue::Number(scalar) => {
                    let mut found = numeric::check_scalar(field, *scalar);
                    found.extend(business::check_scalar(field, *scalar));
                    found
                }
                FieldValue::Text(text) => text::check_scalar(field, text, &self.config),
                FieldValue::Texts(values) => {
                    text::detect_pattern_outliers(field, values, &self.config)
                }
                FieldValue::Timestamp(ts) => temporal::check_scalar(field, *ts, &self.config),
                FieldValue::Timestamps(values) => {
                    temporal::detect_gaps(field, values, &self.config)
                }
                FieldValue::Boolean(_) | FieldValue::Null => Vec::new(),
            };
            if !found.is_empty() {
                debug!(
                    field.name = %field,
                    anomalies.count = found.len(),
                    "Field produced anomalies"
                );
            }
            anomalies.append(&mut found);
        }

        // Stable sort keeps detection order within a severity level.
        anomalies.sort_by(|a, b| b.severity.cmp(&a.severity));
        anomalies
    }
}
