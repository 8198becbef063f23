//! Severity classification for checks and anomalies.
//!
//! Severity drives two things: the ordering of reported anomalies and the
//! penalty weight a failed check contributes to the quality score. The
//! classifier maps a method-specific deviation score onto the four levels
//! using strictly-greater-than thresholds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a quality check failure or detected anomaly.
///
/// The ordering is total: `Critical > Major > Minor > Info`. Derived `Ord`
/// relies on the variant declaration order, so `Info` must stay first.
///
/// # Examples
///
/// ```rust
/// use vigil_engine::severity::Severity;
///
/// assert!(Severity::Critical > Severity::Major);
/// assert!(Severity::Minor > Severity::Info);
/// assert_eq!(Severity::Major.penalty_weight(), 5.0);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational finding, no score penalty
    Info,
    /// Minor deviation worth reviewing
    Minor,
    /// Major deviation requiring attention
    Major,
    /// Critical deviation that should block downstream use
    Critical,
}

impl Severity {
    /// Returns the penalty weight this severity contributes per failed check.
    pub fn penalty_weight(&self) -> f64 {
        match self {
            Severity::Critical => 10.0,
            Severity::Major => 5.0,
            Severity::Minor => 1.0,
            Severity::Info => 0.0,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Critical => "critical",
            Severity::Major => "major",
            Severity::Minor => "minor",
            Severity::Info => "info",
        };
        write!(f, "{name}")
    }
}

/// Score thresholds that separate the four severity levels.
///
/// Each boundary is exclusive: a score must be strictly greater than a
/// threshold to reach the corresponding level. The defaults reproduce the
/// standard classification (5.0 / 3.0 / 1.0) and every field can be tuned
/// independently for deterministic tests.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeverityThresholds {
    /// Scores above this value classify as [`Severity::Critical`]
    pub critical: f64,
    /// Scores above this value classify as [`Severity::Major`]
    pub major: f64,
    /// Scores above this value classify as [`Severity::Minor`]
    pub minor: f64,
}

impl SeverityThresholds {
    /// Default boundary between major and critical.
    pub const DEFAULT_CRITICAL: f64 = 5.0;
    /// Default boundary between minor and major.
    pub const DEFAULT_MAJOR: f64 = 3.0;
    /// Default boundary between info and minor.
    pub const DEFAULT_MINOR: f64 = 1.0;
}

impl Default for SeverityThresholds {
    fn default() -> Self {
        Self {
            critical: Self::DEFAULT_CRITICAL,
            major: Self::DEFAULT_MAJOR,
            minor: Self::DEFAULT_MINOR,
        }
    }
}

/// Maps numeric deviation scores to severity levels.
///
/// The classifier is a pure function of its thresholds and has no side
/// effects, so a single instance can be shared freely across concurrent
/// evaluations.
///
/// # Examples
///
/// ```rust
/// use vigil_engine::severity::{Severity, SeverityClassifier};
///
/// let classifier = SeverityClassifier::default();
/// assert_eq!(classifier.classify(6.0), Severity::Critical);
/// assert_eq!(classifier.classify(4.0), Severity::Major);
/// assert_eq!(classifier.classify(1.5), Severity::Minor);
/// assert_eq!(classifier.classify(0.5), Severity::Info);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SeverityClassifier {
    thresholds: SeverityThresholds,
}

impl SeverityClassifier {
    /// Creates a classifier with custom thresholds.
    pub fn new(thresholds: SeverityThresholds) -> Self {
        Self { thresholds }
    }

    /// Returns the thresholds this classifier uses.
    pub fn thresholds(&self) -> &SeverityThresholds {
        &self.thresholds
    }

    /// Classifies a deviation score into a severity level.
    ///
    /// Boundaries are strictly exclusive: a score equal to a threshold
    /// falls into the level below it.
    pub fn classify(&self, score: f64) -> Severity {
        if score > self.thresholds.critical {
            Severity::Critical
        } else if score > self.thresholds.major {
            Severity::Major
        } else if score > self.thresholds.minor {
            Severity::Minor
        } else {
            Severity::Info
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_standard_scores() {
        let classifier = SeverityClassifier::default();
        assert_eq!(classifier.classify(6.0), Severity::Critical);
        assert_eq!(classifier.classify(4.0), Severity::Major);
        assert_eq!(classifier.classify(1.5), Severity::Minor);
        assert_eq!(classifier.classify(0.5), Severity::Info);
    }

    #[test]
    fn test_classify_boundaries_are_exclusive() {
        let classifier = SeverityClassifier::default();
        // A score equal to a threshold stays in the lower level.
        assert_eq!(classifier.classify(5.0), Severity::Major);
        assert_eq!(classifier.classify(3.0), Severity::Minor);
        assert_eq!(classifier.classify(1.0), Severity::Info);
        assert_eq!(classifier.classify(0.0), Severity::Info);
    }

    #[test]
    fn test_classify_with_custom_thresholds() {
        let classifier = SeverityClassifier::new(SeverityThresholds {
            critical: 10.0,
            major: 5.0,
            minor: 2.0,
        });
        assert_eq!(classifier.classify(6.0), Severity::Major);
        assert_eq!(classifier.classify(11.0), Severity::Critical);
    }

    #[test]
    fn test_severity_ordering() {
        let mut levels = vec![
            Severity::Minor,
            Severity::Critical,
            Severity::Info,
            Severity::Major,
        ];
        levels.sort();
        assert_eq!(
            levels,
            vec![
                Severity::Info,
                Severity::Minor,
                Severity::Major,
                Severity::Critical
            ]
        );
    }

    #[test]
    fn test_penalty_weights() {
        assert_eq!(Severity::Critical.penalty_weight(), 10.0);
        assert_eq!(Severity::Major.penalty_weight(), 5.0);
        assert_eq!(Severity::Minor.penalty_weight(), 1.0);
        assert_eq!(Severity::Info.penalty_weight(), 0.0);
    }

    #[test]
    fn test_severity_serde_roundtrip() {
        let json = serde_json::to_string(&Severity::Critical).unwrap();
        assert_eq!(json, "\"critical\"");
        let back: Severity = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Severity::Critical);
    }
}
