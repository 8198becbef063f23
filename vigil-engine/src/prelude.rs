//! Prelude for commonly used types and traits in vigil-engine.

pub use crate::anomaly::{AnomalyDetector, AnomalyType, DataAnomaly, DetectorConfig};
pub use crate::collaborators::{ExpressionEvaluator, ReferenceStore, UniquenessStore};
pub use crate::engine::{DataQualityCheck, RuleEngine};
pub use crate::error::{Result, VigilError};
pub use crate::logging::LogConfig;
pub use crate::record::{DataRecord, DataType, FieldValue};
pub use crate::report::{DataQualityReport, IssueReporter, QualityIssue};
pub use crate::rules::{QualityRule, RuleType};
pub use crate::score::{QualityMetrics, ScoreAggregator};
pub use crate::severity::{Severity, SeverityClassifier, SeverityThresholds};
