//! # Vigil - Data Quality Evaluation for Rust
//!
//! Vigil is an in-process data-quality engine: it evaluates typed quality
//! rules against dataset records and scans field values for statistical
//! anomalies, producing scored reports for the surrounding service to
//! persist or alert on. It has no network, file, or CLI surface of its
//! own.
//!
//! ## Overview
//!
//! Two independent paths run over the same record model:
//!
//! - the **rule path**: a record and an active rule set go into the
//!   [`engine::RuleEngine`], which produces one pass/fail
//!   [`engine::DataQualityCheck`] per rule; checks aggregate into
//!   [`score::QualityMetrics`] and a 0 to 100 quality score, and failed
//!   checks become issues and remediation recommendations in a
//!   [`report::DataQualityReport`]
//! - the **anomaly path**: per-field value collections and scalars go into
//!   the [`anomaly::AnomalyDetector`], which applies Z-score, IQR, and
//!   isolation outlier detection, format/length/pattern checks, temporal
//!   plausibility and gap analysis, and named business-field rules,
//!   returning a severity-sorted anomaly list
//!
//! ## Quick Start
//!
//! ```rust
//! use vigil_engine::prelude::*;
//!
//! # async fn example() {
//! // Define rules
//! let rules = vec![
//!     QualityRule::builder("r-1", "email present", RuleType::Completeness, "email")
//!         .required(true)
//!         .severity(Severity::Critical)
//!         .build(),
//!     QualityRule::builder("r-2", "email format", RuleType::Accuracy, "email")
//!         .format_pattern(r"[^@\s]+@[^@\s]+\.[^@\s]+")
//!         .build(),
//!     QualityRule::builder("r-3", "age range", RuleType::Validity, "age")
//!         .min_value(0.0)
//!         .max_value(120.0)
//!         .build(),
//! ];
//!
//! // Evaluate a record
//! let record = DataRecord::new()
//!     .with_field("email", "user@example.com")
//!     .with_field("age", 34.0);
//!
//! let engine = RuleEngine::builder().build();
//! let checks = engine.evaluate(&record, &rules).await;
//! let report = DataQualityReport::from_checks(checks);
//! assert_eq!(report.quality_score, 100.0);
//!
//! // Independently, scan for anomalies
//! let detector = AnomalyDetector::default();
//! let anomalies = detector.detect(&record);
//! assert!(anomalies.is_empty());
//! # }
//! ```
//!
//! ## Error handling
//!
//! [`engine::RuleEngine::evaluate`] and
//! [`anomaly::AnomalyDetector::detect`] never fail as a whole: a malformed
//! pattern, an unreachable collaborator, or a type mismatch marks the
//! affected check as failed with `error_message` set, and evaluation of
//! the batch continues. A collaborator failure is never treated as a pass.
//!
//! ## Concurrency
//!
//! Rule sets and records are immutable for the duration of a call and no
//! component retains state between calls, so evaluating many records
//! concurrently is safe without locks. The isolation-score detector is
//! O(n^2) in collection size; callers processing large datasets should cap
//! or sample collections before detection.
//!
//! ## Architecture
//!
//! - **`record`**: the record model (field name to scalar or homogeneous
//!   collection)
//! - **`rules`**: rule definitions and the per-type evaluator strategy
//!   table
//! - **`engine`**: rule evaluation orchestration
//! - **`score`**: metrics aggregation and the quality score
//! - **`report`**: issues, recommendations, report assembly
//! - **`anomaly`**: statistical and structural anomaly detection
//! - **`collaborators`**: contracts for the external uniqueness store,
//!   reference store, and expression evaluator
//! - **`severity`**: the shared severity order and classifier
//! - **`logging`**: logging configuration and setup helpers

pub mod anomaly;
pub mod collaborators;
pub mod engine;
pub mod error;
pub mod logging;
pub mod prelude;
pub mod record;
pub mod report;
pub mod rules;
pub mod score;
pub mod severity;
