//! Integration tests for rule evaluation across all eight rule types.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use vigil_engine::collaborators::{
    InMemoryReferenceStore, InMemoryUniquenessStore, StaticExpressionEvaluator,
    UnreachableCollaborator,
};
use vigil_engine::engine::RuleEngine;
use vigil_engine::prelude::*;

fn sample_record() -> DataRecord {
    DataRecord::new()
        .with_field("user_id", "u-1001")
        .with_field("email", "user@example.com")
        .with_field("age", 34.0)
        .with_field("country", "DE")
        .with_field("status", "active")
        .with_field("updated_at", Utc::now() - chrono::Duration::minutes(5))
        .with_field("total", 120.0)
}

fn full_rule_set() -> Vec<QualityRule> {
    vec![
        QualityRule::builder("r-1", "user id present", RuleType::Completeness, "user_id")
            .required(true)
            .severity(Severity::Critical)
            .build(),
        QualityRule::builder("r-2", "email format", RuleType::Accuracy, "email")
            .format_pattern(r"[^@\s]+@[^@\s]+\.[^@\s]+")
            .build(),
        QualityRule::builder("r-3", "totals consistent", RuleType::Consistency, "total")
            .consistency_expression("total == net + tax")
            .build(),
        QualityRule::builder("r-4", "age range", RuleType::Validity, "age")
            .expected_data_type(DataType::Number)
            .min_value(0.0)
            .max_value(120.0)
            .build(),
        QualityRule::builder("r-5", "unique user id", RuleType::Uniqueness, "user_id")
            .scope("dataset-a")
            .build(),
        QualityRule::builder("r-6", "fresh update", RuleType::Timeliness, "updated_at")
            .timeliness_threshold(Duration::from_secs(24 * 3600))
            .build(),
        QualityRule::builder(
            "r-7",
            "country exists",
            RuleType::ReferentialIntegrity,
            "country",
        )
        .reference("countries", "iso_code")
        .build(),
        QualityRule::builder("r-8", "discount cap", RuleType::BusinessRule, "total")
            .business_rule_expression("discount <= total * 0.5")
            .build(),
    ]
}

async fn engine_with_reference_data() -> RuleEngine {
    let reference = Arc::new(InMemoryReferenceStore::new());
    reference.insert("countries", "iso_code", "DE").await;
    RuleEngine::builder()
        .uniqueness_store(Arc::new(InMemoryUniquenessStore::new()))
        .reference_store(reference)
        .expression_evaluator(Arc::new(StaticExpressionEvaluator::always(true)))
        .build()
}

#[tokio::test]
async fn test_clean_record_passes_all_rule_types() {
    let engine = engine_with_reference_data().await;
    let checks = engine.evaluate(&sample_record(), &full_rule_set()).await;

    assert_eq!(checks.len(), 8);
    for check in &checks {
        assert!(
            check.passed,
            "rule '{}' ({}) unexpectedly failed: {:?}",
            check.rule_name, check.rule_type, check.failure_details
        );
        assert!(check.error_message.is_none());
    }

    let report = DataQualityReport::from_checks(checks);
    assert_eq!(report.quality_score, 100.0);
    assert_eq!(report.metrics.pass_rate, 100.0);
    assert!(report.issues.is_empty());
    assert!(report.recommendations.is_empty());
}

#[tokio::test]
async fn test_dirty_record_fails_where_expected() {
    let engine = engine_with_reference_data().await;
    let record = DataRecord::new()
        // user_id missing entirely
        .with_field("email", "not-an-email")
        .with_field("age", 250.0)
        .with_field("country", "XX")
        .with_field("updated_at", Utc::now() - chrono::Duration::days(10))
        .with_field("total", 120.0);

    let checks = engine.evaluate(&record, &full_rule_set()).await;
    assert_eq!(checks.len(), 8);

    let failed: Vec<&str> = checks
        .iter()
        .filter(|check| !check.passed)
        .map(|check| check.rule_id.as_str())
        .collect();
    assert_eq!(failed, vec!["r-1", "r-2", "r-4", "r-6", "r-7"]);

    // Every failed check carries details, none of these are errors.
    for check in checks.iter().filter(|check| !check.passed) {
        assert!(check.failure_details.is_some());
        assert!(check.error_message.is_none());
    }
}

#[tokio::test]
async fn test_report_scores_and_recommendations_for_failures() {
    let engine = engine_with_reference_data().await;
    let record = DataRecord::new()
        .with_field("email", "user@example.com")
        .with_field("age", 34.0);

    let rules = vec![
        QualityRule::builder("r-1", "user id present", RuleType::Completeness, "user_id")
            .required(true)
            .severity(Severity::Critical)
            .build(),
        QualityRule::builder("r-2", "email format", RuleType::Accuracy, "email")
            .format_pattern(r"[^@\s]+@[^@\s]+\.[^@\s]+")
            .build(),
    ];

    let checks = engine.evaluate(&record, &rules).await;
    let report = DataQualityReport::from_checks(checks);

    // One of two checks failed critically: pass rate 50, penalty 10.
    assert_eq!(report.metrics.pass_rate, 50.0);
    assert_eq!(report.quality_score, 40.0);
    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.issues[0].rule_type, RuleType::Completeness);
    assert_eq!(report.issues[0].severity, Severity::Critical);
    assert!(!report.issues[0].impact.is_empty());
    assert_eq!(report.recommendations.len(), 2);
}

#[tokio::test]
async fn test_duplicate_detection_via_uniqueness_store() {
    let uniqueness = Arc::new(InMemoryUniquenessStore::new());
    uniqueness.record("u-1001", "user_id", "dataset-a").await;
    let engine = RuleEngine::builder()
        .uniqueness_store(uniqueness)
        .build();

    let rules = vec![
        QualityRule::builder("r-5", "unique user id", RuleType::Uniqueness, "user_id")
            .scope("dataset-a")
            .severity(Severity::Major)
            .build(),
    ];

    let checks = engine.evaluate(&sample_record(), &rules).await;
    assert!(!checks[0].passed);
    assert!(checks[0]
        .failure_details
        .as_deref()
        .unwrap()
        .contains("already exists"));
}

#[tokio::test]
async fn test_unreachable_collaborators_produce_errored_checks_not_passes() {
    let engine = RuleEngine::builder()
        .uniqueness_store(Arc::new(UnreachableCollaborator::new("uniqueness down")))
        .reference_store(Arc::new(UnreachableCollaborator::new("reference down")))
        .expression_evaluator(Arc::new(UnreachableCollaborator::new("expressions down")))
        .build();

    let rules = vec![
        QualityRule::builder("r-5", "unique user id", RuleType::Uniqueness, "user_id").build(),
        QualityRule::builder(
            "r-7",
            "country exists",
            RuleType::ReferentialIntegrity,
            "country",
        )
        .reference("countries", "iso_code")
        .build(),
        QualityRule::builder("r-8", "discount cap", RuleType::BusinessRule, "total")
            .business_rule_expression("discount <= total * 0.5")
            .build(),
        // A pure rule still passes even when every collaborator is down.
        QualityRule::builder("r-4", "age range", RuleType::Validity, "age")
            .min_value(0.0)
            .max_value(120.0)
            .build(),
    ];

    let checks = engine.evaluate(&sample_record(), &rules).await;
    assert_eq!(checks.len(), 4);
    for check in &checks[..3] {
        assert!(!check.passed, "collaborator failure must not pass");
        assert!(check.error_message.is_some());
    }
    assert!(checks[3].passed);
}

#[tokio::test]
async fn test_batch_survives_malformed_rules() {
    let engine = engine_with_reference_data().await;
    let rules = vec![
        QualityRule::builder("r-bad-1", "broken pattern", RuleType::Accuracy, "email")
            .format_pattern("([unbalanced")
            .build(),
        QualityRule::builder("r-bad-2", "no threshold", RuleType::Timeliness, "updated_at")
            .build(),
        QualityRule::builder("r-bad-3", "range on text", RuleType::Validity, "status")
            .min_value(0.0)
            .build(),
        QualityRule::builder("r-good", "email format", RuleType::Accuracy, "email")
            .format_pattern(r"[^@\s]+@[^@\s]+\.[^@\s]+")
            .build(),
    ];

    let checks = engine.evaluate(&sample_record(), &rules).await;
    assert_eq!(checks.len(), 4);

    for check in &checks[..3] {
        assert!(!check.passed);
        assert!(check.error_message.is_some(), "{} should error", check.rule_id);
        assert!(check.failure_details.is_some());
    }
    assert!(checks[3].passed, "later rules still run after errors");
}

#[tokio::test]
async fn test_report_round_trips_through_json() {
    let engine = engine_with_reference_data().await;
    let checks = engine.evaluate(&sample_record(), &full_rule_set()).await;
    let report = DataQualityReport::from_checks(checks);

    let json = serde_json::to_string_pretty(&report).unwrap();
    let back: DataQualityReport = serde_json::from_str(&json).unwrap();

    assert_eq!(back.quality_score, report.quality_score);
    assert_eq!(back.metrics, report.metrics);
    assert_eq!(back.checks.len(), report.checks.len());
}
